//! Offline renderer: plays a song through a [`Player`] against a virtual
//! clock and mixes the tones it emits.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::ast::Directive;
use crate::config::PlayerConfig;
use crate::error::Result;
use crate::player::Player;
use crate::tone::ToneLog;

use super::mixer::Mixer;
use super::voice::Voice;

/// Render up to `max_steps` autoplay steps to mono samples.
///
/// Rendering ends early when playback halts. The buffer runs to the end of
/// the last tone, so a sustained note rings past the final step.
pub fn render_samples(
    directives: &[Directive],
    config: &PlayerConfig,
    max_steps: usize,
) -> Vec<f32> {
    let sample_rate = f64::from(config.sample_rate);
    let tones = ToneLog::new();
    let mut player = Player::with_config(config, tones.clone());
    player.set_directives(directives.to_vec());

    let interval = player.interval();
    let step_samples = (interval.as_secs_f64() * sample_rate).round() as usize;

    let mut voices = Vec::new();
    let mut steps = 0;
    player.start();
    while steps < max_steps && player.is_running() {
        player.tick(interval);
        let at = steps * step_samples;
        voices.extend(
            tones
                .drain()
                .iter()
                .map(|tone| Voice::new(tone, config.note_length_ms, sample_rate, at)),
        );
        steps += 1;
    }
    player.stop();

    let len = voices
        .iter()
        .map(|v| v.start + v.len())
        .fold(steps * step_samples, usize::max);
    log::debug!("rendered {steps} steps, {} tones, {len} samples", voices.len());

    let mut mixer = Mixer::new();
    mixer.clear(len);
    for voice in voices {
        mixer.add_voice(voice);
    }
    mixer.output()
}

/// Render to a mono 32-bit float WAV file in memory.
pub fn render_wav(
    directives: &[Directive],
    config: &PlayerConfig,
    max_steps: usize,
) -> Result<Vec<u8>> {
    config.validate()?;
    let samples = render_samples(directives, config, max_steps);
    encode_wav(&samples, config.sample_rate)
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Grammar;
    use crate::parser::parse_song;
    use hound::WavReader;

    fn config() -> PlayerConfig {
        PlayerConfig {
            sample_rate: 8000,
            ..PlayerConfig::default()
        }
    }

    fn song(source: &str) -> Vec<Directive> {
        parse_song(source, Grammar::default())
    }

    #[test]
    fn empty_song_is_silent() {
        assert!(render_samples(&[], &config(), 16).is_empty());
    }

    #[test]
    fn halt_ends_rendering() {
        // Default tempo: 500 ms per step, 4000 samples at 8 kHz.
        let samples = render_samples(&song("A _ || C"), &config(), 100);
        // Three steps played (A, rest, halt); A rings for 400 ms.
        assert_eq!(samples.len(), 3 * 4000);
        assert!(samples[..3200].iter().any(|&s| s.abs() > 0.01));
        assert!(samples[4000..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn sustained_note_rings_past_the_last_step() {
        let samples = render_samples(&song("C~~~"), &config(), 1);
        // One step of 4000 samples, tone of 4 × 400 ms (three tildes).
        assert_eq!(samples.len(), 12_800);
    }

    #[test]
    fn step_cap_bounds_looping_songs() {
        let samples = render_samples(&song("A B"), &config(), 4);
        assert_eq!(samples.len(), 4 * 4000);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn extreme_octaves_render_finite_samples() {
        // A2000 has no finite pitch and is dropped; A14 sits far above 8 kHz.
        let directives = song("A2000 A14 ||");
        assert_eq!(directives.len(), 2);
        let samples = render_samples(&directives, &config(), 8);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn wav_header_valid() {
        let wav = render_wav(&song("C-E-G ||"), &config(), 8).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let reader = WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        assert_eq!(reader.len(), 2 * 4000);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = PlayerConfig {
            sample_rate: 0,
            ..PlayerConfig::default()
        };
        assert!(render_wav(&song("A"), &bad, 1).is_err());
    }
}
