//! Voice: one scheduled tone, an oscillator shaped by the fixed envelope.

use crate::tone::Tone;

use super::envelope::Envelope;
use super::oscillator::Oscillator;

#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Oscillator,
    envelope: Envelope,
    /// Sample index in the output where this voice begins.
    pub start: usize,
}

impl Voice {
    pub fn new(tone: &Tone, note_length_ms: f64, sample_rate: f64, start: usize) -> Self {
        Voice {
            oscillator: Oscillator::new(tone.wave_type, tone.frequency, sample_rate),
            envelope: Envelope::new(sample_rate, tone.sustain_ms, note_length_ms),
            start,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        if self.envelope.is_finished() {
            return 0.0;
        }
        self.oscillator.next_sample() * self.envelope.next_sample()
    }

    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }

    /// Samples this voice spans from its start.
    pub fn len(&self) -> usize {
        self.envelope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelope.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::WaveType;

    fn tone(wave_type: WaveType, sustain_ms: f64) -> Tone {
        Tone {
            frequency: 440.0,
            wave_type,
            sustain_ms,
        }
    }

    #[test]
    fn voice_produces_sound() {
        let mut v = Voice::new(&tone(WaveType::Square, 400.0), 400.0, 8000.0, 0);
        let loudest = (0..v.len()).map(|_| v.next_sample().abs()).fold(0.0, f64::max);
        assert!(loudest > 0.1, "peak {loudest}");
    }

    #[test]
    fn voice_stops_after_sustain() {
        let mut v = Voice::new(&tone(WaveType::Sine, 800.0), 400.0, 1000.0, 0);
        assert_eq!(v.len(), 800);
        for _ in 0..800 {
            v.next_sample();
        }
        assert!(v.is_finished());
        assert_eq!(v.next_sample(), 0.0);
    }

    #[test]
    fn voice_output_range() {
        for wave in WaveType::ALL {
            let mut v = Voice::new(&tone(wave, 400.0), 400.0, 44100.0, 0);
            while !v.is_finished() {
                let s = v.next_sample();
                assert!(s.abs() <= 1.5, "{wave}: {s}");
            }
        }
    }
}
