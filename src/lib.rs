pub mod ast;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod dsp;
pub mod error;
pub mod layout;
pub mod lexer;
pub mod parser;
pub mod pitch;
pub mod player;
pub mod session;
pub mod store;
pub mod token;
pub mod tone;
pub mod tutorial;

use std::time::Duration;

use crate::config::PlayerConfig;
use crate::player::Player;
use crate::session::Session;
use crate::store::MemoryStore;
use crate::tone::ToneLog;
use wasm_bindgen::prelude::*;

pub use crate::ast::{Chord, Directive, Note, WaveType};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-exposed: return the tonestep-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: parse song text into its directive list.
#[wasm_bindgen]
pub fn parse_song(source: &str) -> std::result::Result<JsValue, JsValue> {
    let directives = parser::parse_song(source, lexer::Grammar::default());
    serde_wasm_bindgen::to_value(&directives).map_err(js_error)
}

/// WASM-exposed: render up to `steps` autoplay steps of a song to a WAV
/// byte array.
#[wasm_bindgen]
pub fn render_song_wav(
    source: &str,
    sample_rate: u32,
    steps: u32,
) -> std::result::Result<Vec<u8>, JsValue> {
    let config = PlayerConfig {
        sample_rate,
        ..PlayerConfig::default()
    };
    let directives = parser::parse_song(source, config.grammar());
    dsp::renderer::render_wav(&directives, &config, steps as usize).map_err(js_error)
}

/// WASM-exposed player.
///
/// The host page drives the clock with [`WasmPlayer::tick`] from its own
/// animation loop, then pulls the tones to sound with
/// [`WasmPlayer::drain_tones`].
#[wasm_bindgen]
pub struct WasmPlayer {
    session: Session<MemoryStore>,
    tones: ToneLog,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// `config_json` is an optional `PlayerConfig` document.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<WasmPlayer, JsValue> {
        let config = match config_json {
            Some(json) => PlayerConfig::from_json(&json).map_err(js_error)?,
            None => PlayerConfig::default(),
        };
        let tones = ToneLog::new();
        let player = Player::with_config(&config, tones.clone());
        Ok(WasmPlayer {
            session: Session::open(config, player, MemoryStore::new()),
            tones,
        })
    }

    pub fn edit(&mut self, text: &str) {
        self.session.edit(text);
    }

    pub fn song(&self) -> String {
        self.session.song().to_string()
    }

    pub fn load_tutorial(&mut self) {
        self.session.load_tutorial();
    }

    /// Feed `ms` milliseconds of elapsed time. Negative, NaN, and
    /// unrepresentably large values are ignored.
    pub fn tick(&mut self, ms: f64) {
        if let Ok(elapsed) = Duration::try_from_secs_f64(ms / 1000.0) {
            self.session.player_mut().tick(elapsed);
        }
    }

    pub fn toggle(&mut self) {
        self.session.toggle_autoplay();
    }

    pub fn play_next(&mut self) {
        self.session.play_next();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn input_bpm(&mut self, input: &str) -> bool {
        self.session.input_bpm(input)
    }

    pub fn input_subdivisions(&mut self, input: &str) -> bool {
        self.session.input_subdivisions(input)
    }

    pub fn input_beats_per_bar(&mut self, input: &str) -> bool {
        self.session.input_beats_per_bar(input)
    }

    pub fn select_wave(&mut self, name: &str) -> bool {
        self.session.select_wave(name)
    }

    /// Click the grid cell at `index`. Out-of-range clicks are ignored.
    pub fn click(&mut self, index: usize) {
        if let Some(cell) = self.session.cells().get(index) {
            self.session.click(cell);
        }
    }

    pub fn cells(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.cells()).map_err(js_error)
    }

    pub fn columns(&self) -> u32 {
        self.session.columns()
    }

    pub fn head(&self) -> i32 {
        self.session.player().head() as i32
    }

    pub fn is_running(&self) -> bool {
        self.session.player().is_running()
    }

    pub fn wave_type(&self) -> String {
        self.session.player().wave_type().to_string()
    }

    /// Tones played since the last drain.
    pub fn drain_tones(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tones.drain()).map_err(js_error)
    }

    /// Plain-text warnings for anything in the song that was not understood.
    pub fn report(&self) -> std::result::Result<String, JsValue> {
        diagnostics::render_report(self.session.song(), &self.session.diagnostics())
            .map_err(js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn wasm_player_plays_and_queues_tones() {
        let mut player = WasmPlayer::new(None).unwrap();
        player.edit("C-E _ ||");
        player.toggle();
        assert!(player.is_running());
        player.tick(1500.0);
        assert!(!player.is_running());
        assert_eq!(player.head(), 1);
        assert_eq!(player.tones.len(), 2);
        player.tones.drain();
        assert!(player.tones.is_empty());
    }

    #[test]
    fn wasm_player_ignores_bad_ticks_and_clicks() {
        let mut player = WasmPlayer::new(None).unwrap();
        player.edit("A B");
        player.toggle();
        player.tick(f64::NAN);
        player.tick(-10.0);
        assert_eq!(player.head(), -1);
        player.click(9);
        assert_eq!(player.head(), -1);
        player.click(1);
        assert_eq!(player.head(), 1);
    }

    #[test]
    fn wasm_player_survives_huge_ticks() {
        let mut player = WasmPlayer::new(None).unwrap();
        player.edit("A ||");
        player.toggle();
        player.tick(f64::INFINITY);
        player.tick(1e30);
        assert_eq!(player.head(), -1);
        assert!(player.is_running());

        // Plays A, then the halt stops playback and drops the rest.
        player.tick(1e18);
        assert!(!player.is_running());
        assert_eq!(player.head(), 0);
        assert_eq!(player.tones.len(), 1);
    }

    #[test]
    fn wasm_player_report_lists_warnings() {
        let mut player = WasmPlayer::new(None).unwrap();
        player.edit("A ?? B");
        let report = player.report().unwrap();
        assert!(report.contains("Warning"), "{report}");
        assert!(player.input_bpm("90"));
        assert!(!player.select_wave("saw"));
        assert_eq!(player.wave_type(), "sine");
    }

    #[test]
    fn rendered_wav_has_audio() {
        let wav = render_song_wav("C E G ||", 8000, 16).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert!(wav.len() > 44);
    }
}
