use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::ast::WaveType;
use crate::error::{Result, TonestepError};
use crate::lexer::Grammar;

/// Player and editor settings.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Beats per minute.
    pub bpm: NonZeroU32,
    /// Directives played per beat.
    pub subdivisions: NonZeroU32,
    /// Beats per bar, used only for laying out the grid.
    pub beats_per_bar: NonZeroU32,
    /// Wave type before the song's first voice directive.
    pub wave_type: WaveType,
    /// Length of one sustain unit in milliseconds.
    pub note_length_ms: f64,
    /// Accept `saw` and `tri` as wave keywords.
    pub wave_aliases: bool,
    /// Sample rate for offline rendering.
    pub sample_rate: u32,
}

const DEFAULT_BPM: NonZeroU32 = NonZeroU32::new(60).unwrap();
const DEFAULT_SUBDIVISIONS: NonZeroU32 = NonZeroU32::new(2).unwrap();
const DEFAULT_BEATS_PER_BAR: NonZeroU32 = NonZeroU32::new(4).unwrap();

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            bpm: DEFAULT_BPM,
            subdivisions: DEFAULT_SUBDIVISIONS,
            beats_per_bar: DEFAULT_BEATS_PER_BAR,
            wave_type: WaveType::Sine,
            note_length_ms: 400.0,
            wave_aliases: false,
            sample_rate: 44_100,
        }
    }
}

impl PlayerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Zero tempo values are already unrepresentable; this checks the rest.
    pub fn validate(&self) -> Result<()> {
        if !(self.note_length_ms.is_finite() && self.note_length_ms > 0.0) {
            return Err(TonestepError::Config(format!(
                "noteLengthMs must be a positive number, got {}",
                self.note_length_ms
            )));
        }
        if self.sample_rate == 0 {
            return Err(TonestepError::Config("sampleRate must be positive".to_string()));
        }
        Ok(())
    }

    pub fn grammar(&self) -> Grammar {
        Grammar {
            wave_aliases: self.wave_aliases,
        }
    }
}

/// Parse a user-typed tempo field. Only positive integers are accepted.
pub fn parse_positive(input: &str) -> Option<NonZeroU32> {
    input.trim().parse::<u32>().ok().and_then(NonZeroU32::new)
}
