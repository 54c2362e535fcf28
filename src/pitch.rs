//! Pitch spellings and equal-temperament frequencies.
//!
//! Octaves count upward from A: `A4` is the reference pitch and `G#4` is the
//! highest note below `A5`. Every spelling maps to a chromatic step in
//! `1..=12` starting at A, and enharmonic spellings share a step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Frequency of `A4` in Hz.
pub const REFERENCE_PITCH: f64 = 440.0;

/// Octave used when a note token omits one.
pub const DEFAULT_OCTAVE: i32 = 4;

/// The 17 recognized spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    A,
    #[serde(rename = "A#")]
    ASharp,
    Bb,
    B,
    C,
    #[serde(rename = "C#")]
    CSharp,
    Db,
    D,
    #[serde(rename = "D#")]
    DSharp,
    Eb,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    Gb,
    G,
    #[serde(rename = "G#")]
    GSharp,
    Ab,
}

impl PitchClass {
    /// Look up a spelling such as `"C#"` or `"Bb"`. `Cb`, `E#` and friends
    /// are not in the table.
    pub fn from_spelling(spelling: &str) -> Option<PitchClass> {
        let class = match spelling {
            "A" => PitchClass::A,
            "A#" => PitchClass::ASharp,
            "Bb" => PitchClass::Bb,
            "B" => PitchClass::B,
            "C" => PitchClass::C,
            "C#" => PitchClass::CSharp,
            "Db" => PitchClass::Db,
            "D" => PitchClass::D,
            "D#" => PitchClass::DSharp,
            "Eb" => PitchClass::Eb,
            "E" => PitchClass::E,
            "F" => PitchClass::F,
            "F#" => PitchClass::FSharp,
            "Gb" => PitchClass::Gb,
            "G" => PitchClass::G,
            "G#" => PitchClass::GSharp,
            "Ab" => PitchClass::Ab,
            _ => return None,
        };
        Some(class)
    }

    pub fn spelling(self) -> &'static str {
        match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::Ab => "Ab",
        }
    }

    /// Chromatic step, A = 1 through G#/Ab = 12.
    pub fn step(self) -> u8 {
        match self {
            PitchClass::A => 1,
            PitchClass::ASharp | PitchClass::Bb => 2,
            PitchClass::B => 3,
            PitchClass::C => 4,
            PitchClass::CSharp | PitchClass::Db => 5,
            PitchClass::D => 6,
            PitchClass::DSharp | PitchClass::Eb => 7,
            PitchClass::E => 8,
            PitchClass::F => 9,
            PitchClass::FSharp | PitchClass::Gb => 10,
            PitchClass::G => 11,
            PitchClass::GSharp | PitchClass::Ab => 12,
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// Equal-temperament frequency relative to [`REFERENCE_PITCH`].
///
/// Formula: `440 * 2^((octave - 4) + (step - 1) / 12)`
pub fn frequency(pitch: PitchClass, octave: i32) -> f64 {
    let semitones = (pitch.step() - PitchClass::A.step()) as f64;
    REFERENCE_PITCH * 2.0_f64.powf((octave - DEFAULT_OCTAVE) as f64 + semitones / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_hz(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected} Hz, got {actual} Hz"
        );
    }

    #[test]
    fn reference_octaves() {
        assert_hz(frequency(PitchClass::A, 4), 440.0);
        assert_hz(frequency(PitchClass::A, 5), 880.0);
        assert_hz(frequency(PitchClass::A, 3), 220.0);
    }

    #[test]
    fn octave_four_matches_equal_temperament() {
        // Each step above A4 multiplies by the twelfth root of two.
        let ratio = 2.0_f64.powf(1.0 / 12.0);
        let spellings = [
            "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
        ];
        for (i, spelling) in spellings.iter().enumerate() {
            let pitch = PitchClass::from_spelling(spelling).unwrap();
            assert_hz(frequency(pitch, 4), 440.0 * ratio.powi(i as i32));
        }
    }

    #[test]
    fn c_sits_three_steps_above_a() {
        assert_hz(frequency(PitchClass::C, 4), 523.25);
        assert_hz(frequency(PitchClass::C, 3), 261.63);
    }

    #[test]
    fn enharmonics_share_a_step() {
        let pairs = [
            ("A#", "Bb"),
            ("C#", "Db"),
            ("D#", "Eb"),
            ("F#", "Gb"),
            ("G#", "Ab"),
        ];
        for (sharp, flat) in pairs {
            let sharp = PitchClass::from_spelling(sharp).unwrap();
            let flat = PitchClass::from_spelling(flat).unwrap();
            assert_eq!(sharp.step(), flat.step());
            assert_eq!(frequency(sharp, 4), frequency(flat, 4));
        }
    }

    #[test]
    fn unlisted_spellings_are_rejected() {
        for spelling in ["Cb", "Fb", "E#", "B#", "H", "a", ""] {
            assert_eq!(PitchClass::from_spelling(spelling), None, "{spelling}");
        }
    }

    #[test]
    fn spelling_round_trips() {
        for spelling in [
            "A", "A#", "Bb", "B", "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G",
            "G#", "Ab",
        ] {
            let pitch = PitchClass::from_spelling(spelling).unwrap();
            assert_eq!(pitch.spelling(), spelling);
        }
    }
}
