use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;

/// Oscillator shape used for every note played after a voice directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveType {
    #[default]
    Sine,
    Sawtooth,
    Square,
    Triangle,
}

impl WaveType {
    pub const ALL: [WaveType; 4] = [
        WaveType::Sine,
        WaveType::Sawtooth,
        WaveType::Square,
        WaveType::Triangle,
    ];

    /// The canonical keyword, as written in notation and shown in the UI.
    pub fn name(self) -> &'static str {
        match self {
            WaveType::Sine => "sine",
            WaveType::Sawtooth => "sawtooth",
            WaveType::Square => "square",
            WaveType::Triangle => "triangle",
        }
    }

    /// Resolve a canonical keyword. Aliases are a grammar option and are
    /// handled by [`crate::lexer::Grammar::wave_keyword`].
    pub fn from_name(name: &str) -> Option<WaveType> {
        WaveType::ALL.into_iter().find(|w| w.name() == name)
    }
}

impl fmt::Display for WaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single parsed note: `C#5~~` is `{ pitch: C#, octave: 5, sustain: 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: PitchClass,
    pub octave: i32,
    /// Hold length in note units; always at least 1.
    pub sustain: u32,
}

impl Note {
    pub fn frequency(&self) -> f64 {
        crate::pitch::frequency(self.pitch, self.octave)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)?;
        for _ in 1..self.sustain {
            f.write_str("~")?;
        }
        Ok(())
    }
}

/// Notes triggered together. Never empty when produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub notes: Vec<Note>,
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{note}")?;
        }
        Ok(())
    }
}

/// One step of a compiled song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Directive {
    Chord(Chord),
    /// A silent beat.
    Rest,
    /// Switch the wave type for subsequent notes.
    Voice { wave: WaveType },
    /// Stop autoplay here.
    Halt,
    BeginRepeat,
    EndRepeat,
}

impl Directive {
    /// Chords and rests take a beat; everything else executes between beats.
    pub fn consumes_beat(&self) -> bool {
        matches!(self, Directive::Chord(_) | Directive::Rest)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Chord(chord) => write!(f, "{chord}"),
            Directive::Rest => f.write_str("_"),
            Directive::Voice { wave } => write!(f, "{wave}"),
            Directive::Halt => f.write_str("||"),
            Directive::BeginRepeat => f.write_str("|:"),
            Directive::EndRepeat => f.write_str(":|"),
        }
    }
}

/// Print a directive sequence back to notation, one space between words.
pub fn to_notation(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
