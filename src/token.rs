use serde::{Deserialize, Serialize};

/// Byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// The lexical categories the tokenizer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordKind {
    /// One or more note tokens joined by `-`.
    Chord,
    /// `_`
    Rest,
    /// `sine`, `sawtooth`, `square`, `triangle` (plus aliases when enabled).
    Wave,
    /// `||`
    Halt,
    /// `|:`
    BeginRepeat,
    /// `:|`
    EndRepeat,
}

/// A word matched by the tokenizer, with its text and source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub kind: WordKind,
    pub text: String,
    pub span: Span,
}

/// Text the tokenizer stepped over because it matched nothing in the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    pub text: String,
    pub span: Span,
}
