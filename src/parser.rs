use crate::ast::{Chord, Directive, Note};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::lexer::{tokenize, Grammar};
use crate::pitch::{PitchClass, DEFAULT_OCTAVE};
use crate::token::{Word, WordKind};

/// Directives plus everything that was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub directives: Vec<Directive>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Maps tokenizer words to directives.
///
/// Nothing here fails: a word that does not resolve to a directive is dropped
/// and recorded as a diagnostic.
pub struct Parser {
    grammar: Grammar,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(grammar: Grammar) -> Self {
        Parser {
            grammar,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse_words(&mut self, words: &[Word]) -> Vec<Directive> {
        words.iter().filter_map(|w| self.parse_word(w)).collect()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn parse_word(&mut self, word: &Word) -> Option<Directive> {
        let directive = match word.kind {
            WordKind::Rest => Some(Directive::Rest),
            WordKind::Halt => Some(Directive::Halt),
            WordKind::BeginRepeat => Some(Directive::BeginRepeat),
            WordKind::EndRepeat => Some(Directive::EndRepeat),
            WordKind::Wave => self
                .grammar
                .wave_keyword(&word.text)
                .map(|wave| Directive::Voice { wave }),
            WordKind::Chord => self.parse_chord_word(word),
        };
        if directive.is_none() {
            self.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::DroppedWord,
                span: word.span,
                message: format!("'{}' does not name a note, rest, voice, or marker", word.text),
            });
        }
        directive
    }

    fn parse_chord_word(&mut self, word: &Word) -> Option<Directive> {
        let mut notes = Vec::new();
        for piece in word.text.split('-') {
            match parse_note(piece) {
                Some(note) => notes.push(note),
                None if notes.is_empty() && !word.text.contains('-') => {}
                None => self.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::DroppedNote,
                    span: word.span,
                    message: format!("'{piece}' is not a valid note in chord '{}'", word.text),
                }),
            }
        }
        if notes.is_empty() {
            None
        } else {
            Some(Directive::Chord(Chord { notes }))
        }
    }
}

/// Parse one note token such as `C#5~~`.
///
/// The first `[A-G][#b]?` inside `piece` is taken as the spelling, followed
/// by an optional octave and any number of `~`. Returns `None` when there is
/// no pitch letter, the spelling is not one of the 17 recognized ones, the
/// octave does not fit an `i32`, or the octave is so high that the pitch has
/// no finite frequency.
pub fn parse_note(piece: &str) -> Option<Note> {
    let bytes = piece.as_bytes();
    let start = bytes.iter().position(|b| matches!(b, b'A'..=b'G'))?;

    let mut idx = start + 1;
    if matches!(bytes.get(idx), Some(b'#' | b'b')) {
        idx += 1;
    }
    let pitch = PitchClass::from_spelling(&piece[start..idx])?;

    let octave_start = idx;
    while bytes.get(idx).is_some_and(|b| b.is_ascii_digit()) {
        idx += 1;
    }
    let octave = if idx > octave_start {
        piece[octave_start..idx].parse().ok()?
    } else {
        DEFAULT_OCTAVE
    };

    let holds = bytes[idx..].iter().take_while(|&&b| b == b'~').count();

    let note = Note {
        pitch,
        octave,
        sustain: holds as u32 + 1,
    };
    note.frequency().is_finite().then_some(note)
}

/// Split a chord token on `-` and keep the notes that parse.
pub fn parse_chord(token: &str) -> Vec<Note> {
    token.split('-').filter_map(parse_note).collect()
}

/// Parse a song, discarding anything unrecognized.
pub fn parse_song(source: &str, grammar: Grammar) -> Vec<Directive> {
    parse_song_with_diagnostics(source, grammar).directives
}

/// Parse a song and report what was skipped or dropped.
pub fn parse_song_with_diagnostics(source: &str, grammar: Grammar) -> Parsed {
    let lexed = tokenize(source, grammar);
    let mut parser = Parser::new(grammar);
    let directives = parser.parse_words(&lexed.words);

    let mut diagnostics: Vec<Diagnostic> = lexed
        .skipped
        .into_iter()
        .map(|skipped| Diagnostic {
            kind: DiagnosticKind::Unrecognized,
            message: format!("'{}' is not part of the notation", skipped.text),
            span: skipped.span,
        })
        .collect();
    diagnostics.extend(parser.into_diagnostics());
    diagnostics.sort_by_key(|d| d.span.start);

    log::debug!(
        "parsed {} directives from {} words ({} diagnostics)",
        directives.len(),
        lexed.words.len(),
        diagnostics.len()
    );

    Parsed {
        directives,
        diagnostics,
    }
}
