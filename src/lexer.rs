use serde::{Deserialize, Serialize};

use crate::ast::WaveType;
use crate::token::{Skipped, Span, Word, WordKind};

/// Grammar options that change which words the tokenizer accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// Also accept `saw` for sawtooth and `tri` for triangle.
    pub wave_aliases: bool,
}

impl Grammar {
    /// Keywords in match order. Longer spellings come first so an alias
    /// never cuts a full keyword short.
    fn wave_keywords(&self) -> &'static [(&'static str, WaveType)] {
        const CANONICAL: &[(&str, WaveType)] = &[
            ("sawtooth", WaveType::Sawtooth),
            ("square", WaveType::Square),
            ("sine", WaveType::Sine),
            ("triangle", WaveType::Triangle),
        ];
        const WITH_ALIASES: &[(&str, WaveType)] = &[
            ("sawtooth", WaveType::Sawtooth),
            ("square", WaveType::Square),
            ("sine", WaveType::Sine),
            ("triangle", WaveType::Triangle),
            ("saw", WaveType::Sawtooth),
            ("tri", WaveType::Triangle),
        ];
        if self.wave_aliases { WITH_ALIASES } else { CANONICAL }
    }

    /// Resolve a wave keyword under this grammar.
    pub fn wave_keyword(&self, word: &str) -> Option<WaveType> {
        self.wave_keywords()
            .iter()
            .find(|(keyword, _)| *keyword == word)
            .map(|&(_, wave)| wave)
    }
}

/// Result of tokenizing a song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexed {
    pub words: Vec<Word>,
    pub skipped: Vec<Skipped>,
}

/// Scans notation text into words.
///
/// Comments are stripped and the remaining lines are trimmed and joined with
/// no separator before scanning, so the scan works on a single buffer. Every
/// byte of that buffer remembers where it came from in the original text,
/// which keeps spans meaningful across the joins.
pub struct Lexer<'a> {
    source: &'a str,
    grammar: Grammar,
    bytes: Vec<u8>,
    /// `origin[i]` = byte offset in `source` of `bytes[i]`.
    origin: Vec<usize>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, grammar: Grammar) -> Self {
        let mut bytes = Vec::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len());
        let mut line_start = 0;
        for line in source.split('\n') {
            let code = match line.find("//") {
                Some(idx) => &line[..idx],
                None => line,
            };
            let trimmed = code.trim();
            if !trimmed.is_empty() {
                let offset = line_start + (code.len() - code.trim_start().len());
                bytes.extend_from_slice(trimmed.as_bytes());
                origin.extend(offset..offset + trimmed.len());
            }
            line_start += line.len() + 1;
        }
        Lexer {
            source,
            grammar,
            bytes,
            origin,
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Lexed {
        let mut lexed = Lexed::default();
        let mut garbage: Option<(usize, usize)> = None;

        while self.pos < self.bytes.len() {
            let start = self.pos;
            if let Some((kind, end)) = self.match_word(start) {
                self.flush_garbage(&mut garbage, &mut lexed.skipped);
                let text = String::from_utf8_lossy(&self.bytes[start..end]).into_owned();
                lexed.words.push(Word {
                    kind,
                    text,
                    span: self.source_span(start, end),
                });
                self.pos = end;
                continue;
            }

            let byte = self.bytes[start];
            if byte.is_ascii_whitespace() {
                self.flush_garbage(&mut garbage, &mut lexed.skipped);
            } else {
                garbage = match garbage {
                    // Extend the run only while it stays on one source line.
                    Some((run_start, run_end))
                        if self.origin[run_end - 1] + 1 == self.origin[start] =>
                    {
                        Some((run_start, start + 1))
                    }
                    Some((run_start, run_end)) => {
                        lexed.skipped.push(self.skipped(run_start, run_end));
                        Some((start, start + 1))
                    }
                    None => Some((start, start + 1)),
                };
            }
            self.pos += 1;
        }
        self.flush_garbage(&mut garbage, &mut lexed.skipped);
        lexed
    }

    fn flush_garbage(&self, garbage: &mut Option<(usize, usize)>, out: &mut Vec<Skipped>) {
        if let Some((start, end)) = garbage.take() {
            out.push(self.skipped(start, end));
        }
    }

    fn skipped(&self, start: usize, end: usize) -> Skipped {
        let span = self.source_span(start, end);
        Skipped {
            text: self.source[span.start..span.end].to_string(),
            span,
        }
    }

    fn source_span(&self, start: usize, end: usize) -> Span {
        Span::new(self.origin[start], self.origin[end - 1] + 1)
    }

    fn peek_at(&self, idx: usize) -> Option<u8> {
        self.bytes.get(idx).copied()
    }

    fn match_word(&self, start: usize) -> Option<(WordKind, usize)> {
        if let Some(end) = self.match_chord(start) {
            return Some((WordKind::Chord, end));
        }
        if self.peek_at(start) == Some(b'_') {
            return Some((WordKind::Rest, start + 1));
        }
        let rest = &self.bytes[start..];
        for (keyword, _) in self.grammar.wave_keywords() {
            if rest.starts_with(keyword.as_bytes()) {
                return Some((WordKind::Wave, start + keyword.len()));
            }
        }
        let symbol = match (self.peek_at(start), self.peek_at(start + 1)) {
            (Some(b'|'), Some(b'|')) => WordKind::Halt,
            (Some(b'|'), Some(b':')) => WordKind::BeginRepeat,
            (Some(b':'), Some(b'|')) => WordKind::EndRepeat,
            _ => return None,
        };
        Some((symbol, start + 2))
    }

    /// A note token followed by any number of `-note` continuations.
    fn match_chord(&self, start: usize) -> Option<usize> {
        let mut end = self.match_note(start)?;
        while self.peek_at(end) == Some(b'-') {
            match self.match_note(end + 1) {
                Some(next) => end = next,
                None => break,
            }
        }
        Some(end)
    }

    /// `[A-G][#b]?\d*~*`
    fn match_note(&self, start: usize) -> Option<usize> {
        if !matches!(self.peek_at(start), Some(b'A'..=b'G')) {
            return None;
        }
        let mut end = start + 1;
        if matches!(self.peek_at(end), Some(b'#' | b'b')) {
            end += 1;
        }
        while self.peek_at(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
        }
        while self.peek_at(end) == Some(b'~') {
            end += 1;
        }
        Some(end)
    }
}

/// Tokenize with the given grammar.
pub fn tokenize(source: &str, grammar: Grammar) -> Lexed {
    Lexer::new(source, grammar).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input, Grammar::default())
            .words
            .into_iter()
            .map(|w| w.text)
            .collect()
    }

    fn kinds(input: &str) -> Vec<WordKind> {
        tokenize(input, Grammar::default())
            .words
            .into_iter()
            .map(|w| w.kind)
            .collect()
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(words("C E G _"), vec!["C", "E", "G", "_"]);
    }

    #[test]
    fn test_note_shapes() {
        assert_eq!(
            words("C#5~~ Bb A12 G~~~~"),
            vec!["C#5~~", "Bb", "A12", "G~~~~"]
        );
    }

    #[test]
    fn test_chord_token() {
        assert_eq!(words("G#~~~-B5~~~-E5~~~ ___"), vec!["G#~~~-B5~~~-E5~~~", "_", "_", "_"]);
    }

    #[test]
    fn test_dangling_hyphen_ends_chord() {
        assert_eq!(words("C-E- G"), vec!["C-E", "G"]);
    }

    #[test]
    fn test_markers() {
        assert_eq!(
            kinds("|: A :| ||"),
            vec![
                WordKind::BeginRepeat,
                WordKind::Chord,
                WordKind::EndRepeat,
                WordKind::Halt,
            ]
        );
    }

    #[test]
    fn test_wave_keywords() {
        assert_eq!(
            words("sine sawtooth square triangle"),
            vec!["sine", "sawtooth", "square", "triangle"]
        );
        assert_eq!(kinds("square"), vec![WordKind::Wave]);
    }

    #[test]
    fn test_aliases_need_the_grammar_option() {
        assert!(words("saw tri").is_empty());

        let grammar = Grammar { wave_aliases: true };
        let lexed = tokenize("saw tri sawtooth", grammar);
        let texts: Vec<_> = lexed.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["saw", "tri", "sawtooth"]);
        assert_eq!(grammar.wave_keyword("saw"), Some(WaveType::Sawtooth));
        assert_eq!(grammar.wave_keyword("tri"), Some(WaveType::Triangle));
        assert_eq!(Grammar::default().wave_keyword("saw"), None);
    }

    #[test]
    fn test_comments_are_stripped() {
        assert_eq!(words("// C D E\nF // G\n   // A"), vec!["F"]);
    }

    #[test]
    fn test_lines_join_without_separator() {
        // "C5" and "~" on separate lines become one token once joined.
        assert_eq!(words("C5\n~ E"), vec!["C5~", "E"]);
        assert_eq!(words("A\nB"), vec!["A", "B"]);
    }

    #[test]
    fn test_whitespace_is_not_required() {
        assert_eq!(words("CEG_|:A:|"), vec!["C", "E", "G", "_", "|:", "A", ":|"]);
    }

    #[test]
    fn test_garbage_is_skipped() {
        let lexed = tokenize("C xyz E", Grammar::default());
        let texts: Vec<_> = lexed.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "E"]);
        assert_eq!(lexed.skipped.len(), 1);
        assert_eq!(lexed.skipped[0].text, "xyz");
        assert_eq!(lexed.skipped[0].span, Span::new(2, 5));
    }

    #[test]
    fn test_spans_point_into_source() {
        let source = "// intro\n  C D\n\nsine E";
        let lexed = tokenize(source, Grammar::default());
        for word in &lexed.words {
            assert_eq!(&source[word.span.start..word.span.end], word.text);
        }
        assert_eq!(lexed.words[2].text, "sine");
    }

    #[test]
    fn test_non_ascii_garbage() {
        let lexed = tokenize("C ♪♪ E", Grammar::default());
        assert_eq!(lexed.words.len(), 2);
        assert_eq!(lexed.skipped[0].text, "♪♪");
    }

    #[test]
    fn test_empty_input() {
        let lexed = tokenize("", Grammar::default());
        assert!(lexed.words.is_empty());
        assert!(lexed.skipped.is_empty());
        assert!(words("\n\n   \n// nothing").is_empty());
    }
}
