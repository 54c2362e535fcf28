//! Non-fatal notes about text the parser ignored.
//!
//! Playback never depends on these. They exist so an editor can show the
//! user why part of a line produced nothing.

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Text outside the grammar, skipped by the tokenizer.
    Unrecognized,
    /// A whole word that produced no directive.
    DroppedWord,
    /// One piece of a chord that is not a valid note.
    DroppedNote,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Unrecognized => "skipped",
            DiagnosticKind::DroppedWord => "ignored",
            DiagnosticKind::DroppedNote => "note ignored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

/// Render diagnostics against their source as plain-text warnings.
pub fn render_report(source: &str, diagnostics: &[Diagnostic]) -> Result<String> {
    let mut out = Vec::new();
    for diagnostic in diagnostics {
        let range = diagnostic.span.start..diagnostic.span.end;
        Report::build(ReportKind::Warning, range.clone())
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(&diagnostic.message)
            .with_label(Label::new(range).with_message(diagnostic.kind.label()))
            .finish()
            .write(Source::from(source), &mut out)?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Grammar;
    use crate::parser::parse_song_with_diagnostics;

    #[test]
    fn report_names_skipped_text() {
        let source = "C D\nE ?? F\n";
        let parsed = parse_song_with_diagnostics(source, Grammar::default());
        assert_eq!(parsed.diagnostics.len(), 1);

        let report = render_report(source, &parsed.diagnostics).unwrap();
        assert!(report.contains("Warning"), "{report}");
        assert!(report.contains("'??' is not part of the notation"), "{report}");
        assert!(report.contains("skipped"), "{report}");
    }

    #[test]
    fn no_diagnostics_renders_nothing() {
        let report = render_report("C D E", &[]).unwrap();
        assert!(report.is_empty());
    }
}
