//! Grid model for displaying a song.
//!
//! Only chords and rests get a cell. The other directives decorate the cell
//! next to them: a voice change labels the following cell, `|:` prefixes it,
//! and `:|` or `||` are appended to the cell before them.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::ast::{Directive, WaveType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Text shown in the cell, e.g. `|: C4-E4 :|`.
    pub label: String,
    /// Voice change that takes effect on this cell.
    pub voice: Option<WaveType>,
    /// Index of the chord or rest this cell shows.
    pub directive_index: usize,
    /// Where to put the head so that one beat lands on this cell: the
    /// previous cell's directive, or -1 for the first cell.
    pub seek_index: isize,
    /// The head is on this cell.
    pub active: bool,
    /// Last cell of a beat.
    pub beat_break: bool,
    /// Last cell of a four-bar line.
    pub bar_break: bool,
}

/// Grid columns per row.
pub fn columns(subdivisions: NonZeroU32, beats_per_bar: NonZeroU32) -> u32 {
    subdivisions.get().saturating_mul(beats_per_bar.get())
}

pub fn cells(
    directives: &[Directive],
    head: isize,
    subdivisions: NonZeroU32,
    beats_per_bar: NonZeroU32,
) -> Vec<Cell> {
    let per_beat = subdivisions.get() as usize;
    let per_line = per_beat
        .saturating_mul(beats_per_bar.get() as usize)
        .saturating_mul(4);

    let mut cells: Vec<Cell> = Vec::new();
    let mut voice = None;
    let mut prefix = String::new();
    let mut previous: isize = -1;

    for (index, directive) in directives.iter().enumerate() {
        match directive {
            Directive::Voice { wave } => {
                voice = Some(*wave);
                continue;
            }
            Directive::BeginRepeat => {
                prefix.push_str("|:");
                continue;
            }
            Directive::EndRepeat | Directive::Halt => {
                if let Some(last) = cells.last_mut() {
                    last.label.push_str(&directive.to_string());
                }
                continue;
            }
            Directive::Chord(_) | Directive::Rest => {}
        }

        let position = cells.len();
        let label = if prefix.is_empty() {
            directive.to_string()
        } else {
            format!("{prefix} {directive}")
        };
        cells.push(Cell {
            label,
            voice: voice.take(),
            directive_index: index,
            seek_index: previous,
            active: index as isize == head,
            beat_break: position > 0 && per_beat != 1 && (position + 1) % per_beat == 0,
            bar_break: position > 0 && (position + 1) % per_line == 0,
        });
        prefix.clear();
        previous = index as isize;
    }
    cells
}
