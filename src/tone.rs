//! The contract between the player and whatever makes sound.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ast::WaveType;

/// One note to sound. Chords produce one tone per note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tone {
    pub frequency: f64,
    pub wave_type: WaveType,
    pub sustain_ms: f64,
}

/// Fire-and-forget sound output. The player never waits on it and never
/// sees a result.
pub trait ToneRenderer {
    fn render(&mut self, tone: Tone);
}

/// Discards every tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ToneRenderer for Silent {
    fn render(&mut self, _tone: Tone) {}
}

/// Records tones into a shared queue.
///
/// Clones share the same queue, so one clone can be handed to the player
/// while another is kept to read or drain what was played.
#[derive(Debug, Clone, Default)]
pub struct ToneLog {
    tones: Rc<RefCell<Vec<Tone>>>,
}

impl ToneLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.tones.borrow().clone()
    }

    /// Take everything recorded so far.
    pub fn drain(&self) -> Vec<Tone> {
        std::mem::take(&mut *self.tones.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.tones.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.borrow().is_empty()
    }
}

impl ToneRenderer for ToneLog {
    fn render(&mut self, tone: Tone) {
        self.tones.borrow_mut().push(tone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(frequency: f64) -> Tone {
        Tone {
            frequency,
            wave_type: WaveType::Sine,
            sustain_ms: 400.0,
        }
    }

    #[test]
    fn clones_share_the_queue() {
        let log = ToneLog::new();
        let mut renderer = log.clone();
        renderer.render(tone(440.0));
        renderer.render(tone(880.0));
        assert_eq!(log.len(), 2);

        let drained = log.drain();
        assert_eq!(drained[1].frequency, 880.0);
        assert!(log.is_empty());
        assert!(renderer.tones().is_empty());
    }
}
