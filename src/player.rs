//! Step sequencer with nested repeats.
//!
//! The player walks a directive list one beat at a time, either when the host
//! asks for a manual step or when the autoplay [`Metronome`] fires. Chords and
//! rests take a beat. Voice changes and repeat markers execute in between, so
//! a single beat may pass over several directives.
//!
//! Repeats are tracked on two parallel stacks. Entering `|:` pushes its index
//! on the begin stack. Reaching a `:|` for the first time pushes its index on
//! the end stack and jumps back to the innermost `|:`; reaching it again
//! (it is the top of the end stack) pops both and falls through. Each level of
//! nesting therefore plays its body twice.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ast::{Directive, WaveType};
use crate::clock::{beat_interval, Metronome};
use crate::config::PlayerConfig;
use crate::error::{Result, TonestepError};
use crate::tone::{Tone, ToneRenderer};

/// Which observable part of the player changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Change {
    Directives,
    Head,
    WaveType,
    Tempo,
    Subdivisions,
    /// Autoplay started or stopped.
    Autoplay,
}

type Observer = Box<dyn FnMut(Change)>;

pub struct Player {
    directives: Vec<Directive>,
    /// Index of the last executed directive; -1 before the first.
    head: isize,
    wave_type: WaveType,
    bpm: NonZeroU32,
    subdivisions: NonZeroU32,
    note_length_ms: f64,
    /// Present exactly while autoplay is running.
    metronome: Option<Metronome>,
    begin_repeats: Vec<usize>,
    end_repeats: Vec<usize>,
    renderer: Box<dyn ToneRenderer>,
    observers: Vec<Observer>,
}

impl Player {
    pub fn new(renderer: impl ToneRenderer + 'static) -> Self {
        Self::with_config(&PlayerConfig::default(), renderer)
    }

    pub fn with_config(config: &PlayerConfig, renderer: impl ToneRenderer + 'static) -> Self {
        Player {
            directives: Vec::new(),
            head: -1,
            wave_type: config.wave_type,
            bpm: config.bpm,
            subdivisions: config.subdivisions,
            note_length_ms: config.note_length_ms,
            metronome: None,
            begin_repeats: Vec::new(),
            end_repeats: Vec::new(),
            renderer: Box::new(renderer),
            observers: Vec::new(),
        }
    }

    /// Register a callback invoked synchronously after every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(Change) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: Change) {
        for observer in &mut self.observers {
            observer(change);
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn head(&self) -> isize {
        self.head
    }

    /// The directive at the head, if the head is on one.
    pub fn current(&self) -> Option<&Directive> {
        usize::try_from(self.head)
            .ok()
            .and_then(|i| self.directives.get(i))
    }

    pub fn wave_type(&self) -> WaveType {
        self.wave_type
    }

    pub fn bpm(&self) -> NonZeroU32 {
        self.bpm
    }

    pub fn subdivisions(&self) -> NonZeroU32 {
        self.subdivisions
    }

    pub fn is_running(&self) -> bool {
        self.metronome.is_some()
    }

    /// Time between autoplay beats at the current tempo.
    pub fn interval(&self) -> Duration {
        beat_interval(self.bpm, self.subdivisions)
    }

    pub fn begin_repeats(&self) -> &[usize] {
        &self.begin_repeats
    }

    pub fn end_repeats(&self) -> &[usize] {
        &self.end_repeats
    }

    // ── Setters ─────────────────────────────────────────────

    /// Replace the song. Returns `false`, and notifies nobody, when the new
    /// sequence equals the current one.
    ///
    /// Head, wave type, and open repeats carry over. Anything that would point
    /// past the end of a shorter song is pulled back inside it.
    pub fn set_directives(&mut self, directives: Vec<Directive>) -> bool {
        if self.directives == directives {
            return false;
        }
        self.directives = directives;

        let len = self.directives.len();
        self.begin_repeats.retain(|&i| i < len);
        self.end_repeats.retain(|&i| i < len);
        self.notify(Change::Directives);
        if self.head >= len as isize {
            self.set_head(len as isize - 1);
        }
        true
    }

    pub fn set_wave_type(&mut self, wave_type: WaveType) {
        if self.wave_type != wave_type {
            self.wave_type = wave_type;
            self.notify(Change::WaveType);
        }
    }

    /// Change the tempo. A running autoplay restarts at the new interval
    /// without moving the head.
    pub fn set_bpm(&mut self, bpm: NonZeroU32) {
        if self.bpm == bpm {
            return;
        }
        self.bpm = bpm;
        self.notify(Change::Tempo);
        if self.is_running() {
            self.start();
        }
    }

    pub fn try_set_bpm(&mut self, bpm: u32) -> Result<()> {
        let bpm = NonZeroU32::new(bpm)
            .ok_or_else(|| TonestepError::Config("bpm must be positive, got 0".to_string()))?;
        self.set_bpm(bpm);
        Ok(())
    }

    pub fn set_subdivisions(&mut self, subdivisions: NonZeroU32) {
        if self.subdivisions == subdivisions {
            return;
        }
        self.subdivisions = subdivisions;
        self.notify(Change::Subdivisions);
        if self.is_running() {
            self.start();
        }
    }

    pub fn try_set_subdivisions(&mut self, subdivisions: u32) -> Result<()> {
        let subdivisions = NonZeroU32::new(subdivisions).ok_or_else(|| {
            TonestepError::Config("subdivisions must be positive, got 0".to_string())
        })?;
        self.set_subdivisions(subdivisions);
        Ok(())
    }

    fn set_head(&mut self, head: isize) {
        if self.head != head {
            self.head = head;
            self.notify(Change::Head);
        }
    }

    // ── Transport ───────────────────────────────────────────

    /// Start (or restart) autoplay.
    ///
    /// When the next directive is a halt the head steps onto it first, so
    /// resuming after a halt plays on instead of stopping again.
    pub fn start(&mut self) {
        let was_running = self.metronome.take().is_some();

        let len = self.directives.len();
        if len > 0 {
            let next = (self.head + 1).rem_euclid(len as isize);
            if self.directives[next as usize] == Directive::Halt {
                self.set_head(next);
            }
        }

        let interval = self.interval();
        self.metronome = Some(Metronome::new(interval));
        log::info!("autoplay started at {interval:?} per step, head {}", self.head);
        if !was_running {
            self.notify(Change::Autoplay);
        }
    }

    /// Stop autoplay. Does nothing when already stopped.
    pub fn stop(&mut self) {
        if self.metronome.take().is_some() {
            log::info!("autoplay stopped at head {}", self.head);
            self.notify(Change::Autoplay);
        }
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Stop, rewind to before the first directive, and forget open repeats.
    pub fn reset(&mut self) {
        self.stop();
        self.set_head(-1);
        self.clear_repeats();
    }

    /// Put the head on `index` (clamped to `-1..len`). Repeat bookkeeping is
    /// left alone; call [`Player::clear_repeats`] when jumping.
    pub fn seek(&mut self, index: isize) {
        let last = self.directives.len() as isize - 1;
        self.set_head(index.clamp(-1, last));
    }

    pub fn clear_repeats(&mut self) {
        self.begin_repeats.clear();
        self.end_repeats.clear();
    }

    /// Feed elapsed wall-clock time to the autoplay timer, playing one beat
    /// per full interval. Time left over when a halt stops playback is
    /// dropped.
    pub fn tick(&mut self, elapsed: Duration) {
        let Some(metronome) = self.metronome.as_mut() else {
            return;
        };
        metronome.accumulate(elapsed);
        while self.metronome.as_mut().is_some_and(|m| m.take_tick()) {
            self.advance_beat();
        }
    }

    // ── Stepping ────────────────────────────────────────────

    /// Play directives until one takes a beat.
    ///
    /// Gives up after a full lap back to where it started, so a song (or a
    /// repeat) made only of voice changes and markers cannot spin forever.
    pub fn advance_beat(&mut self) {
        let len = self.directives.len() as isize;
        if len == 0 {
            return;
        }
        let start = (self.head + len) % len;
        while !self.process_next_directive() && self.head != start {}
    }

    /// Move the head forward one directive (wrapping) and execute it.
    /// Returns whether it took a beat.
    pub fn process_next_directive(&mut self) -> bool {
        let len = self.directives.len() as isize;
        if len == 0 {
            return false;
        }
        let next = (self.head + 1).rem_euclid(len);
        self.set_head(next);
        let index = next as usize;

        match self.directives[index] {
            Directive::Chord(ref chord) => {
                log::trace!("beat {index}: {chord}");
                for note in &chord.notes {
                    self.renderer.render(Tone {
                        frequency: note.frequency(),
                        wave_type: self.wave_type,
                        sustain_ms: note.sustain as f64 * self.note_length_ms,
                    });
                }
                true
            }
            Directive::Rest => true,
            Directive::Voice { wave } => {
                self.set_wave_type(wave);
                false
            }
            Directive::Halt => {
                if self.is_running() {
                    log::debug!("halt at {index}");
                    self.set_head(next - 1);
                    self.stop();
                    true
                } else {
                    false
                }
            }
            Directive::BeginRepeat => {
                self.begin_repeats.push(index);
                false
            }
            Directive::EndRepeat => {
                if self.end_repeats.last() == Some(&index) {
                    self.end_repeats.pop();
                    self.begin_repeats.pop();
                    log::debug!("repeat closed at {index}");
                } else if let Some(&begin) = self.begin_repeats.last() {
                    self.end_repeats.push(index);
                    log::debug!("repeat at {index} jumps back to {begin}");
                    self.set_head(begin as isize);
                }
                false
            }
        }
    }
}
