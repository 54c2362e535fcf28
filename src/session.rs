//! The editor-facing controller.
//!
//! A [`Session`] ties the song text, its autosave, and the [`Player`]
//! together. Host UIs feed raw input (text edits, form values, clicks) in
//! here and redraw from [`Session::cells`] when the player reports a change.

use std::num::NonZeroU32;

use crate::ast::WaveType;
use crate::config::{parse_positive, PlayerConfig};
use crate::diagnostics::Diagnostic;
use crate::layout::{self, Cell};
use crate::parser::{parse_song, parse_song_with_diagnostics};
use crate::player::{Change, Player};
use crate::store::SongStore;
use crate::tutorial::TUTORIAL;

pub struct Session<S: SongStore> {
    player: Player,
    store: S,
    config: PlayerConfig,
    song: String,
}

impl<S: SongStore> Session<S> {
    /// Create a session and restore the autosaved song, if there is one.
    ///
    /// A store that fails to load is logged and treated as empty.
    pub fn open(config: PlayerConfig, player: Player, store: S) -> Self {
        let mut session = Session {
            player,
            store,
            config,
            song: String::new(),
        };
        match session.store.load() {
            Ok(Some(song)) if !song.is_empty() => session.set_song(&song),
            Ok(_) => {}
            Err(e) => log::warn!("could not restore autosaved song: {e}"),
        }
        session
    }

    /// The user changed the song text: save it, then apply it.
    pub fn edit(&mut self, text: &str) {
        if let Err(e) = self.store.save(text) {
            log::warn!("autosave failed: {e}");
        }
        self.set_song(text);
    }

    /// Apply song text without saving it. The player only sees new
    /// directives when the parse actually differs.
    pub fn set_song(&mut self, text: &str) {
        self.song = text.to_string();
        let directives = parse_song(text, self.config.grammar());
        if self.player.directives() != directives.as_slice() {
            self.player.set_directives(directives);
        }
    }

    /// Replace the song with the built-in tutorial. Not autosaved.
    pub fn load_tutorial(&mut self) {
        self.set_song(TUTORIAL);
    }

    pub fn toggle_autoplay(&mut self) {
        self.player.toggle();
    }

    /// Play exactly one beat.
    pub fn play_next(&mut self) {
        self.player.advance_beat();
    }

    pub fn reset(&mut self) {
        self.player.reset();
    }

    /// Raw tempo field input. Anything but a positive integer is ignored.
    pub fn input_bpm(&mut self, input: &str) -> bool {
        let Some(bpm) = parse_positive(input) else {
            return false;
        };
        self.config.bpm = bpm;
        self.player.set_bpm(bpm);
        true
    }

    pub fn input_subdivisions(&mut self, input: &str) -> bool {
        let Some(subdivisions) = parse_positive(input) else {
            return false;
        };
        self.config.subdivisions = subdivisions;
        self.player.set_subdivisions(subdivisions);
        true
    }

    /// Only affects the grid.
    pub fn input_beats_per_bar(&mut self, input: &str) -> bool {
        let Some(beats) = parse_positive(input) else {
            return false;
        };
        self.config.beats_per_bar = beats;
        true
    }

    /// Wave selector input. Only the four canonical names are accepted.
    pub fn select_wave(&mut self, name: &str) -> bool {
        match WaveType::from_name(name) {
            Some(wave) => {
                self.player.set_wave_type(wave);
                true
            }
            None => false,
        }
    }

    /// Jump so that the next beat lands on `cell`, and play it.
    pub fn click(&mut self, cell: &Cell) {
        self.player.seek(cell.seek_index);
        self.player.clear_repeats();
        self.player.advance_beat();
    }

    pub fn cells(&self) -> Vec<Cell> {
        layout::cells(
            self.player.directives(),
            self.player.head(),
            self.player.subdivisions(),
            self.config.beats_per_bar,
        )
    }

    pub fn columns(&self) -> u32 {
        layout::columns(self.player.subdivisions(), self.config.beats_per_bar)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        parse_song_with_diagnostics(&self.song, self.config.grammar()).diagnostics
    }

    pub fn subscribe(&mut self, observer: impl FnMut(Change) + 'static) {
        self.player.subscribe(observer);
    }

    pub fn song(&self) -> &str {
        &self.song
    }

    pub fn beats_per_bar(&self) -> NonZeroU32 {
        self.config.beats_per_bar
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
