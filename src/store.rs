//! Autosave for the song text.
//!
//! The stored value is the raw notation string under one fixed key. There is
//! no schema and no versioning.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::Result;

/// Key the song is saved under.
pub const AUTOSAVE_KEY: &str = "song_autosave";

pub trait SongStore {
    /// The saved song, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;
    fn save(&mut self, song: &str) -> Result<()>;
}

/// Keeps the song in memory. Used by tests and the WASM build, where the host
/// page owns real persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    song: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_song(song: impl Into<String>) -> Self {
        MemoryStore {
            song: Some(song.into()),
        }
    }
}

impl SongStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.song.clone())
    }

    fn save(&mut self, song: &str) -> Result<()> {
        self.song = Some(song.to_string());
        Ok(())
    }
}

/// Stores the song as `song_autosave.txt` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        FileStore {
            path: dir.as_ref().join(format!("{AUTOSAVE_KEY}.txt")),
        }
    }

    /// The platform data directory for this application, if the platform has
    /// one.
    pub fn default_location() -> Option<FileStore> {
        ProjectDirs::from("net", "tonestep", "tonestep").map(|dirs| FileStore::new(dirs.data_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SongStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(song) => Ok(Some(song)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, song: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, song)?;
        Ok(())
    }
}
