//! Error types for the environment-facing parts of the crate.
//!
//! Malformed notation never produces an error: the tokenizer and parser drop
//! what they cannot read and report it through [`crate::diagnostics`]
//! instead. The variants here cover configuration values, the autosave store,
//! and WAV export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TonestepError {
    /// A configuration value is out of range or unknown.
    ///
    /// ```
    /// # use tonestep_core::error::TonestepError;
    /// let err = TonestepError::Config("bpm must be positive, got 0".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: bpm must be positive, got 0");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading or writing the autosaved song (or a report buffer) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON configuration document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoding rendered audio as WAV failed.
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, TonestepError>;
