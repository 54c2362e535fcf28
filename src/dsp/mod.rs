//! Sound synthesis for offline rendering.
//!
//! The player only emits [`crate::tone::Tone`] values; this module turns a
//! stream of them into samples. The same code backs WAV export natively and
//! in the WASM build.

pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
pub mod voice;
