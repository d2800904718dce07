//! Voice-cloning engines.
//!
//! This module contains adapters for external voice-cloning models.
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `coqui` - Coqui XTTS through the `tts` command line program (Python `TTS` package required)

#[cfg(feature = "coqui")]
pub mod coqui;
