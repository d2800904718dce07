//! Coqui XTTS voice-cloning engine.
//!
//! The model lives in a Python worker process running the Coqui `TTS`
//! package. Loading the engine starts the worker, which instantiates the
//! model once; every synthesis is then a JSON line over the worker's stdin
//! and stdout. XTTS v2 clones a voice from a few seconds of reference audio
//! and speaks 17 languages.
//!
//! # System Requirements
//!
//! A Python interpreter with the `TTS` package (`python3` on PATH, or set
//! [`CoquiModelParams::python`]):
//! - `pip install TTS`
//!
//! The first load downloads the model weights (about 1.8 GB) into the Coqui
//! cache directory. XTTS is released under the Coqui Public Model License;
//! set [`CoquiModelParams::tos_agreed`] once you have accepted it, otherwise
//! loading stops to ask.
//!
//! # Language Support
//!
//! | Code | Language | Code | Language |
//! |---|---|---|---|
//! | `en` | English | `pl` | Polish |
//! | `es` | Spanish | `tr` | Turkish |
//! | `fr` | French | `ru` | Russian |
//! | `de` | German | `nl` | Dutch |
//! | `it` | Italian | `cs` | Czech |
//! | `pt` | Portuguese | `ar` | Arabic |
//! | `zh-cn` | Mandarin Chinese | `hu` | Hungarian |
//! | `ja` | Japanese | `ko` | Korean |
//! | `hi` | Hindi | | |
//!
//! # Examples
//!
//! ```rust,no_run
//! use voice_clone_rs::{VoiceCloningEngine, engines::coqui::{CoquiEngine, CoquiModelParamsBuilder}};
//! use std::path::Path;
//!
//! let params = CoquiModelParamsBuilder::default()
//!     .use_cuda(true)
//!     .tos_agreed(true)
//!     .build()?;
//!
//! let mut engine = CoquiEngine::new();
//! engine.load_model_with_params(voice_clone_rs::engines::coqui::XTTS_V2, params)?;
//! engine.synthesize_to_file(
//!     "Bonjour tout le monde !",
//!     Path::new("me.wav"),
//!     "fr",
//!     Path::new("bonjour.wav"),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```

pub mod engine;
pub mod worker;

pub use worker::{CoquiError, XTTS_V2};
pub use engine::{CoquiEngine, CoquiModelParams, CoquiModelParamsBuilder};
