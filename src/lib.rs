//! # voice-clone-rs
//!
//! A small browser front-end for zero-shot voice cloning. Upload a reference
//! voice sample, type some text, and get the text spoken back in that voice.
//!
//! The neural model itself is an external collaborator reached through the
//! [`VoiceCloningEngine`] trait. This crate only adds the plumbing around it:
//!
//! - **Cached model loading**: one engine handle per process ([`loader`])
//! - **Upload handling**: `.wav` / `.mp3` allow-list ([`upload`])
//! - **Temp-file plumbing**: per-request reference/output paths ([`workspace`])
//! - **Generation flow**: guards, invocation, banners, cleanup ([`session`])
//! - **Web surface**: an axum form page with an embedded player ([`server`], [`ui`])
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! voice-clone-rs = { version = "2026.10", features = ["coqui"] }
//! ```
//!
//! ```ignore
//! use std::path::Path;
//! use voice_clone_rs::{engines::coqui::CoquiEngine, VoiceCloningEngine};
//!
//! let mut engine = CoquiEngine::new();
//! engine.load_model("tts_models/multilingual/multi-dataset/xtts_v2")?;
//!
//! engine.synthesize_to_file(
//!     "Hello, world!",
//!     Path::new("reference.wav"),
//!     "en",
//!     Path::new("output.wav"),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```

pub mod config;
pub mod device;
pub mod engines;
pub mod error;
pub mod loader;
pub mod server;
pub mod session;
pub mod ui;
pub mod upload;
pub mod workspace;

pub use error::VoiceCloneError;

use std::path::Path;

/// Boxed error returned across the engine boundary.
///
/// Engines run on blocking worker threads, so their errors must be `Send + Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The decoded audio of a cloning run.
///
/// Contains raw f32 audio samples and the sample rate of the audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Raw mono audio samples as f32 values in `[-1.0, 1.0]`
    pub samples: Vec<f32>,
    /// Sample rate of the audio (24000 for XTTS v2)
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), BoxError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Read a WAV file produced by an engine.
    ///
    /// Float and integer sample formats are accepted. Multi-channel audio is
    /// downmixed to mono by averaging each frame.
    pub fn read_wav(path: &Path) -> Result<Self, BoxError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect()
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Common interface for voice-cloning engines.
///
/// An engine speaks arbitrary text in the voice of a reference recording,
/// without any per-speaker training. The reference and the result are both
/// exchanged as files, which is the contract of the external models this
/// crate fronts.
pub trait VoiceCloningEngine {
    /// Parameters for configuring model loading (accelerator, interpreter path, etc.)
    type ModelParams: Default;

    /// Load the named model using default parameters.
    fn load_model(&mut self, model_name: &str) -> Result<(), BoxError> {
        self.load_model_with_params(model_name, Self::ModelParams::default())
    }

    /// Load the named model with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_name: &str,
        params: Self::ModelParams,
    ) -> Result<(), BoxError>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Speak `text` in the voice of `speaker_wav`, writing a WAV file to `output_path`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        speaker_wav: &Path,
        language: &str,
        output_path: &Path,
    ) -> Result<(), BoxError>;

    /// Speak `text` in the voice of `speaker_wav` and return the decoded audio.
    ///
    /// Default implementation writes to a scratch file next to the reference
    /// and decodes it. The scratch file is removed when this returns.
    fn synthesize(
        &mut self,
        text: &str,
        speaker_wav: &Path,
        language: &str,
    ) -> Result<SynthesisResult, BoxError> {
        let dir = match speaker_wav.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let scratch = tempfile::Builder::new()
            .suffix("_synthesis.wav")
            .tempfile_in(dir)?
            .into_temp_path();
        self.synthesize_to_file(text, speaker_wav, language, &scratch)?;
        SynthesisResult::read_wav(&scratch)
    }
}
