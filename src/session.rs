//! One press of the "Generate Audio" button.
//!
//! The flow is strictly linear: guard the inputs, save the reference,
//! invoke the engine, read the result, clean up. Every step reports to the
//! user through [`Banner`]s rather than through a returned error, so the
//! page can always be re-rendered with the form ready for another attempt.

use std::path::PathBuf;

use crate::upload::ReferenceUpload;
use crate::workspace::RequestFiles;
use crate::{VoiceCloneError, VoiceCloningEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// An inline status message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn new(level: BannerLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Error, message)
    }
}

/// What the page shows after a generation attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub banners: Vec<Banner>,
    /// WAV bytes for the audio player, present only on success.
    pub audio: Option<Vec<u8>>,
}

impl GenerateOutcome {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            banners: vec![Banner::warning(message)],
            audio: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.audio.is_some()
    }

    fn push(&mut self, banner: Banner) {
        self.banners.push(banner);
    }
}

/// Fixed inputs of every generation in this process.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    /// Directory the per-request temp files live in.
    pub work_dir: PathBuf,
    /// Language code passed to the engine, e.g. `"en"`.
    pub language: String,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            language: "en".to_string(),
        }
    }
}

/// Run one generation.
///
/// Missing inputs produce a warning without touching the disk or the engine.
/// Engine failures produce an error banner. Both temp files are gone when
/// this returns, whatever happened.
pub fn generate<E>(
    engine: &mut E,
    settings: &GenerateSettings,
    upload: Option<&ReferenceUpload>,
    text: &str,
) -> GenerateOutcome
where
    E: VoiceCloningEngine + ?Sized,
{
    let Some(upload) = upload else {
        return GenerateOutcome::warning(VoiceCloneError::MissingUpload.to_string());
    };
    if text.is_empty() {
        return GenerateOutcome::warning(VoiceCloneError::EmptyText.to_string());
    }

    let files = match RequestFiles::new(&settings.work_dir) {
        Ok(files) => files,
        Err(e) => {
            let e = VoiceCloneError::from(e);
            log::error!("Could not create temp files in {}: {e}", settings.work_dir.display());
            return GenerateOutcome {
                banners: vec![Banner::error(format!("Audio generation failed: {e}"))],
                audio: None,
            };
        }
    };
    log::info!(
        "Request {}: {} chars of text, {} byte {:?} reference '{}'",
        files.id(),
        text.chars().count(),
        upload.bytes.len(),
        upload.format,
        upload.file_name
    );

    let mut outcome = GenerateOutcome::default();
    match run(engine, settings, upload, text, &files, &mut outcome) {
        Ok(audio) => {
            log::info!("Request {}: produced {} bytes of audio", files.id(), audio.len());
            outcome.audio = Some(audio);
        }
        Err(e) => {
            log::error!("Request {}: {e}", files.id());
            outcome.push(Banner::error(format!("Audio generation failed: {e}")));
        }
    }

    files.cleanup();
    outcome
}

fn run<E>(
    engine: &mut E,
    settings: &GenerateSettings,
    upload: &ReferenceUpload,
    text: &str,
    files: &RequestFiles,
    outcome: &mut GenerateOutcome,
) -> Result<Vec<u8>, VoiceCloneError>
where
    E: VoiceCloningEngine + ?Sized,
{
    files.write_reference(&upload.bytes)?;

    outcome.push(Banner::info(format!(
        "Reference audio saved to: {}",
        files.reference_path().display()
    )));
    outcome.push(Banner::info(format!("Text to speak: {text}")));

    engine
        .synthesize_to_file(
            text,
            files.reference_path(),
            &settings.language,
            files.output_path(),
        )
        .map_err(VoiceCloneError::Synthesis)?;

    outcome.push(Banner::success("Audio generated successfully!"));
    Ok(files.read_output()?)
}
