//! Validation of the uploaded reference sample.

use std::path::Path;

use crate::VoiceCloneError;

/// Extensions accepted for the reference sample.
pub const ALLOWED_EXTENSIONS: &[&str] = &["wav", "mp3"];

/// Container format of a reference sample, judged by its file name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Match a file name against the allow-list, ignoring case.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }
}

/// A reference voice sample as received from the browser.
///
/// The bytes are never inspected. A corrupt file with a valid extension is
/// accepted here and left for the engine to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceUpload {
    pub file_name: String,
    pub format: AudioFormat,
    pub bytes: Vec<u8>,
}

impl ReferenceUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, VoiceCloneError> {
        let file_name = file_name.into();
        let format = AudioFormat::from_file_name(&file_name)
            .ok_or_else(|| VoiceCloneError::UnsupportedFormat(file_name.clone()))?;
        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }
}
