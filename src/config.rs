//! Command line and environment configuration of the web app.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::device::DevicePreference;
use crate::session::GenerateSettings;
use crate::VoiceCloneError;

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "tts_models/multilingual/multi-dataset/xtts_v2";

/// Text the form is pre-filled with.
pub const DEFAULT_TEXT: &str = "Hello, this is a test of instant voice cloning with XTTS model.";

/// Runtime configuration of the voice cloning app.
///
/// Every flag can also be set through a `VOICE_CLONE_*` environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "voice-clone-app", version, about = "Instant voice cloning in the browser")]
pub struct AppConfig {
    /// Address to bind the web server to
    #[arg(long, env = "VOICE_CLONE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "VOICE_CLONE_PORT", default_value_t = 8501)]
    pub port: u16,

    /// Model identifier handed to the engine
    #[arg(long, env = "VOICE_CLONE_MODEL", default_value = DEFAULT_MODEL)]
    pub model_name: String,

    /// Python interpreter with the Coqui `TTS` package installed
    #[arg(long, env = "VOICE_CLONE_PYTHON", default_value = "python3")]
    pub python: PathBuf,

    /// Compute device for inference
    #[arg(long, env = "VOICE_CLONE_DEVICE", value_enum, default_value_t = DevicePreference::Auto)]
    pub device: DevicePreference,

    /// Language code of the text to speak
    #[arg(long, env = "VOICE_CLONE_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Directory for per-request temp files
    #[arg(long, env = "VOICE_CLONE_WORK_DIR", default_value = ".")]
    pub work_dir: PathBuf,

    /// Largest accepted upload, in megabytes
    #[arg(long, env = "VOICE_CLONE_MAX_UPLOAD_MB", default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Accept the Coqui Public Model License without prompting
    #[arg(long, env = "VOICE_CLONE_COQUI_TOS_AGREED")]
    pub coqui_tos_agreed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            model_name: DEFAULT_MODEL.to_string(),
            python: PathBuf::from("python3"),
            device: DevicePreference::Auto,
            language: "en".to_string(),
            work_dir: PathBuf::from("."),
            max_upload_mb: 50,
            coqui_tos_agreed: false,
        }
    }
}

impl AppConfig {
    /// Reject settings that can only fail later.
    pub fn validate(&self) -> Result<(), VoiceCloneError> {
        let invalid = |msg: &str| -> Result<(), VoiceCloneError> {
            Err(VoiceCloneError::Config(msg.to_string()))
        };
        if self.model_name.trim().is_empty() {
            return invalid("model name must not be empty");
        }
        if self.language.trim().is_empty() {
            return invalid("language must not be empty");
        }
        if self.max_upload_mb == 0 {
            return invalid("max upload size must be > 0");
        }
        if !self.work_dir.is_dir() {
            return Err(VoiceCloneError::Config(format!(
                "work dir {} is not a directory",
                self.work_dir.display()
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn generate_settings(&self) -> GenerateSettings {
        GenerateSettings {
            work_dir: self.work_dir.clone(),
            language: self.language.clone(),
        }
    }
}
