//! Errors surfaced by the app, most of them straight into a page banner.

use crate::BoxError;

#[derive(thiserror::Error, Debug)]
pub enum VoiceCloneError {
    #[error("Failed to load model '{model}': {source}")]
    ModelLoad {
        model: String,
        #[source]
        source: BoxError,
    },
    #[error("{0}")]
    Synthesis(#[source] BoxError),
    #[error("Unsupported reference audio '{0}'. Upload a .wav or .mp3 file.")]
    UnsupportedFormat(String),
    #[error("Please upload a reference audio file first.")]
    MissingUpload,
    #[error("Please enter some text in the text area.")]
    EmptyText,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid form submission: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("Generation task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
