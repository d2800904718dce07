//! Web front-end.
//!
//! Three routes, all served from one shared [`AppState`]:
//!
//! - `GET /`          the form page; loads the model on first visit
//! - `POST /generate` multipart form submission (`reference_audio`, `text`)
//! - `GET /health`    JSON liveness and model status

mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AppConfig;
use crate::loader::ModelCache;
use crate::session::GenerateSettings;
use crate::VoiceCloningEngine;

/// State shared by every request.
pub struct AppState<E> {
    /// Lazily loaded engine, shared for the life of the process.
    pub models: ModelCache<E>,
    /// Work dir and language for every generation.
    pub settings: GenerateSettings,
}

impl<E> AppState<E> {
    pub fn new(models: ModelCache<E>, settings: GenerateSettings) -> Self {
        Self { models, settings }
    }

    pub fn from_config(config: &AppConfig, models: ModelCache<E>) -> Self {
        Self::new(models, config.generate_settings())
    }
}

/// Build the router. Request bodies larger than `max_upload_bytes` are rejected.
pub fn router<E>(state: Arc<AppState<E>>, max_upload_bytes: usize) -> Router
where
    E: VoiceCloningEngine + Send + 'static,
{
    Router::new()
        .route("/", get(routes::index::<E>))
        .route("/generate", post(routes::generate::<E>))
        .route("/health", get(routes::health::<E>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
