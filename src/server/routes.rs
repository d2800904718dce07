//! Page, form and health handlers.
//!
//! Every page handler first makes sure the model is loaded. A load failure
//! replaces the whole page with the error.

use std::sync::{Arc, PoisonError};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Serialize;

use crate::config::DEFAULT_TEXT;
use crate::loader::SharedEngine;
use crate::session::{self, Banner, GenerateOutcome};
use crate::ui::{self, PageView};
use crate::upload::ReferenceUpload;
use crate::{VoiceCloneError, VoiceCloningEngine};

use super::AppState;

const FILE_FIELD: &str = "reference_audio";
const TEXT_FIELD: &str = "text";

type Page = (StatusCode, Html<String>);

pub(super) async fn index<E>(State(state): State<Arc<AppState<E>>>) -> Page
where
    E: VoiceCloningEngine + Send + 'static,
{
    if let Err(e) = load_engine(&state).await {
        return load_failure(&e);
    }

    let banners = [model_banner(&state)];
    let html = ui::render_page(&PageView {
        model_name: state.models.model_name(),
        banners: &banners,
        text: DEFAULT_TEXT,
        audio: None,
    });
    (StatusCode::OK, Html(html))
}

pub(super) async fn generate<E>(
    State(state): State<Arc<AppState<E>>>,
    mut multipart: Multipart,
) -> Page
where
    E: VoiceCloningEngine + Send + 'static,
{
    let engine = match load_engine(&state).await {
        Ok(engine) => engine,
        Err(e) => return load_failure(&e),
    };

    let (status, form_text, outcome) = match read_form(&mut multipart).await {
        Ok(GenerateForm { upload, text }) => match upload.transpose() {
            Ok(upload) => {
                let outcome = run_generation(&state, engine, upload, text.clone()).await;
                (StatusCode::OK, text, outcome)
            }
            Err(e) => {
                log::warn!("Rejected reference upload: {e}");
                (StatusCode::OK, text, GenerateOutcome::warning(e.to_string()))
            }
        },
        Err(e) => {
            log::warn!("Rejected form submission: {e}");
            let status = match &e {
                VoiceCloneError::Multipart(e) => e.status(),
                _ => StatusCode::BAD_REQUEST,
            };
            (
                status,
                String::new(),
                GenerateOutcome {
                    banners: vec![Banner::error(e.to_string())],
                    audio: None,
                },
            )
        }
    };

    let mut banners = vec![model_banner(&state)];
    banners.extend(outcome.banners);
    let html = ui::render_page(&PageView {
        model_name: state.models.model_name(),
        banners: &banners,
        text: &form_text,
        audio: outcome.audio.as_deref(),
    });
    (status, Html(html))
}

#[derive(Debug, Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    model: String,
    model_loaded: bool,
}

pub(super) async fn health<E>(State(state): State<Arc<AppState<E>>>) -> Json<HealthResponse>
where
    E: VoiceCloningEngine + Send + 'static,
{
    Json(HealthResponse {
        status: "ok",
        model: state.models.model_name().to_string(),
        model_loaded: state.models.is_loaded(),
    })
}

/// The submitted form.
///
/// `upload` is `None` when no file was chosen and `Some(Err(_))` when the
/// file was refused. The text is read either way.
struct GenerateForm {
    upload: Option<Result<ReferenceUpload, VoiceCloneError>>,
    text: String,
}

async fn read_form(multipart: &mut Multipart) -> Result<GenerateForm, VoiceCloneError> {
    let mut upload = None;
    let mut text = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            FILE_FIELD => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await?;
                // Browsers submit an empty, nameless part when no file is chosen.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                upload = Some(ReferenceUpload::new(file_name, bytes.to_vec()));
            }
            TEXT_FIELD => text = field.text().await?,
            _ => {}
        }
    }

    Ok(GenerateForm { upload, text })
}

async fn run_generation<E>(
    state: &Arc<AppState<E>>,
    engine: SharedEngine<E>,
    upload: Option<ReferenceUpload>,
    text: String,
) -> GenerateOutcome
where
    E: VoiceCloningEngine + Send + 'static,
{
    let state = Arc::clone(state);
    let task = tokio::task::spawn_blocking(move || {
        let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
        session::generate(&mut *engine, &state.settings, upload.as_ref(), &text)
    });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            let e = VoiceCloneError::from(e);
            log::error!("{e}");
            GenerateOutcome {
                banners: vec![Banner::error(format!("Audio generation failed: {e}"))],
                audio: None,
            }
        }
    }
}

async fn load_engine<E>(state: &Arc<AppState<E>>) -> Result<SharedEngine<E>, VoiceCloneError>
where
    E: VoiceCloningEngine + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || state.models.get_or_load()).await?
}

fn model_banner<E>(state: &AppState<E>) -> Banner {
    Banner::success(format!(
        "XTTS model '{}' loaded successfully!",
        state.models.model_name()
    ))
}

fn load_failure(e: &VoiceCloneError) -> Page {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(ui::render_load_failure(&e.to_string())),
    )
}
