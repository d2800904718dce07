use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use voice_clone_rs::config::AppConfig;
use voice_clone_rs::engines::coqui::{CoquiEngine, CoquiModelParams};
use voice_clone_rs::loader::ModelCache;
use voice_clone_rs::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::parse();
    config.validate()?;

    let python = config.python.clone();
    let tos_agreed = config.coqui_tos_agreed;
    let models = ModelCache::<CoquiEngine>::for_engine(
        config.model_name.clone(),
        config.device,
        move |use_cuda| CoquiModelParams {
            use_cuda,
            python: python.clone(),
            tos_agreed,
        },
    );

    let state = Arc::new(AppState::from_config(&config, models));
    let app = server::router(state, config.max_upload_bytes());

    let addr = config
        .bind_addr()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!(
        "Voice cloning app listening on http://{addr} (model '{}', language '{}')",
        config.model_name,
        config.language
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
