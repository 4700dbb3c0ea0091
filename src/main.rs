//! Liver disease risk prediction service.
//!
//! Main entry point for the HTTP server.

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use liver_risk::adapters::sanitize::SanitizingMakeWriter;
use liver_risk::adapters::ArtifactLocator;
use liver_risk::application::ArtifactsHandle;
use liver_risk::config::{LogMode, ServiceConfig};
use liver_risk::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env()?;

    let (writer, _guard) = match config.log_mode {
        LogMode::File => {
            if let Some(parent) = config.log_file.parent() {
                // Best-effort: opening the file reports the real problem.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting liver risk service...");

    let locator = ArtifactLocator::new(config.artifact_dir.clone());
    let artifacts = ArtifactsHandle::load_or_unready(&locator);
    tracing::info!(
        model_loaded = artifacts.model_loaded(),
        scaler_loaded = artifacts.scaler_loaded(),
        max_inflight = config.max_inflight,
        "Artifacts ready"
    );

    let state = Arc::new(AppState::new(artifacts, config.max_inflight));
    liver_risk::api::serve(&config, state).await?;

    tracing::info!("Liver risk service shutdown complete.");
    Ok(())
}
