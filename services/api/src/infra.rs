use metrics_exporter_prometheus::PrometheusHandle;
use pulseguard::config::{AppConfig, ModelConfig};
use pulseguard::error::AppError;
use pulseguard::telemetry;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Config and logging for one-shot CLI commands, with an optional model override.
pub(crate) fn cli_model_config(model: Option<PathBuf>) -> Result<ModelConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    Ok(match model {
        Some(artifact_path) => ModelConfig { artifact_path },
        None => config.model,
    })
}
