mod artifact;
mod model;

pub use artifact::{load_model, LinearModel, ModelArtifact, ModelLoadError, MultiClass};
pub use model::{ExclusiveModel, ModelCapabilities, ModelError, RiskModel, Serialized};

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::encoder::EncodedVector;
use super::stage::{RiskStage, StageIndexError};
use crate::config::ModelConfig;

/// Confidence reported when a model predicts but offers no usable probabilities.
pub const PLACEHOLDER_CONFIDENCE: f64 = 85.0;

/// Confidence attached to simulated predictions.
pub const SIMULATED_CONFIDENCE: f64 = 87.5;

/// Where a prediction's confidence figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    ModelProbability,
    Placeholder,
    Simulated,
}

/// Outcome of a single classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    stage: RiskStage,
    confidence: f64,
    confidence_source: ConfidenceSource,
}

impl PredictionResult {
    pub fn stage(&self) -> RiskStage {
        self.stage
    }

    pub fn class_index(&self) -> usize {
        self.stage.index()
    }

    /// Confidence as a percentage in [0, 100].
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn confidence_source(&self) -> ConfidenceSource {
        self.confidence_source
    }

    /// True when no trained model was consulted and the stage was drawn at random.
    pub fn is_simulated(&self) -> bool {
        self.confidence_source == ConfidenceSource::Simulated
    }
}

enum Backend {
    Model {
        model: Arc<dyn RiskModel>,
        probabilities: bool,
    },
    Simulated,
}

/// Uniform front for a trained model or the simulated fallback.
pub struct ClassifierAdapter {
    backend: Backend,
}

impl fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            Backend::Model { probabilities, .. } => f
                .debug_struct("ClassifierAdapter")
                .field("mode", &"model")
                .field("probabilities", probabilities)
                .finish(),
            Backend::Simulated => f
                .debug_struct("ClassifierAdapter")
                .field("mode", &"simulated")
                .finish(),
        }
    }
}

impl ClassifierAdapter {
    pub fn new(model: Option<Arc<dyn RiskModel>>) -> Self {
        match model {
            Some(model) => Self::with_model(model),
            None => Self::simulated(),
        }
    }

    pub fn with_model(model: Arc<dyn RiskModel>) -> Self {
        let probabilities = model.capabilities().probabilities;
        Self {
            backend: Backend::Model {
                model,
                probabilities,
            },
        }
    }

    pub fn simulated() -> Self {
        Self {
            backend: Backend::Simulated,
        }
    }

    /// Loads the configured artifact, dropping to simulated mode if that fails.
    pub fn from_config(config: &ModelConfig) -> Self {
        match load_model(&config.artifact_path) {
            Ok(model) => {
                info!(
                    path = %config.artifact_path.display(),
                    probabilities = model.capabilities().probabilities,
                    "hypertension model loaded"
                );
                Self::with_model(Arc::new(model))
            }
            Err(err) => {
                warn!(error = %err, "model unavailable; serving simulated predictions");
                Self::simulated()
            }
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.backend, Backend::Simulated)
    }

    pub fn classify(&self, vector: &EncodedVector) -> Result<PredictionResult, ClassifierError> {
        let (model, probabilities) = match &self.backend {
            Backend::Model {
                model,
                probabilities,
            } => (model, *probabilities),
            Backend::Simulated => {
                let index = rand::thread_rng().gen_range(0..RiskStage::ALL.len());
                return Ok(PredictionResult {
                    stage: RiskStage::from_index(index)?,
                    confidence: SIMULATED_CONFIDENCE,
                    confidence_source: ConfidenceSource::Simulated,
                });
            }
        };

        let rows = [*vector.as_row()];
        let index = model
            .predict(&rows)?
            .first()
            .copied()
            .ok_or(ClassifierError::EmptyPrediction)?;
        let stage = RiskStage::from_index(index)?;

        let estimate = if probabilities {
            match model.predict_probabilities(&rows) {
                Ok(table) => top_probability(&table),
                Err(err) => {
                    warn!(error = %err, "probability estimate unavailable; using placeholder");
                    None
                }
            }
        } else {
            None
        };

        let (confidence, confidence_source) = match estimate {
            Some(probability) => (probability * 100.0, ConfidenceSource::ModelProbability),
            None => (PLACEHOLDER_CONFIDENCE, ConfidenceSource::Placeholder),
        };

        Ok(PredictionResult {
            stage,
            confidence,
            confidence_source,
        })
    }
}

fn top_probability(table: &[Vec<f64>]) -> Option<f64> {
    let row = table.first()?;
    if row.is_empty() || row.iter().any(|p| !p.is_finite() || !(0.0..=1.0).contains(p)) {
        warn!(?row, "model returned malformed probabilities; using placeholder");
        return None;
    }
    row.iter().copied().reduce(f64::max)
}

/// Classification could not produce a stage.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("model returned no prediction")]
    EmptyPrediction,
    #[error("model predicted an unknown class: {0}")]
    UnknownClass(#[from] StageIndexError),
}
