use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::super::questionnaire::{FeatureRow, FEATURE_COUNT};
use super::super::stage::RiskStage;
use super::model::{ModelCapabilities, ModelError, RiskModel};

/// Persisted classifier exported from the training pipeline.
///
/// ```json
/// { "kind": "logistic_regression", "multi_class": "multinomial",
///   "coefficients": [[...13 weights...], ...4 rows], "intercepts": [b0, b1, b2, b3] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        #[serde(default)]
        multi_class: MultiClass,
    },
    /// Decision-function-only linear model; it carries no probability estimates.
    LinearClassifier {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
}

/// How per-class scores become probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiClass {
    #[default]
    Multinomial,
    Ovr,
}

impl ModelArtifact {
    pub fn into_model(self) -> Result<LinearModel, String> {
        let (coefficients, intercepts, link) = match self {
            ModelArtifact::LogisticRegression {
                coefficients,
                intercepts,
                multi_class,
            } => (coefficients, intercepts, Some(multi_class)),
            ModelArtifact::LinearClassifier {
                coefficients,
                intercepts,
            } => (coefficients, intercepts, None),
        };

        let classes = RiskStage::ALL.len();
        if coefficients.len() != classes {
            return Err(format!(
                "expected {classes} coefficient rows, found {}",
                coefficients.len()
            ));
        }
        if intercepts.len() != classes {
            return Err(format!(
                "expected {classes} intercepts, found {}",
                intercepts.len()
            ));
        }

        let mut weights = Vec::with_capacity(classes);
        for (class, row) in coefficients.into_iter().enumerate() {
            let row: FeatureRow = row.try_into().map_err(|row: Vec<f64>| {
                format!(
                    "class {class} has {} coefficients, expected {FEATURE_COUNT}",
                    row.len()
                )
            })?;
            weights.push(row);
        }

        let all_finite = weights
            .iter()
            .flatten()
            .chain(intercepts.iter())
            .all(|value| value.is_finite());
        if !all_finite {
            return Err("weights contain non-finite values".to_string());
        }

        Ok(LinearModel {
            weights,
            intercepts,
            link,
        })
    }
}

/// Linear classifier over the encoded questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Vec<FeatureRow>,
    intercepts: Vec<f64>,
    link: Option<MultiClass>,
}

impl LinearModel {
    fn decision(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let scores: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + intercept
            })
            .collect();

        if scores.iter().all(|score| score.is_finite()) {
            Ok(scores)
        } else {
            Err(ModelError::Inference(
                "decision function produced a non-finite score".to_string(),
            ))
        }
    }
}

impl RiskModel for LinearModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError> {
        rows.iter()
            .map(|row| self.decision(row).map(|scores| argmax(&scores)))
            .collect()
    }

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities {
            probabilities: self.link.is_some(),
        }
    }

    fn predict_probabilities(&self, rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, ModelError> {
        let link = self
            .link
            .ok_or(ModelError::Unsupported("probability estimates"))?;

        rows.iter()
            .map(|row| {
                let scores = self.decision(row)?;
                Ok(match link {
                    MultiClass::Multinomial => softmax(&scores),
                    MultiClass::Ovr => normalized_sigmoids(&scores),
                })
            })
            .collect()
    }
}

// First maximum wins on ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = index;
        }
    }
    best
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|score| (score - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}

fn normalized_sigmoids(scores: &[f64]) -> Vec<f64> {
    let sigmoids: Vec<f64> = scores
        .iter()
        .map(|score| 1.0 / (1.0 + (-score).exp()))
        .collect();
    let total: f64 = sigmoids.iter().sum();
    sigmoids.into_iter().map(|value| value / total).collect()
}

/// Reads and validates a model artifact from disk.
pub fn load_model(path: &Path) -> Result<LinearModel, ModelLoadError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ModelLoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ModelLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ModelLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    artifact
        .into_model()
        .map_err(|detail| ModelLoadError::Shape {
            path: path.to_path_buf(),
            detail,
        })
}

/// Model artifact could not be turned into a usable classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("unable to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model artifact {} has the wrong shape: {detail}", path.display())]
    Shape { path: PathBuf, detail: String },
}
