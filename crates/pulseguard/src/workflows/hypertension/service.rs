use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::classifier::{ClassifierAdapter, ClassifierError, ConfidenceSource};
use super::encoder::{QuestionnaireEncoder, ValidationError};
use super::questionnaire::{QuestionnaireField, RawInput};
use super::stage::{Recommendation, RiskStage, StageCatalog};
use crate::config::ModelConfig;

/// Notice attached to every result produced without a trained model.
pub const SIMULATED_NOTICE: &str =
    "Demo Mode: Using simulated AI prediction for demonstration";

/// Service composing the encoder, classifier adapter, and stage catalog.
#[derive(Debug, Clone)]
pub struct AssessmentService {
    encoder: QuestionnaireEncoder,
    classifier: Arc<ClassifierAdapter>,
    catalog: Arc<StageCatalog>,
}

impl AssessmentService {
    pub fn new(classifier: ClassifierAdapter, catalog: StageCatalog) -> Self {
        Self {
            encoder: QuestionnaireEncoder::new(),
            classifier: Arc::new(classifier),
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(
            ClassifierAdapter::from_config(config),
            StageCatalog::standard(),
        )
    }

    pub fn is_simulated(&self) -> bool {
        self.classifier.is_simulated()
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    /// Run one questionnaire through encode, classify, and describe.
    pub fn assess(&self, raw: &RawInput) -> Result<AssessmentView, AssessmentError> {
        let report = self.encoder.encode_with_report(raw)?;
        let prediction = self.classifier.classify(&report.vector)?;
        let info = self.catalog.describe(prediction.stage());

        info!(
            stage = %prediction.stage(),
            confidence = prediction.confidence(),
            simulated = prediction.is_simulated(),
            "assessment classified"
        );

        Ok(AssessmentView {
            stage: info.stage,
            stage_label: info.label,
            color_code: info.color_code,
            confidence: round_to_hundredths(prediction.confidence()),
            confidence_source: prediction.confidence_source(),
            recommendation: info.recommendation.clone(),
            simulated: prediction.is_simulated(),
            notice: prediction.is_simulated().then_some(SIMULATED_NOTICE),
            defaulted_fields: report
                .fallbacks
                .into_iter()
                .map(|fallback| fallback.field)
                .collect(),
            form: raw.values().clone(),
            assessed_at: Utc::now(),
        })
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result payload handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub stage: RiskStage,
    pub stage_label: &'static str,
    pub color_code: &'static str,
    pub confidence: f64,
    pub confidence_source: ConfidenceSource,
    pub recommendation: Recommendation,
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defaulted_fields: Vec<QuestionnaireField>,
    pub form: BTreeMap<String, String>,
    pub assessed_at: DateTime<Utc>,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Classification(#[from] ClassifierError),
}

impl AssessmentError {
    pub fn user_message(&self) -> String {
        match self {
            AssessmentError::Validation(err) => err.user_message(),
            AssessmentError::Classification(err) => {
                format!("An unexpected error occurred: {err}")
            }
        }
    }
}
