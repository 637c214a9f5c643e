use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::hypertension::classifier::{
    ClassifierAdapter, ModelCapabilities, ModelError, RiskModel,
};
use crate::workflows::hypertension::questionnaire::{FeatureRow, QuestionnaireField, RawInput};
use crate::workflows::hypertension::service::AssessmentService;
use crate::workflows::hypertension::stage::StageCatalog;

/// Lowest-risk answers for every question.
pub(super) fn baseline_input() -> RawInput {
    RawInput::new()
        .with(QuestionnaireField::Gender, "Male")
        .with(QuestionnaireField::Age, "18-34")
        .with(QuestionnaireField::History, "No")
        .with(QuestionnaireField::Patient, "No")
        .with(QuestionnaireField::TakeMedication, "No")
        .with(QuestionnaireField::Severity, "Mild")
        .with(QuestionnaireField::BreathShortness, "No")
        .with(QuestionnaireField::VisualChanges, "No")
        .with(QuestionnaireField::NoseBleeding, "No")
        .with(QuestionnaireField::Whendiagnoused, "<1 Year")
        .with(QuestionnaireField::Systolic, "100-110")
        .with(QuestionnaireField::Diastolic, "70-80")
        .with(QuestionnaireField::ControlledDiet, "Yes")
}

pub(super) fn high_risk_input() -> RawInput {
    RawInput::new()
        .with(QuestionnaireField::Gender, "Female")
        .with(QuestionnaireField::Age, "65+")
        .with(QuestionnaireField::History, "Yes")
        .with(QuestionnaireField::Patient, "Yes")
        .with(QuestionnaireField::TakeMedication, "Yes")
        .with(QuestionnaireField::Severity, "Sever")
        .with(QuestionnaireField::BreathShortness, "Yes")
        .with(QuestionnaireField::VisualChanges, "Yes")
        .with(QuestionnaireField::NoseBleeding, "Yes")
        .with(QuestionnaireField::Whendiagnoused, ">5 Years")
        .with(QuestionnaireField::Systolic, "130+")
        .with(QuestionnaireField::Diastolic, "100+")
        .with(QuestionnaireField::ControlledDiet, "No")
}

/// Model that always predicts the same class, optionally with fixed probabilities.
pub(super) struct FixedModel {
    pub(super) class: usize,
    pub(super) probabilities: Option<Vec<f64>>,
    pub(super) probability_calls: AtomicUsize,
}

impl FixedModel {
    pub(super) fn new(class: usize, probabilities: Option<Vec<f64>>) -> Self {
        Self {
            class,
            probabilities,
            probability_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn probability_calls(&self) -> usize {
        self.probability_calls.load(Ordering::SeqCst)
    }
}

impl RiskModel for FixedModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError> {
        Ok(vec![self.class; rows.len()])
    }

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities {
            probabilities: self.probabilities.is_some(),
        }
    }

    fn predict_probabilities(&self, rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, ModelError> {
        self.probability_calls.fetch_add(1, Ordering::SeqCst);
        match &self.probabilities {
            Some(row) => Ok(vec![row.clone(); rows.len()]),
            None => Err(ModelError::Unsupported("probability estimates")),
        }
    }
}

/// Advertises probabilities but fails whenever asked for them.
pub(super) struct FlakyProbabilityModel;

impl RiskModel for FlakyProbabilityModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError> {
        Ok(vec![2; rows.len()])
    }

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities {
            probabilities: true,
        }
    }

    fn predict_probabilities(&self, _rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, ModelError> {
        Err(ModelError::Inference("calibration table missing".to_string()))
    }
}

pub(super) struct BrokenModel;

impl RiskModel for BrokenModel {
    fn predict(&self, _rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError> {
        Err(ModelError::Inference("session closed".to_string()))
    }
}

pub(super) fn adapter_for<M: RiskModel + 'static>(model: M) -> ClassifierAdapter {
    ClassifierAdapter::with_model(Arc::new(model))
}

pub(super) fn service_with<M: RiskModel + 'static>(model: M) -> AssessmentService {
    AssessmentService::new(adapter_for(model), StageCatalog::standard())
}

pub(super) fn simulated_service() -> AssessmentService {
    AssessmentService::new(ClassifierAdapter::simulated(), StageCatalog::standard())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
