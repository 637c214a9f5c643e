//! Hypertension risk assessment: questionnaire validation and encoding, stage
//! classification against a trained model (or the simulated fallback), and the
//! stage catalog that turns a class index into guidance for the patient.

pub mod classifier;
pub mod encoder;
pub mod import;
mod normalizer;
pub mod questionnaire;
pub mod router;
pub mod service;
pub mod stage;

#[cfg(test)]
mod tests;

pub use classifier::{
    load_model, ClassifierAdapter, ClassifierError, ConfidenceSource, ExclusiveModel,
    ModelArtifact, ModelCapabilities, ModelError, ModelLoadError, PredictionResult, RiskModel,
    Serialized, PLACEHOLDER_CONFIDENCE, SIMULATED_CONFIDENCE,
};
pub use encoder::{
    BucketFallback, EncodedVector, EncodingReport, QuestionnaireEncoder, ValidationError,
};
pub use import::{read_questionnaires, ImportError};
pub use questionnaire::{FeatureRow, QuestionnaireField, RawInput, FEATURE_COUNT};
pub use router::assessment_router;
pub use service::{AssessmentError, AssessmentService, AssessmentView, SIMULATED_NOTICE};
pub use stage::{Recommendation, RiskStage, StageCatalog, StageIndexError, StageInfo};
