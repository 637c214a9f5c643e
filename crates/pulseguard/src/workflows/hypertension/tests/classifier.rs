use std::collections::BTreeSet;
use std::sync::Arc;

use super::common::*;
use crate::workflows::hypertension::classifier::{
    ClassifierAdapter, ClassifierError, ConfidenceSource, ExclusiveModel, ModelCapabilities,
    ModelError, Serialized, PLACEHOLDER_CONFIDENCE, SIMULATED_CONFIDENCE,
};
use crate::workflows::hypertension::encoder::{EncodedVector, QuestionnaireEncoder};
use crate::workflows::hypertension::questionnaire::FeatureRow;
use crate::workflows::hypertension::stage::RiskStage;

fn baseline_vector() -> EncodedVector {
    QuestionnaireEncoder::new()
        .encode(&baseline_input())
        .expect("baseline encodes")
}

#[test]
fn simulated_mode_flags_every_prediction() {
    let adapter = ClassifierAdapter::simulated();
    assert!(adapter.is_simulated());

    let mut seen = BTreeSet::new();
    for _ in 0..200 {
        let prediction = adapter
            .classify(&baseline_vector())
            .expect("simulated prediction");
        assert!(prediction.is_simulated());
        assert_eq!(prediction.confidence(), SIMULATED_CONFIDENCE);
        assert_eq!(prediction.confidence_source(), ConfidenceSource::Simulated);
        assert!(prediction.class_index() < 4);
        seen.insert(prediction.class_index());
    }
    assert!(seen.len() > 1, "random fallback should vary, saw {seen:?}");
}

#[test]
fn missing_model_selects_simulated_mode() {
    assert!(ClassifierAdapter::new(None).is_simulated());
    assert!(!ClassifierAdapter::new(Some(Arc::new(FixedModel::new(0, None)))).is_simulated());
}

#[test]
fn model_confidence_comes_from_top_probability() {
    let adapter = adapter_for(FixedModel::new(1, Some(vec![0.1, 0.72, 0.15, 0.03])));

    let prediction = adapter.classify(&baseline_vector()).expect("prediction");
    assert_eq!(prediction.stage(), RiskStage::Stage1);
    assert!(!prediction.is_simulated());
    assert!((prediction.confidence() - 72.0).abs() < 1e-9);
    assert_eq!(
        prediction.confidence_source(),
        ConfidenceSource::ModelProbability
    );
}

#[test]
fn model_predictions_are_deterministic() {
    let adapter = adapter_for(FixedModel::new(3, Some(vec![0.05, 0.05, 0.1, 0.8])));
    let first = adapter.classify(&baseline_vector()).expect("first");
    for _ in 0..10 {
        assert_eq!(adapter.classify(&baseline_vector()).expect("repeat"), first);
    }
}

#[test]
fn models_without_probabilities_are_never_asked_for_them() {
    let model = Arc::new(FixedModel::new(2, None));
    let adapter = ClassifierAdapter::with_model(model.clone());

    let prediction = adapter.classify(&baseline_vector()).expect("prediction");
    assert_eq!(prediction.stage(), RiskStage::Stage2);
    assert_eq!(prediction.confidence(), PLACEHOLDER_CONFIDENCE);
    assert_eq!(prediction.confidence_source(), ConfidenceSource::Placeholder);
    assert_eq!(model.probability_calls(), 0);
}

#[test]
fn probability_failure_falls_back_to_placeholder() {
    let prediction = adapter_for(FlakyProbabilityModel)
        .classify(&baseline_vector())
        .expect("prediction survives probability failure");
    assert_eq!(prediction.stage(), RiskStage::Stage2);
    assert_eq!(prediction.confidence(), PLACEHOLDER_CONFIDENCE);
    assert!(!prediction.is_simulated());
}

#[test]
fn malformed_probabilities_fall_back_to_placeholder() {
    for row in [vec![], vec![0.5, f64::NAN, 0.2, 0.1], vec![1.4, 0.0, 0.0, 0.0]] {
        let prediction = adapter_for(FixedModel::new(0, Some(row.clone())))
            .classify(&baseline_vector())
            .expect("prediction");
        assert_eq!(prediction.confidence(), PLACEHOLDER_CONFIDENCE, "row {row:?}");
    }
}

#[test]
fn out_of_range_class_is_an_error() {
    match adapter_for(FixedModel::new(9, None)).classify(&baseline_vector()) {
        Err(ClassifierError::UnknownClass(err)) => assert_eq!(err.0, 9),
        other => panic!("expected unknown class, got {other:?}"),
    }
}

#[test]
fn inference_errors_propagate() {
    match adapter_for(BrokenModel).classify(&baseline_vector()) {
        Err(ClassifierError::Model(ModelError::Inference(detail))) => {
            assert_eq!(detail, "session closed")
        }
        other => panic!("expected inference error, got {other:?}"),
    }
}

struct CountingSession {
    calls: usize,
}

impl ExclusiveModel for CountingSession {
    fn predict(&mut self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError> {
        self.calls += 1;
        Ok(rows.iter().map(|_| self.calls % 4).collect())
    }

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities {
            probabilities: true,
        }
    }

    fn predict_probabilities(
        &mut self,
        rows: &[FeatureRow],
    ) -> Result<Vec<Vec<f64>>, ModelError> {
        Ok(rows.iter().map(|_| vec![0.25, 0.25, 0.4, 0.1]).collect())
    }
}

#[test]
fn serialized_models_run_one_request_at_a_time() {
    let adapter = Arc::new(adapter_for(Serialized::new(CountingSession { calls: 0 })));
    let vector = baseline_vector();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let adapter = Arc::clone(&adapter);
            std::thread::spawn(move || adapter.classify(&vector).expect("prediction"))
        })
        .collect();

    let mut stages = BTreeSet::new();
    for handle in handles {
        let prediction = handle.join().expect("thread completes");
        assert!((prediction.confidence() - 40.0).abs() < 1e-9);
        stages.insert(prediction.class_index());
    }
    assert_eq!(stages.len(), 4, "every call should observe a distinct counter step");
}
