use super::common::*;
use crate::workflows::hypertension::classifier::ConfidenceSource;
use crate::workflows::hypertension::encoder::ValidationError;
use crate::workflows::hypertension::questionnaire::QuestionnaireField;
use crate::workflows::hypertension::service::{AssessmentError, SIMULATED_NOTICE};
use crate::workflows::hypertension::stage::RiskStage;

#[test]
fn assess_maps_prediction_to_stage_guidance() {
    let service = service_with(FixedModel::new(3, Some(vec![0.01, 0.02, 0.10456, 0.87654])));

    let view = service.assess(&high_risk_input()).expect("assessment succeeds");

    assert_eq!(view.stage, RiskStage::Crisis);
    assert_eq!(view.stage_label, "HYPERTENSIVE CRISIS");
    assert_eq!(view.color_code, "#EF4444");
    assert_eq!(view.recommendation.title, "Hypertensive Crisis");
    assert_eq!(view.confidence, 87.65);
    assert_eq!(view.confidence_source, ConfidenceSource::ModelProbability);
    assert!(!view.simulated);
    assert!(view.notice.is_none());
    assert_eq!(view.form, high_risk_input().into_values());
}

#[test]
fn simulated_assessments_carry_demo_notice() {
    let service = simulated_service();
    assert!(service.is_simulated());

    let view = service.assess(&baseline_input()).expect("simulated assessment");
    assert!(view.simulated);
    assert_eq!(view.confidence, 87.5);
    assert_eq!(view.notice, Some(SIMULATED_NOTICE));
}

#[test]
fn assess_reports_blood_pressure_fallbacks() {
    let service = service_with(FixedModel::new(0, None));
    let input = baseline_input().with(QuestionnaireField::Systolic, "999-999");

    let view = service.assess(&input).expect("fallback does not fail");
    assert_eq!(view.defaulted_fields, vec![QuestionnaireField::Systolic]);
    assert_eq!(view.confidence, 85.0);
    assert_eq!(view.form.get("Systolic").map(String::as_str), Some("999-999"));
}

#[test]
fn assess_surfaces_validation_errors() {
    let service = service_with(FixedModel::new(0, None));
    let mut input = baseline_input();
    input.remove(QuestionnaireField::Whendiagnoused);

    match service.assess(&input) {
        Err(AssessmentError::Validation(ValidationError::MissingField(field))) => {
            assert_eq!(field, QuestionnaireField::Whendiagnoused)
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn classification_failures_get_generic_message() {
    let service = service_with(BrokenModel);
    let error = service
        .assess(&baseline_input())
        .expect_err("broken model fails");

    assert!(matches!(error, AssessmentError::Classification(_)));
    assert_eq!(
        error.user_message(),
        "An unexpected error occurred: inference failed: session closed"
    );
}
