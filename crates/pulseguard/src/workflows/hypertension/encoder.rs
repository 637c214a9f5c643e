use serde::{Deserialize, Serialize};
use tracing::warn;

use super::normalizer::{canonical_severity, strip_spaces, tighten_range};
use super::questionnaire::{FeatureRow, QuestionnaireField, RawInput, FEATURE_COUNT};

const AGE_BANDS: &[(&str, u8)] = &[("18-34", 1), ("35-50", 2), ("51-64", 3), ("65+", 4)];

const SEVERITY_LEVELS: &[(&str, u8)] = &[("Mild", 0), ("Moderate", 1), ("Severe", 2)];

const DIAGNOSIS_WINDOWS: &[(&str, u8)] =
    &[("<1 Year", 1), ("1 - 5 Years", 2), (">5 Years", 3)];

const SYSTOLIC_BUCKETS: &[(&str, u8)] = &[
    ("100-110", 0),
    ("111-120", 1),
    ("121-130", 2),
    ("130+", 3),
];

const SYSTOLIC_BUCKETS_SPACED: &[(&str, u8)] = &[
    ("100 - 110", 0),
    ("111 - 120", 1),
    ("121 - 130", 2),
    ("130+", 3),
];

const DIASTOLIC_BUCKETS: &[(&str, u8)] =
    &[("70-80", 0), ("81-90", 1), ("91-100", 2), ("100+", 3)];

const DIASTOLIC_BUCKETS_SPACED: &[(&str, u8)] = &[
    ("70 - 80", 0),
    ("81 - 90", 1),
    ("91 - 100", 2),
    ("100+", 3),
];

/// Questionnaire rejected before it reached the model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(QuestionnaireField),
    #[error("unrecognized value '{value}' for field {field}")]
    UnrecognizedValue {
        field: QuestionnaireField,
        value: String,
    },
}

impl ValidationError {
    pub fn field(&self) -> QuestionnaireField {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::UnrecognizedValue { field, .. } => *field,
        }
    }

    /// Message suitable for showing next to the re-displayed form.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingField(field) => {
                format!("Please complete all required fields: {field}")
            }
            ValidationError::UnrecognizedValue { field, value } => {
                format!("Invalid selection detected: '{value}' is not a valid {field} answer")
            }
        }
    }
}

/// Fixed-order feature vector consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedVector(FeatureRow);

impl EncodedVector {
    pub fn new(values: FeatureRow) -> Self {
        Self(values)
    }

    pub fn get(&self, field: QuestionnaireField) -> f64 {
        self.0[field.position()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The vector as the single row of a model input matrix.
    pub fn as_row(&self) -> &FeatureRow {
        &self.0
    }
}

/// Blood-pressure answer that matched no bucket and was encoded as the lowest one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketFallback {
    pub field: QuestionnaireField,
    pub raw_value: String,
}

/// Encoding output together with the lenient decisions taken along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingReport {
    pub vector: EncodedVector,
    pub fallbacks: Vec<BucketFallback>,
}

/// Stateless encoder turning raw questionnaire answers into model features.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionnaireEncoder;

impl QuestionnaireEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, raw: &RawInput) -> Result<EncodedVector, ValidationError> {
        self.encode_with_report(raw).map(|report| report.vector)
    }

    pub fn encode_with_report(&self, raw: &RawInput) -> Result<EncodingReport, ValidationError> {
        let answers = required_answers(raw)?;
        let mut fallbacks = Vec::new();
        let mut values = [0.0; FEATURE_COUNT];

        for field in QuestionnaireField::ALL {
            let answer = answers[field.position()];
            let code = match field {
                QuestionnaireField::Gender => u8::from(answer != "Male"),
                QuestionnaireField::Age => strict_code(field, answer, AGE_BANDS)?,
                QuestionnaireField::Severity => {
                    strict_code(field, canonical_severity(answer), SEVERITY_LEVELS)?
                }
                QuestionnaireField::Whendiagnoused => {
                    strict_code(field, answer, DIAGNOSIS_WINDOWS)?
                }
                QuestionnaireField::Systolic => bucket_code(
                    field,
                    answer,
                    SYSTOLIC_BUCKETS,
                    SYSTOLIC_BUCKETS_SPACED,
                    &mut fallbacks,
                ),
                QuestionnaireField::Diastolic => bucket_code(
                    field,
                    answer,
                    DIASTOLIC_BUCKETS,
                    DIASTOLIC_BUCKETS_SPACED,
                    &mut fallbacks,
                ),
                QuestionnaireField::History
                | QuestionnaireField::Patient
                | QuestionnaireField::TakeMedication
                | QuestionnaireField::BreathShortness
                | QuestionnaireField::VisualChanges
                | QuestionnaireField::NoseBleeding
                | QuestionnaireField::ControlledDiet => u8::from(answer == "Yes"),
            };
            values[field.position()] = scale(field, code);
        }

        Ok(EncodingReport {
            vector: EncodedVector(values),
            fallbacks,
        })
    }
}

fn required_answers(raw: &RawInput) -> Result<[&str; FEATURE_COUNT], ValidationError> {
    let mut answers = [""; FEATURE_COUNT];
    for field in QuestionnaireField::ALL {
        match raw.get(field) {
            Some(value) if !value.is_empty() => answers[field.position()] = value,
            _ => return Err(ValidationError::MissingField(field)),
        }
    }
    Ok(answers)
}

fn lookup(table: &[(&str, u8)], key: &str) -> Option<u8> {
    table
        .iter()
        .find(|(token, _)| *token == key)
        .map(|(_, code)| *code)
}

fn strict_code(
    field: QuestionnaireField,
    answer: &str,
    table: &[(&str, u8)],
) -> Result<u8, ValidationError> {
    lookup(table, answer).ok_or_else(|| ValidationError::UnrecognizedValue {
        field,
        value: answer.to_string(),
    })
}

// Unmatched ranges degrade to bucket 0 instead of failing the request.
fn bucket_code(
    field: QuestionnaireField,
    answer: &str,
    compact: &[(&str, u8)],
    spaced: &[(&str, u8)],
    fallbacks: &mut Vec<BucketFallback>,
) -> u8 {
    let tightened = tighten_range(answer);
    if let Some(code) = lookup(compact, &strip_spaces(&tightened)) {
        return code;
    }
    if let Some(code) = lookup(spaced, &tightened) {
        return code;
    }

    warn!(%field, value = answer, "blood pressure range unrecognized; using lowest bucket");
    fallbacks.push(BucketFallback {
        field,
        raw_value: answer.to_string(),
    });
    0
}

fn scale(field: QuestionnaireField, code: u8) -> f64 {
    let code = f64::from(code);
    if !field.is_ordinal() {
        return code;
    }
    match field {
        QuestionnaireField::Age => (code - 1.0) / 3.0,
        QuestionnaireField::Severity => code / 2.0,
        QuestionnaireField::Whendiagnoused => (code - 1.0) / 2.0,
        QuestionnaireField::Systolic | QuestionnaireField::Diastolic => code / 3.0,
        _ => code,
    }
}
