use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of answers in the questionnaire and positions in the encoded vector.
pub const FEATURE_COUNT: usize = 13;

/// One encoded questionnaire, in model input order.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Questions of the intake form, declared in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionnaireField {
    Gender,
    Age,
    History,
    Patient,
    TakeMedication,
    Severity,
    BreathShortness,
    VisualChanges,
    NoseBleeding,
    Whendiagnoused,
    Systolic,
    Diastolic,
    ControlledDiet,
}

impl QuestionnaireField {
    pub const ALL: [QuestionnaireField; FEATURE_COUNT] = [
        QuestionnaireField::Gender,
        QuestionnaireField::Age,
        QuestionnaireField::History,
        QuestionnaireField::Patient,
        QuestionnaireField::TakeMedication,
        QuestionnaireField::Severity,
        QuestionnaireField::BreathShortness,
        QuestionnaireField::VisualChanges,
        QuestionnaireField::NoseBleeding,
        QuestionnaireField::Whendiagnoused,
        QuestionnaireField::Systolic,
        QuestionnaireField::Diastolic,
        QuestionnaireField::ControlledDiet,
    ];

    /// Form key the answer is submitted under.
    pub fn name(self) -> &'static str {
        match self {
            QuestionnaireField::Gender => "Gender",
            QuestionnaireField::Age => "Age",
            QuestionnaireField::History => "History",
            QuestionnaireField::Patient => "Patient",
            QuestionnaireField::TakeMedication => "TakeMedication",
            QuestionnaireField::Severity => "Severity",
            QuestionnaireField::BreathShortness => "BreathShortness",
            QuestionnaireField::VisualChanges => "VisualChanges",
            QuestionnaireField::NoseBleeding => "NoseBleeding",
            QuestionnaireField::Whendiagnoused => "Whendiagnoused",
            QuestionnaireField::Systolic => "Systolic",
            QuestionnaireField::Diastolic => "Diastolic",
            QuestionnaireField::ControlledDiet => "ControlledDiet",
        }
    }

    /// Index of the field inside an encoded vector.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Fields that are rescaled into [0, 1] after integer coding.
    pub(crate) fn is_ordinal(self) -> bool {
        matches!(
            self,
            QuestionnaireField::Age
                | QuestionnaireField::Severity
                | QuestionnaireField::Whendiagnoused
                | QuestionnaireField::Systolic
                | QuestionnaireField::Diastolic
        )
    }
}

impl fmt::Display for QuestionnaireField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Questionnaire answers exactly as submitted, keyed by form field name.
///
/// Nothing is validated here; keys outside the questionnaire are carried along so
/// they can be echoed back, and the encoder ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput(BTreeMap<String, String>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: QuestionnaireField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: QuestionnaireField, value: impl Into<String>) {
        self.0.insert(field.name().to_string(), value.into());
    }

    pub fn remove(&mut self, field: QuestionnaireField) -> Option<String> {
        self.0.remove(field.name())
    }

    pub fn get(&self, field: QuestionnaireField) -> Option<&str> {
        self.0.get(field.name()).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_values(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for RawInput {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self(values)
    }
}

impl FromIterator<(String, String)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
