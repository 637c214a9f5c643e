use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal hypertension risk classes predicted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStage {
    Normal,
    Stage1,
    Stage2,
    Crisis,
}

impl RiskStage {
    pub const ALL: [RiskStage; 4] = [
        RiskStage::Normal,
        RiskStage::Stage1,
        RiskStage::Stage2,
        RiskStage::Crisis,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, StageIndexError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(StageIndexError(index))
    }
}

impl TryFrom<usize> for RiskStage {
    type Error = StageIndexError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl fmt::Display for RiskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskStage::Normal => "normal",
            RiskStage::Stage1 => "stage1",
            RiskStage::Stage2 => "stage2",
            RiskStage::Crisis => "crisis",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("class index {0} is outside the stage catalog")]
pub struct StageIndexError(pub usize);

/// Guidance shown alongside a predicted stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
    pub actions: &'static [&'static str],
    pub priority: &'static str,
}

/// Display data for a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub stage: RiskStage,
    pub label: &'static str,
    pub color_code: &'static str,
    pub recommendation: Recommendation,
}

/// Read-only lookup from predicted stage to its label, color, and recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalog {
    entries: [StageInfo; 4],
}

impl StageCatalog {
    pub fn standard() -> Self {
        Self {
            entries: [
                StageInfo {
                    stage: RiskStage::Normal,
                    label: "NORMAL",
                    color_code: "#10B981",
                    recommendation: Recommendation {
                        title: "Normal Blood Pressure",
                        description: "Your cardiovascular risk assessment indicates normal blood pressure levels.",
                        actions: &[
                            "Maintain current healthy lifestyle",
                            "Regular physical activity (150 minutes/week)",
                            "Continue balanced, low-sodium diet",
                            "Annual blood pressure monitoring",
                            "Regular health check-ups",
                        ],
                        priority: "Low Risk",
                    },
                },
                StageInfo {
                    stage: RiskStage::Stage1,
                    label: "HYPERTENSION (Stage-1)",
                    color_code: "#F59E0B",
                    recommendation: Recommendation {
                        title: "Stage 1 Hypertension",
                        description: "Mild elevation detected requiring lifestyle modifications and medical consultation.",
                        actions: &[
                            "Schedule appointment with healthcare provider",
                            "Implement DASH diet plan",
                            "Increase physical activity gradually",
                            "Monitor blood pressure bi-weekly",
                            "Reduce sodium intake (<2300mg/day)",
                            "Consider stress management techniques",
                        ],
                        priority: "Moderate Risk",
                    },
                },
                StageInfo {
                    stage: RiskStage::Stage2,
                    label: "HYPERTENSION (Stage-2)",
                    color_code: "#F97316",
                    recommendation: Recommendation {
                        title: "Stage 2 Hypertension",
                        description: "Significant hypertension requiring immediate medical intervention and treatment.",
                        actions: &[
                            "URGENT: Consult physician within 1-2 days",
                            "Likely medication therapy required",
                            "Comprehensive cardiovascular assessment",
                            "Daily blood pressure monitoring",
                            "Strict dietary sodium restriction",
                            "Lifestyle modification counseling",
                        ],
                        priority: "High Risk",
                    },
                },
                StageInfo {
                    stage: RiskStage::Crisis,
                    label: "HYPERTENSIVE CRISIS",
                    color_code: "#EF4444",
                    recommendation: Recommendation {
                        title: "Hypertensive Crisis",
                        description: "CRITICAL: Dangerously elevated blood pressure requiring emergency medical care.",
                        actions: &[
                            "EMERGENCY: Seek immediate medical attention",
                            "Call 911 if experiencing symptoms",
                            "Do not delay treatment",
                            "Monitor for stroke/heart attack signs",
                            "Do not self-medicate",
                        ],
                        priority: "Critical Risk",
                    },
                },
            ],
        }
    }

    pub fn describe(&self, stage: RiskStage) -> &StageInfo {
        &self.entries[stage.index()]
    }

    /// Looks up a raw class index.
    ///
    /// # Panics
    ///
    /// Panics when `class_index` is not 0..=3. Indices reaching this point have already
    /// been checked by the classifier adapter, so anything else is a programming error.
    pub fn describe_index(&self, class_index: usize) -> &StageInfo {
        match RiskStage::from_index(class_index) {
            Ok(stage) => self.describe(stage),
            Err(err) => panic!("stage catalog invariant violated: {err}"),
        }
    }

    pub fn entries(&self) -> &[StageInfo] {
        &self.entries
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
