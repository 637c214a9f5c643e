use std::sync::Mutex;

use super::super::questionnaire::FeatureRow;

/// Optional operations a model supports beyond class prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub probabilities: bool,
}

/// Trained classifier consulted by the adapter.
///
/// Implementations are shared across concurrent requests, so inference must only need
/// `&self`. Models that cannot offer that go through [`Serialized`].
pub trait RiskModel: Send + Sync {
    /// Predicts one class index per input row.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError>;

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::default()
    }

    /// Per-class probabilities for each input row. Only called when
    /// [`RiskModel::capabilities`] advertises support.
    fn predict_probabilities(&self, _rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, ModelError> {
        Err(ModelError::Unsupported("probability estimates"))
    }
}

/// Model whose inference needs exclusive access, e.g. one holding a mutable session.
pub trait ExclusiveModel: Send {
    fn predict(&mut self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError>;

    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::default()
    }

    fn predict_probabilities(
        &mut self,
        _rows: &[FeatureRow],
    ) -> Result<Vec<Vec<f64>>, ModelError> {
        Err(ModelError::Unsupported("probability estimates"))
    }
}

/// Runs an [`ExclusiveModel`] behind a mutex so concurrent requests take turns.
pub struct Serialized<M> {
    inner: Mutex<M>,
    capabilities: ModelCapabilities,
}

impl<M: ExclusiveModel> Serialized<M> {
    pub fn new(model: M) -> Self {
        let capabilities = model.capabilities();
        Self {
            inner: Mutex::new(model),
            capabilities,
        }
    }
}

impl<M: ExclusiveModel> RiskModel for Serialized<M> {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<usize>, ModelError> {
        let mut model = self.inner.lock().map_err(|_| ModelError::Poisoned)?;
        model.predict(rows)
    }

    fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    fn predict_probabilities(&self, rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, ModelError> {
        let mut model = self.inner.lock().map_err(|_| ModelError::Poisoned)?;
        model.predict_probabilities(rows)
    }
}

/// Failure raised while running inference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("model does not support {0}")]
    Unsupported(&'static str),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model lock poisoned by an earlier panic")]
    Poisoned,
}
