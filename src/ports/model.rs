//! Risk model port: Trait for single-row classification.
//!
//! This trait abstracts the trained per-bracket models from the pipeline.

use crate::domain::FeatureVector;

/// Errors that can occur during model inference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Non-finite value in feature {0}")]
    NonFiniteFeature(String),

    #[error("Malformed model: {0}")]
    MalformedModel(String),

    #[error("Model failed: {0}")]
    Backend(String),
}

/// Trait for a trained classifier.
///
/// Implementations must be usable read-only from several threads; the
/// prediction service never mutates a model.
pub trait RiskModel: Send + Sync {
    /// Predict the class label for one fully scaled feature vector.
    ///
    /// # Errors
    /// Returns `InferenceError` if the model cannot produce a label.
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError>;
}

impl<M: RiskModel + ?Sized> RiskModel for Box<M> {
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        (**self).predict(features)
    }
}
