//! Feature scaler port: Trait for the fitted per-bracket transforms.

/// Errors that can occur while rescaling a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalingError {
    #[error("Scaler expects column {0}, which is not in the feature schema")]
    MissingColumn(String),

    #[error("Scaler returned {found} values for {expected} columns")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Scaler failed: {0}")]
    Transform(String),
}

/// A fitted transform together with the ordered columns it was fitted on.
///
/// The column list may name placeholder columns that are not part of the
/// model input schema; the caller pads those before calling [`transform`].
///
/// [`transform`]: FeatureScaler::transform
pub trait FeatureScaler: Send + Sync {
    /// Ordered names of the columns the transform consumes and produces.
    fn columns_to_scale(&self) -> &[String];

    /// Transform one row of values ordered as [`columns_to_scale`].
    ///
    /// Must return exactly one value per input value.
    ///
    /// # Errors
    /// Returns `ScalingError::Transform` if the transform cannot be applied.
    ///
    /// [`columns_to_scale`]: FeatureScaler::columns_to_scale
    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ScalingError>;
}

impl<S: FeatureScaler + ?Sized> FeatureScaler for Box<S> {
    fn columns_to_scale(&self) -> &[String] {
        (**self).columns_to_scale()
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ScalingError> {
        (**self).transform(values)
    }
}
