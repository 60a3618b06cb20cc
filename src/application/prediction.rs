//! Prediction service: Orchestrates encoding, scaling and inference.
//!
//! This service coordinates, for one questionnaire:
//! - Feature encoding
//! - Age-bracket selection
//! - Scaling with the bracket's scaler
//! - Inference with the bracket's model

use std::sync::Arc;

use crate::application::scaling::apply_scaling;
use crate::domain::{AgeBracket, BracketPair, FeatureVector, Prediction, Questionnaire};
use crate::ports::{FeatureScaler, RiskModel};
use crate::Result;

/// A scaled feature vector ready for inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedFeatures {
    /// Bracket used for scaling, and to be used for inference
    pub bracket: AgeBracket,

    /// Final model input
    pub features: FeatureVector,
}

/// Service for running the questionnaire-to-prediction pipeline.
///
/// Holds the two models and two scalers read-only; every call builds its own
/// feature vector, so one service can be shared across threads.
pub struct PredictionService<M, S>
where
    M: RiskModel,
    S: FeatureScaler,
{
    models: BracketPair<Arc<M>>,
    scalers: BracketPair<Arc<S>>,
}

impl<M, S> Clone for PredictionService<M, S>
where
    M: RiskModel,
    S: FeatureScaler,
{
    fn clone(&self) -> Self {
        Self {
            models: self.models.clone(),
            scalers: self.scalers.clone(),
        }
    }
}

impl<M, S> PredictionService<M, S>
where
    M: RiskModel,
    S: FeatureScaler,
{
    /// Create a new prediction service from the four fitted artifacts.
    pub fn new(models: BracketPair<Arc<M>>, scalers: BracketPair<Arc<S>>) -> Self {
        Self { models, scalers }
    }

    /// Encode and scale a questionnaire without running inference.
    ///
    /// # Errors
    /// Returns `PredictionError::Encoding` or `PredictionError::Scaling`.
    pub fn preprocess(&self, input: &Questionnaire) -> Result<PreparedFeatures> {
        let mut features = FeatureVector::encode(input)?;

        // Computed once so scaling and inference cannot disagree.
        let bracket = AgeBracket::from_age(input.age()?);

        tracing::debug!("Scaling features for age bracket {}", bracket);
        apply_scaling(self.scalers.get(bracket).as_ref(), &mut features)?;

        Ok(PreparedFeatures { bracket, features })
    }

    /// Run the full pipeline and return the predicted class.
    ///
    /// # Errors
    /// Returns an error naming the failed stage (encoding, scaling or
    /// inference). Nothing is retried.
    pub fn predict(&self, input: &Questionnaire) -> Result<Prediction> {
        let prepared = self.preprocess(input)?;
        self.infer(&prepared)
    }

    /// Run inference on already prepared features, using the model of the
    /// bracket they were scaled for.
    ///
    /// # Errors
    /// Returns `PredictionError::Inference` if the model fails.
    pub fn infer(&self, prepared: &PreparedFeatures) -> Result<Prediction> {
        tracing::debug!("Running inference with the {} model", prepared.bracket);
        let class = self.models.get(prepared.bracket).predict(&prepared.features)?;

        let prediction = Prediction::new(class, prepared.bracket);
        tracing::info!("Prediction complete: {}", prediction);
        Ok(prediction)
    }
}
