//! # insurance-risk
//!
//! Turns one insurance-application questionnaire into the feature vector a
//! pre-trained risk model expects, scales it for the applicant's age bracket,
//! and returns the model's predicted class.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Questionnaire, feature schema, risk normalization, age brackets
//! - `ports`: Trait definitions for the fitted models and scalers
//! - `adapters`: JSON artifact implementations and the file-system store
//! - `application`: Scaling and the prediction pipeline
//! - `config`: Environment-driven settings for the binaries

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::PredictionService;
pub use domain::{AgeBracket, FeatureVector, Prediction, Questionnaire};

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PredictionError>;

/// Main error type for the prediction pipeline.
///
/// Each variant names the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Encoding failed: {0}")]
    Encoding(#[from] domain::EncodingError),

    #[error("Scaling failed: {0}")]
    Scaling(#[from] ports::ScalingError),

    #[error("Inference failed: {0}")]
    Inference(#[from] ports::InferenceError),
}
