//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! questionnaire-to-prediction pipeline.

mod prediction;
pub mod scaling;

pub use prediction::{PredictionService, PreparedFeatures};
pub use scaling::{apply_scaling, PLACEHOLDER_COLUMNS};
