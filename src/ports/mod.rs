//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the prediction pipeline and the fitted artifacts it consumes.

mod model;
mod scaler;

pub use model::{InferenceError, RiskModel};
pub use scaler::{FeatureScaler, ScalingError};
