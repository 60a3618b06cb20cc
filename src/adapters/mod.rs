//! Adapters layer: Concrete implementations of ports.
//!
//! These modules turn the exported training artifacts into port
//! implementations:
//! - `model`: logistic and decision-tree classifiers (`RiskModel`)
//! - `scaler`: min-max and standard scalers (`FeatureScaler`)
//! - `store`: file-system loading with integrity manifest

pub mod model;
pub mod scaler;
pub mod store;

pub use model::{Estimator, ModelArtifact};
pub use scaler::{FittedScaler, ScalerArtifact};
pub use store::{ArtifactError, ArtifactManifest, FsArtifactStore, LoadedArtifacts};
