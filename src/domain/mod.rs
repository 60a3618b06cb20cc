//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies beyond
//! serde and serde_json. Encoding a questionnaire into a feature vector lives here because it
//! depends on nothing but fixed tables.

mod bracket;
mod features;
mod prediction;
pub mod questionnaire;
pub mod risk;

pub use bracket::{AgeBracket, BracketPair, YOUNG_BRACKET_MAX_AGE};
pub use features::{column_index, FeatureVector, FEATURE_COLUMNS, NUM_FEATURES};
pub use prediction::Prediction;
pub use questionnaire::{Answer, EncodingError, Questionnaire};
pub use risk::normalized_risk_score;
