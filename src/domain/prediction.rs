//! Prediction result types.

use serde::{Deserialize, Serialize};

use super::bracket::AgeBracket;

/// Outcome of a single prediction call.
///
/// The class encoding belongs to the trained models; this crate does not
/// interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label
    pub class: i64,

    /// Bracket whose scaler and model produced the label
    pub bracket: AgeBracket,
}

impl Prediction {
    #[must_use]
    pub fn new(class: i64, bracket: AgeBracket) -> Self {
        Self { class, bracket }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class {} (age {})", self.class, self.bracket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let p = Prediction::new(2, AgeBracket::Above25);
        let json = serde_json::to_string(&p).expect("Should serialize");
        assert_eq!(json, r#"{"class":2,"bracket":"above_25"}"#);
        assert_eq!(p.to_string(), "class 2 (age >25)");
    }
}
