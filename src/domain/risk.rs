//! Medical-history risk normalization.
//!
//! The questionnaire records medical history as one or more disease names
//! joined by `" & "`. Each known disease carries a severity weight; the sum is
//! normalized against a fixed range.

/// Separator between disease names in a medical-history answer.
pub const DISEASE_SEPARATOR: &str = " & ";

/// Severity weight per lowercase disease token.
pub const RISK_SCORES: [(&str, u32); 6] = [
    ("diabetes", 6),
    ("heart disease", 8),
    ("high blood pressure", 6),
    ("thyroid", 5),
    ("no disease", 0),
    ("none", 0),
];

/// Upper end of the normalization range (diabetes + heart disease).
pub const MAX_RISK_SCORE: u32 = 14;

/// Lower end of the normalization range.
pub const MIN_RISK_SCORE: u32 = 0;

/// Weight of a single lowercase disease token. Unknown tokens weigh 0.
#[must_use]
pub fn disease_weight(token: &str) -> u32 {
    RISK_SCORES
        .iter()
        .find(|(name, _)| *name == token)
        .map_or(0, |(_, weight)| *weight)
}

/// Normalize a medical-history answer into a risk score.
///
/// Matching is case-insensitive. The result is NOT clamped: combinations whose
/// weights sum past [`MAX_RISK_SCORE`] produce scores above 1.0.
#[must_use]
pub fn normalized_risk_score(medical_history: &str) -> f64 {
    let lowered = medical_history.to_lowercase();
    let total: f64 = lowered
        .split(DISEASE_SEPARATOR)
        .map(|token| f64::from(disease_weight(token)))
        .sum();

    (total - f64::from(MIN_RISK_SCORE)) / f64::from(MAX_RISK_SCORE - MIN_RISK_SCORE)
}
