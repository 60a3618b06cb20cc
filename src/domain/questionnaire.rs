//! Raw questionnaire answers as submitted by the applicant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const REGION: &str = "Region";
pub const MARITAL_STATUS: &str = "Marital Status";
pub const BMI_CATEGORY: &str = "BMI Category";
pub const SMOKING_STATUS: &str = "Smoking Status";
pub const EMPLOYMENT_STATUS: &str = "Employment Status";
pub const INSURANCE_PLAN: &str = "Insurance Plan";
pub const NUMBER_OF_DEPENDANTS: &str = "Number of Dependants";
pub const INCOME_IN_LAKHS: &str = "Income in Lakhs";
pub const GENETICAL_RISK: &str = "Genetical Risk";
pub const MEDICAL_HISTORY: &str = "Medical History";

/// Error type for questionnaire encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be {expected}, got {found}")]
    InvalidType {
        field: String,
        expected: &'static str,
        found: String,
    },
}

/// A single answer: a number, free-form text, or any other JSON value.
///
/// `Other` (null, booleans, arrays, objects) is never a recognized category
/// and never a valid number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Answer {
    /// Text content, if this is a text answer.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Other(_) => None,
        }
    }

    /// Numeric content, if this is a numeric answer.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) | Self::Other(_) => None,
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Text(s) => write!(f, "text {s:?}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Answer {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One applicant's questionnaire, keyed by question label.
///
/// Keys outside the known question set are kept but ignored by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Questionnaire {
    answers: BTreeMap<String, Answer>,
}

impl Questionnaire {
    /// Create an empty questionnaire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, question: impl Into<String>, answer: impl Into<Answer>) -> Self {
        self.insert(question, answer);
        self
    }

    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<Answer>) {
        self.answers.insert(question.into(), answer.into());
    }

    #[must_use]
    pub fn get(&self, question: &str) -> Option<&Answer> {
        self.answers.get(question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The applicant's age. Required.
    ///
    /// # Errors
    /// Returns `EncodingError::MissingField` if absent and
    /// `EncodingError::InvalidType` if not numeric.
    pub fn age(&self) -> Result<f64, EncodingError> {
        self.required_number(AGE)
    }

    /// The applicant's medical history. Required.
    ///
    /// # Errors
    /// Returns `EncodingError::MissingField` if absent and
    /// `EncodingError::InvalidType` if not text.
    pub fn medical_history(&self) -> Result<&str, EncodingError> {
        let answer = self
            .get(MEDICAL_HISTORY)
            .ok_or(EncodingError::MissingField(MEDICAL_HISTORY))?;
        answer.as_text().ok_or_else(|| EncodingError::InvalidType {
            field: MEDICAL_HISTORY.to_string(),
            expected: "text",
            found: answer.to_string(),
        })
    }

    fn required_number(&self, field: &'static str) -> Result<f64, EncodingError> {
        let answer = self.get(field).ok_or(EncodingError::MissingField(field))?;
        number_of(field, answer)
    }
}

/// Read a numeric answer, rejecting text.
pub(crate) fn number_of(field: &str, answer: &Answer) -> Result<f64, EncodingError> {
    answer.as_number().ok_or_else(|| EncodingError::InvalidType {
        field: field.to_string(),
        expected: "a number",
        found: answer.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_answers() {
        let json = r#"{"Age": 30, "Gender": "Male", "Medical History": "Diabetes"}"#;
        let q: Questionnaire = serde_json::from_str(json).expect("Should parse");

        assert_eq!(q.age(), Ok(30.0));
        assert_eq!(q.get(GENDER), Some(&Answer::Text("Male".into())));
        assert_eq!(q.medical_history(), Ok("Diabetes"));
    }

    #[test]
    fn test_missing_age() {
        let q = Questionnaire::new().with(MEDICAL_HISTORY, "none");
        assert_eq!(q.age(), Err(EncodingError::MissingField(AGE)));
    }

    #[test]
    fn test_text_age_is_rejected() {
        let q = Questionnaire::new().with(AGE, "thirty");
        let err = q.age().expect_err("text age must fail");
        assert!(matches!(err, EncodingError::InvalidType { ref field, .. } if field == AGE));
        assert!(err.to_string().contains("thirty"));
    }

    #[test]
    fn test_numeric_medical_history_is_rejected() {
        let q = Questionnaire::new().with(MEDICAL_HISTORY, 3);
        assert!(matches!(
            q.medical_history(),
            Err(EncodingError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_null_and_bool_answers_parse() {
        let json = r#"{"Age": 30, "Medical History": "none", "Gender": null, "Smoking Status": true}"#;
        let q: Questionnaire = serde_json::from_str(json).expect("Should parse");

        let gender = q.get(GENDER).expect("gender kept");
        assert_eq!(gender, &Answer::Other(serde_json::Value::Null));
        assert_eq!(gender.as_text(), None);
        assert_eq!(gender.as_number(), None);

        let smoking = q.get(SMOKING_STATUS).expect("smoking kept");
        assert_eq!(smoking, &Answer::Other(serde_json::Value::Bool(true)));
        assert_eq!(smoking.as_text(), None);
    }

    #[test]
    fn test_null_age_is_invalid_type() {
        let q: Questionnaire =
            serde_json::from_str(r#"{"Age": null, "Medical History": "none"}"#).expect("Should parse");
        let err = q.age().expect_err("null age must fail");
        assert!(matches!(err, EncodingError::InvalidType { ref field, .. } if field == AGE));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let q = Questionnaire::new().with("Favourite Colour", "Blue");
        assert_eq!(q.iter().count(), 1);
    }
}
