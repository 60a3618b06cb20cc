//! Feature vector schema and questionnaire encoding.
//!
//! The models were fitted on exactly [`FEATURE_COLUMNS`], in this order. The
//! encoder always emits every column, whatever the questionnaire contains.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::questionnaire::{self, number_of, EncodingError, Questionnaire};
use super::risk::normalized_risk_score;

/// Number of model input features.
pub const NUM_FEATURES: usize = 18;

/// Column names in model input order.
pub const FEATURE_COLUMNS: [&str; NUM_FEATURES] = [
    "age",
    "number_of_dependants",
    "income_lakhs",
    "insurance_plan",
    "genetical_risk",
    "normalized_risk_score",
    "gender_Male",
    "region_Northwest",
    "region_Southeast",
    "region_Southwest",
    "marital_status_Unmarried",
    "bmi_category_Obesity",
    "bmi_category_Overweight",
    "bmi_category_Underweight",
    "smoking_status_Occasional",
    "smoking_status_Regular",
    "employment_status_Salaried",
    "employment_status_Self-Employed",
];

/// One-hot groups: question → (answer → column).
///
/// Answers missing from a group (the reference category, or anything
/// unrecognized) leave every column of that group at 0.
pub const ONE_HOT_GROUPS: [(&str, &[(&str, &str)]); 6] = [
    (questionnaire::GENDER, &[("Male", "gender_Male")]),
    (
        questionnaire::REGION,
        &[
            ("Northwest", "region_Northwest"),
            ("Southeast", "region_Southeast"),
            ("Southwest", "region_Southwest"),
        ],
    ),
    (
        questionnaire::MARITAL_STATUS,
        &[("Unmarried", "marital_status_Unmarried")],
    ),
    (
        questionnaire::BMI_CATEGORY,
        &[
            ("Obesity", "bmi_category_Obesity"),
            ("Overweight", "bmi_category_Overweight"),
            ("Underweight", "bmi_category_Underweight"),
        ],
    ),
    (
        questionnaire::SMOKING_STATUS,
        &[
            ("Occasional", "smoking_status_Occasional"),
            ("Regular", "smoking_status_Regular"),
        ],
    ),
    (
        questionnaire::EMPLOYMENT_STATUS,
        &[
            ("Salaried", "employment_status_Salaried"),
            ("Self-Employed", "employment_status_Self-Employed"),
        ],
    ),
];

/// Numeric answers copied straight into a column.
pub const PASSTHROUGH_COLUMNS: [(&str, &str); 4] = [
    (questionnaire::AGE, "age"),
    (questionnaire::NUMBER_OF_DEPENDANTS, "number_of_dependants"),
    (questionnaire::INCOME_IN_LAKHS, "income_lakhs"),
    (questionnaire::GENETICAL_RISK, "genetical_risk"),
];

/// Ordinal encoding of the insurance plan tier.
pub const INSURANCE_PLAN_TIERS: [(&str, f64); 3] = [("Bronze", 1.0), ("Silver", 2.0), ("Gold", 3.0)];

/// Tier used when the plan is absent or unrecognized.
pub const DEFAULT_INSURANCE_PLAN_TIER: f64 = 1.0;

/// Position of a column in [`FEATURE_COLUMNS`].
#[must_use]
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == name)
}

/// A single encoded row in model input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; NUM_FEATURES],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl FeatureVector {
    /// All columns set to 0.
    #[must_use]
    pub fn zeros() -> Self {
        Self {
            values: [0.0; NUM_FEATURES],
        }
    }

    /// Encode a questionnaire into an unscaled feature vector.
    ///
    /// # Errors
    /// Returns `EncodingError::MissingField` when "Age" or "Medical History"
    /// is absent, and `EncodingError::InvalidType` when a numeric question
    /// holds text or the medical history holds a number.
    pub fn encode(input: &Questionnaire) -> Result<Self, EncodingError> {
        let mut vector = Self::zeros();

        // Age is mandatory even though the loop below also writes it.
        input.age()?;

        for (question, groups) in ONE_HOT_GROUPS {
            let Some(answer) = input.get(question).and_then(|a| a.as_text()) else {
                continue;
            };
            if let Some((_, column)) = groups.iter().find(|(value, _)| *value == answer) {
                vector.set_known(column, 1.0);
            }
        }

        let tier = input
            .get(questionnaire::INSURANCE_PLAN)
            .and_then(|a| a.as_text())
            .and_then(|plan| INSURANCE_PLAN_TIERS.iter().find(|(name, _)| *name == plan))
            .map_or(DEFAULT_INSURANCE_PLAN_TIER, |(_, tier)| *tier);
        vector.set_known("insurance_plan", tier);

        for (question, column) in PASSTHROUGH_COLUMNS {
            if let Some(answer) = input.get(question) {
                vector.set_known(column, number_of(question, answer)?);
            }
        }

        let history = input.medical_history()?;
        vector.set_known("normalized_risk_score", normalized_risk_score(history));

        Ok(vector)
    }

    /// Value of a named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|i| self.values[i])
    }

    /// Set a named column. Returns `false` if the column is not in the schema.
    pub fn set(&mut self, column: &str, value: f64) -> bool {
        match column_index(column) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    fn set_known(&mut self, column: &str, value: f64) {
        let written = self.set(column, value);
        debug_assert!(written, "column {column} missing from schema");
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str; NUM_FEATURES] {
        &FEATURE_COLUMNS
    }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.values
    }

    /// `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    /// Convert to a plain vector for inference.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_FEATURES))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::*;

    fn example_questionnaire() -> Questionnaire {
        Questionnaire::new()
            .with(AGE, 30)
            .with(GENDER, "Male")
            .with(REGION, "Northwest")
            .with(MARITAL_STATUS, "Unmarried")
            .with(BMI_CATEGORY, "Normal")
            .with(SMOKING_STATUS, "No")
            .with(EMPLOYMENT_STATUS, "Salaried")
            .with(INSURANCE_PLAN, "Gold")
            .with(NUMBER_OF_DEPENDANTS, 2)
            .with(INCOME_IN_LAKHS, 10)
            .with(GENETICAL_RISK, 1)
            .with(MEDICAL_HISTORY, "Diabetes")
    }

    fn minimal(age: f64) -> Questionnaire {
        Questionnaire::new()
            .with(AGE, age)
            .with(MEDICAL_HISTORY, "none")
    }

    #[test]
    fn test_example_encoding() {
        let v = FeatureVector::encode(&example_questionnaire()).expect("Should encode");

        assert_eq!(v.get("age"), Some(30.0));
        assert_eq!(v.get("number_of_dependants"), Some(2.0));
        assert_eq!(v.get("income_lakhs"), Some(10.0));
        assert_eq!(v.get("insurance_plan"), Some(3.0));
        assert_eq!(v.get("genetical_risk"), Some(1.0));
        assert_eq!(v.get("gender_Male"), Some(1.0));
        assert_eq!(v.get("region_Northwest"), Some(1.0));
        assert_eq!(v.get("region_Southeast"), Some(0.0));
        assert_eq!(v.get("region_Southwest"), Some(0.0));
        assert_eq!(v.get("marital_status_Unmarried"), Some(1.0));
        assert_eq!(v.get("employment_status_Salaried"), Some(1.0));
        assert_eq!(v.get("employment_status_Self-Employed"), Some(0.0));

        for column in [
            "bmi_category_Obesity",
            "bmi_category_Overweight",
            "bmi_category_Underweight",
            "smoking_status_Occasional",
            "smoking_status_Regular",
        ] {
            assert_eq!(v.get(column), Some(0.0), "{column} should be unset");
        }

        let risk = v.get("normalized_risk_score").expect("risk column");
        assert!((risk - 6.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_schema_is_stable() {
        for q in [
            minimal(20.0),
            example_questionnaire(),
            minimal(40.0).with("Unrelated Question", "whatever"),
        ] {
            let v = FeatureVector::encode(&q).expect("Should encode");
            let names: Vec<&str> = v.iter().map(|(c, _)| c).collect();
            assert_eq!(names, FEATURE_COLUMNS.to_vec());
            assert_eq!(v.to_vec().len(), NUM_FEATURES);
        }
    }

    #[test]
    fn test_unrecognized_categories_leave_group_unset() {
        let q = minimal(40.0)
            .with(GENDER, "Female")
            .with(REGION, "Atlantis")
            .with(BMI_CATEGORY, "obesity") // case-sensitive
            .with(SMOKING_STATUS, 1)
            .with(EMPLOYMENT_STATUS, "Freelancer");
        let v = FeatureVector::encode(&q).expect("Should encode");

        for (_, groups) in ONE_HOT_GROUPS {
            for (_, column) in groups.iter() {
                assert_eq!(v.get(column), Some(0.0), "{column} should be unset");
            }
        }
    }

    #[test]
    fn test_null_and_bool_answers_are_ignored() {
        let json = r#"{
            "Age": 30,
            "Medical History": "Diabetes",
            "Gender": null,
            "Smoking Status": true,
            "Region": ["Northwest"],
            "Insurance Plan": false
        }"#;
        let q: Questionnaire = serde_json::from_str(json).expect("Should parse");
        let v = FeatureVector::encode(&q).expect("Should encode");

        assert_eq!(v.get("gender_Male"), Some(0.0));
        assert_eq!(v.get("smoking_status_Occasional"), Some(0.0));
        assert_eq!(v.get("smoking_status_Regular"), Some(0.0));
        assert_eq!(v.get("region_Northwest"), Some(0.0));
        assert_eq!(v.get("insurance_plan"), Some(1.0));
        assert_eq!(v.get("age"), Some(30.0));
    }

    #[test]
    fn test_null_in_numeric_field_fails() {
        let q: Questionnaire = serde_json::from_str(
            r#"{"Age": 30, "Medical History": "none", "Income in Lakhs": null}"#,
        )
        .expect("Should parse");
        assert!(matches!(
            FeatureVector::encode(&q),
            Err(EncodingError::InvalidType { ref field, .. }) if field == INCOME_IN_LAKHS
        ));
    }

    #[test]
    fn test_insurance_plan_defaults_to_bronze() {
        let absent = FeatureVector::encode(&minimal(40.0)).expect("Should encode");
        assert_eq!(absent.get("insurance_plan"), Some(1.0));

        let unknown = FeatureVector::encode(&minimal(40.0).with(INSURANCE_PLAN, "Platinum"))
            .expect("Should encode");
        assert_eq!(unknown.get("insurance_plan"), Some(1.0));

        let silver = FeatureVector::encode(&minimal(40.0).with(INSURANCE_PLAN, "Silver"))
            .expect("Should encode");
        assert_eq!(silver.get("insurance_plan"), Some(2.0));
    }

    #[test]
    fn test_missing_passthrough_stays_zero() {
        let v = FeatureVector::encode(&minimal(22.0)).expect("Should encode");
        assert_eq!(v.get("age"), Some(22.0));
        assert_eq!(v.get("income_lakhs"), Some(0.0));
        assert_eq!(v.get("number_of_dependants"), Some(0.0));
    }

    #[test]
    fn test_missing_required_fields() {
        let no_age = Questionnaire::new().with(MEDICAL_HISTORY, "none");
        assert_eq!(
            FeatureVector::encode(&no_age),
            Err(EncodingError::MissingField(AGE))
        );

        let no_history = Questionnaire::new().with(AGE, 30);
        assert_eq!(
            FeatureVector::encode(&no_history),
            Err(EncodingError::MissingField(MEDICAL_HISTORY))
        );
    }

    #[test]
    fn test_text_in_numeric_field_fails() {
        let q = minimal(30.0).with(INCOME_IN_LAKHS, "ten");
        assert!(matches!(
            FeatureVector::encode(&q),
            Err(EncodingError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_serializes_in_column_order() {
        let v = FeatureVector::encode(&example_questionnaire()).expect("Should encode");
        let json = serde_json::to_string(&v).expect("Should serialize");

        assert!(json.starts_with("{\"age\":30.0,\"number_of_dependants\":2.0"));
        assert!(json.ends_with("\"employment_status_Self-Employed\":0.0}"));
        assert!(!json.contains("income_level"));
    }

    #[test]
    fn test_set_rejects_unknown_columns() {
        let mut v = FeatureVector::zeros();
        assert!(!v.set("income_level", 1.0));
        assert!(v.set("age", 19.0));
        assert_eq!(v.get("age"), Some(19.0));
    }
}
