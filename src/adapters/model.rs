//! Trained classifier artifacts: logistic regression and decision tree.
//!
//! Models are exported from the training pipeline as JSON. Each artifact
//! carries the feature names it was fitted on, which must equal the encoder's
//! column order exactly.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, FEATURE_COLUMNS, NUM_FEATURES};
use crate::ports::{InferenceError, RiskModel};

/// Marker for a leaf in the flat tree arrays.
const TREE_LEAF: i64 = -1;

/// Fitted estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// One coefficient row per class, or a single row for binary models.
    Logistic {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Flat node arrays; a node is a leaf when `children_left` is -1.
    DecisionTree {
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        /// Per-node class weights
        value: Vec<Vec<f64>>,
    },
}

/// A trained classifier for one age bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub estimator: Estimator,
}

/// Index of the largest value; the first one wins on ties.
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn dot(row: &[f64], x: &[f64]) -> f64 {
    row.iter().zip(x).map(|(w, v)| w * v).sum()
}

fn malformed(msg: impl Into<String>) -> InferenceError {
    InferenceError::MalformedModel(msg.into())
}

impl ModelArtifact {
    /// Check the feature schema and parameter shapes.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
            return Err(format!(
                "feature_names {:?} do not match the encoder columns",
                self.feature_names
            ));
        }
        if self.classes.len() < 2 {
            return Err(format!("need at least 2 classes, got {}", self.classes.len()));
        }

        match &self.estimator {
            Estimator::Logistic {
                coefficients,
                intercepts,
            } => {
                let rows = coefficients.len();
                let expected_rows = if self.classes.len() == 2 {
                    [1, 2]
                } else {
                    [self.classes.len(); 2]
                };
                if !expected_rows.contains(&rows) {
                    return Err(format!(
                        "{rows} coefficient rows for {} classes",
                        self.classes.len()
                    ));
                }
                if intercepts.len() != rows {
                    return Err(format!("{} intercepts for {rows} rows", intercepts.len()));
                }
                if let Some(row) = coefficients.iter().find(|r| r.len() != NUM_FEATURES) {
                    return Err(format!(
                        "coefficient row has {} entries, expected {NUM_FEATURES}",
                        row.len()
                    ));
                }
            }
            Estimator::DecisionTree {
                children_left,
                children_right,
                feature,
                threshold,
                value,
            } => {
                let n = children_left.len();
                if n == 0 {
                    return Err("tree has no nodes".into());
                }
                if children_right.len() != n
                    || feature.len() != n
                    || threshold.len() != n
                    || value.len() != n
                {
                    return Err("tree node arrays differ in length".into());
                }
                for node in 0..n {
                    if children_left[node] == TREE_LEAF {
                        if value[node].len() != self.classes.len() {
                            return Err(format!(
                                "leaf {node} has {} class weights for {} classes",
                                value[node].len(),
                                self.classes.len()
                            ));
                        }
                        continue;
                    }
                    let in_range = |child: i64| child > node as i64 && (child as usize) < n;
                    if !in_range(children_left[node]) || !in_range(children_right[node]) {
                        return Err(format!("node {node} has out-of-range children"));
                    }
                    if !(0..NUM_FEATURES as i64).contains(&feature[node]) {
                        return Err(format!("node {node} splits on feature {}", feature[node]));
                    }
                }
            }
        }
        Ok(())
    }

    fn class_at(&self, index: usize) -> Result<i64, InferenceError> {
        self.classes
            .get(index)
            .copied()
            .ok_or_else(|| malformed(format!("class index {index} out of range")))
    }

    fn predict_logistic(
        &self,
        coefficients: &[Vec<f64>],
        intercepts: &[f64],
        x: &[f64],
    ) -> Result<i64, InferenceError> {
        let scores: Vec<f64> = coefficients
            .iter()
            .zip(intercepts)
            .map(|(row, b)| dot(row, x) + b)
            .collect();

        match scores.as_slice() {
            [score] => self.class_at(usize::from(*score > 0.0)),
            _ => {
                let best = argmax(&scores).ok_or_else(|| malformed("no coefficient rows"))?;
                self.class_at(best)
            }
        }
    }

    fn predict_tree(&self, estimator: &Estimator, x: &[f64]) -> Result<i64, InferenceError> {
        let Estimator::DecisionTree {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        } = estimator
        else {
            return Err(malformed("not a decision tree"));
        };

        let mut node = 0usize;
        // Children always have larger indices, so a path visits each node at most once.
        for _ in 0..children_left.len() {
            let left = *children_left.get(node).ok_or_else(|| malformed("node out of range"))?;
            if left == TREE_LEAF {
                let weights = value.get(node).ok_or_else(|| malformed("leaf without value"))?;
                let best = argmax(weights).ok_or_else(|| malformed("empty leaf"))?;
                return self.class_at(best);
            }

            let (Some(&split), Some(&cut), Some(&right)) = (
                feature.get(node),
                threshold.get(node),
                children_right.get(node),
            ) else {
                return Err(malformed(format!("node {node} is incomplete")));
            };
            let split = usize::try_from(split).map_err(|_| malformed("negative feature"))?;
            let v = *x.get(split).ok_or_else(|| malformed("feature out of range"))?;
            let next = if v <= cut { left } else { right };
            node = usize::try_from(next).map_err(|_| malformed("negative child"))?;
        }

        Err(malformed("tree walk did not reach a leaf"))
    }
}

impl RiskModel for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        if let Some((column, _)) = features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFiniteFeature(column.to_string()));
        }
        let x = features.values();

        match &self.estimator {
            Estimator::Logistic {
                coefficients,
                intercepts,
            } => self.predict_logistic(coefficients, intercepts, x),
            tree @ Estimator::DecisionTree { .. } => self.predict_tree(tree, x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn weights_on(column: &str, weight: f64) -> Vec<f64> {
        let mut row = vec![0.0; NUM_FEATURES];
        row[crate::domain::column_index(column).expect("known column")] = weight;
        row
    }

    fn vector_with(pairs: &[(&str, f64)]) -> FeatureVector {
        let mut v = FeatureVector::zeros();
        for (c, x) in pairs {
            v.set(c, *x);
        }
        v
    }

    fn binary_logistic() -> ModelArtifact {
        ModelArtifact {
            feature_names: names(),
            classes: vec![0, 1],
            estimator: Estimator::Logistic {
                coefficients: vec![weights_on("normalized_risk_score", 4.0)],
                intercepts: vec![-2.0],
            },
        }
    }

    /// Root splits on smoking_status_Regular, right child on age.
    fn tree() -> ModelArtifact {
        ModelArtifact {
            feature_names: names(),
            classes: vec![10, 20, 30],
            estimator: Estimator::DecisionTree {
                children_left: vec![1, -1, 3, -1, -1],
                children_right: vec![2, -1, 4, -1, -1],
                feature: vec![15, -2, 0, -2, -2],
                threshold: vec![0.5, -2.0, 0.6, -2.0, -2.0],
                value: vec![
                    vec![5.0, 3.0, 2.0],
                    vec![5.0, 1.0, 0.0],
                    vec![0.0, 2.0, 2.0],
                    vec![0.0, 2.0, 0.0],
                    vec![0.0, 0.0, 2.0],
                ],
            },
        }
    }

    #[test]
    fn test_argmax_first_wins() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_binary_logistic() {
        let model = binary_logistic();
        assert!(model.validate().is_ok());

        let low = vector_with(&[("normalized_risk_score", 0.25)]);
        let high = vector_with(&[("normalized_risk_score", 1.0)]);
        assert_eq!(model.predict(&low), Ok(0));
        assert_eq!(model.predict(&high), Ok(1));
    }

    #[test]
    fn test_multiclass_logistic() {
        let model = ModelArtifact {
            feature_names: names(),
            classes: vec![0, 1, 2],
            estimator: Estimator::Logistic {
                coefficients: vec![
                    weights_on("age", -1.0),
                    weights_on("age", 0.0),
                    weights_on("age", 1.0),
                ],
                intercepts: vec![0.5, 0.0, -0.5],
            },
        };
        assert!(model.validate().is_ok());

        assert_eq!(model.predict(&vector_with(&[("age", 0.0)])), Ok(0));
        assert_eq!(model.predict(&vector_with(&[("age", 0.5)])), Ok(0));
        assert_eq!(model.predict(&vector_with(&[("age", 0.9)])), Ok(2));
    }

    #[test]
    fn test_tree_paths() {
        let model = tree();
        assert!(model.validate().is_ok());

        let non_smoker = vector_with(&[("age", 0.9)]);
        let young_smoker = vector_with(&[("smoking_status_Regular", 1.0), ("age", 0.2)]);
        let old_smoker = vector_with(&[("smoking_status_Regular", 1.0), ("age", 0.9)]);

        assert_eq!(model.predict(&non_smoker), Ok(10));
        assert_eq!(model.predict(&young_smoker), Ok(20));
        assert_eq!(model.predict(&old_smoker), Ok(30));
    }

    #[test]
    fn test_non_finite_feature_rejected() {
        let v = vector_with(&[("income_lakhs", f64::NAN)]);
        assert_eq!(
            binary_logistic().predict(&v),
            Err(InferenceError::NonFiniteFeature("income_lakhs".into()))
        );
    }

    #[test]
    fn test_validate_rejects_reordered_features() {
        let mut model = binary_logistic();
        model.feature_names.swap(0, 1);
        let msg = model.validate().expect_err("must fail");
        assert!(msg.contains("do not match"));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut model = binary_logistic();
        model.classes = vec![0, 1, 2];
        assert!(model.validate().is_err());

        let mut tree = tree();
        if let Estimator::DecisionTree { children_left, .. } = &mut tree.estimator {
            children_left[0] = 0;
        }
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = format!(
            r#"{{
                "feature_names": {},
                "classes": [0, 1],
                "estimator": {{"kind": "logistic", "coefficients": [{:?}], "intercepts": [0.0]}}
            }}"#,
            serde_json::to_string(&FEATURE_COLUMNS).expect("names"),
            vec![0.0; NUM_FEATURES]
        );
        let model: ModelArtifact = serde_json::from_str(&json).expect("Should parse");
        assert!(model.validate().is_ok());
    }
}
