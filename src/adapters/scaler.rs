//! Fitted scaler artifacts: min-max and standard scaling.
//!
//! Parameters are exported from the training pipeline as JSON, one value per
//! entry of `cols_to_scale`. NaN inputs (placeholder columns) pass through as
//! NaN.

use serde::{Deserialize, Serialize};

use crate::ports::{FeatureScaler, ScalingError};

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

/// Fitted transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    /// `x' = (x - data_min) / (data_max - data_min) * (hi - lo) + lo`
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: [f64; 2],
    },
    /// `x' = (x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
}

/// A scaler bundle: the ordered columns and the transform fitted on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub cols_to_scale: Vec<String>,
    pub scaler: FittedScaler,
}

/// Constant columns get a unit divisor instead of dividing by zero.
fn non_zero(divisor: f64) -> f64 {
    if divisor == 0.0 {
        1.0
    } else {
        divisor
    }
}

impl FittedScaler {
    fn param_lengths(&self) -> [(&'static str, usize); 2] {
        match self {
            Self::MinMax {
                data_min, data_max, ..
            } => [("data_min", data_min.len()), ("data_max", data_max.len())],
            Self::Standard { mean, scale } => [("mean", mean.len()), ("scale", scale.len())],
        }
    }

    fn transform_value(&self, i: usize, x: f64) -> f64 {
        match self {
            Self::MinMax {
                data_min,
                data_max,
                feature_range: [lo, hi],
            } => {
                let scale = (hi - lo) / non_zero(data_max[i] - data_min[i]);
                let min = lo - data_min[i] * scale;
                x * scale + min
            }
            Self::Standard { mean, scale } => (x - mean[i]) / non_zero(scale[i]),
        }
    }
}

impl ScalerArtifact {
    /// Check that every parameter vector matches `cols_to_scale`.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.cols_to_scale.len();
        if n == 0 {
            return Err("cols_to_scale is empty".into());
        }
        for (name, len) in self.scaler.param_lengths() {
            if len != n {
                return Err(format!(
                    "{name} has {len} entries but cols_to_scale has {n}"
                ));
            }
        }
        if let FittedScaler::MinMax {
            feature_range: [lo, hi],
            ..
        } = self.scaler
        {
            if lo >= hi {
                return Err(format!("feature_range [{lo}, {hi}] is empty"));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for ScalerArtifact {
    fn columns_to_scale(&self) -> &[String] {
        &self.cols_to_scale
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ScalingError> {
        if values.len() != self.cols_to_scale.len() {
            return Err(ScalingError::Transform(format!(
                "expected {} values, got {}",
                self.cols_to_scale.len(),
                values.len()
            )));
        }
        if let Some((name, len)) = self
            .scaler
            .param_lengths()
            .into_iter()
            .find(|&(_, len)| len != values.len())
        {
            return Err(ScalingError::Transform(format!(
                "{name} has {len} entries for {} values",
                values.len()
            )));
        }
        Ok(values
            .iter()
            .enumerate()
            .map(|(i, &x)| self.scaler.transform_value(i, x))
            .collect())
    }
}
