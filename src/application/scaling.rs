//! Scale applier: Runs a fitted scaler over its designated columns.
//!
//! The scalers were fitted on a schema that included `income_level`, a column
//! the models never see. The vector is projected onto the scaler's column list
//! with placeholders padded as null, transformed, and projected back; the
//! placeholder outputs are discarded.

use crate::domain::{column_index, FeatureVector};
use crate::ports::{FeatureScaler, ScalingError};

/// Columns the scalers were fitted with that are absent from the model schema.
pub const PLACEHOLDER_COLUMNS: [&str; 1] = ["income_level"];

/// Null value fed to the scaler for placeholder columns.
const PLACEHOLDER_VALUE: f64 = f64::NAN;

/// Where a scaler column comes from in the feature vector.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Feature(usize),
    Placeholder,
}

fn resolve_slots(columns: &[String]) -> Result<Vec<Slot>, ScalingError> {
    columns
        .iter()
        .map(|name| match column_index(name) {
            Some(i) => Ok(Slot::Feature(i)),
            None if PLACEHOLDER_COLUMNS.contains(&name.as_str()) => Ok(Slot::Placeholder),
            None => Err(ScalingError::MissingColumn(name.clone())),
        })
        .collect()
}

/// Rescale the scaler's columns of `vector` in place.
///
/// All other columns pass through unchanged. On error the vector is left
/// untouched.
///
/// # Errors
/// Returns `ScalingError::MissingColumn` if the scaler names a column that is
/// neither a feature nor a known placeholder, `ScalingError::ShapeMismatch` if
/// the transform returns the wrong number of values, and any error the
/// transform itself reports.
pub fn apply_scaling<S>(scaler: &S, vector: &mut FeatureVector) -> Result<(), ScalingError>
where
    S: FeatureScaler + ?Sized,
{
    let columns = scaler.columns_to_scale();
    let slots = resolve_slots(columns)?;

    let projected: Vec<f64> = slots
        .iter()
        .map(|slot| match slot {
            Slot::Feature(i) => vector.values()[*i],
            Slot::Placeholder => PLACEHOLDER_VALUE,
        })
        .collect();

    let scaled = scaler.transform(&projected)?;
    if scaled.len() != projected.len() {
        return Err(ScalingError::ShapeMismatch {
            expected: projected.len(),
            found: scaled.len(),
        });
    }

    for ((slot, column), value) in slots.iter().zip(columns).zip(scaled) {
        if let Slot::Feature(_) = slot {
            vector.set(column, value);
        }
    }

    tracing::debug!(
        "Scaled {} columns ({} placeholders dropped)",
        slots.iter().filter(|s| matches!(s, Slot::Feature(_))).count(),
        slots.iter().filter(|s| matches!(s, Slot::Placeholder)).count()
    );

    Ok(())
}
