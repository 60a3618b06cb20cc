//! Age brackets used to route scaling and inference.

use serde::{Deserialize, Serialize};

/// Inclusive upper age of the younger bracket.
pub const YOUNG_BRACKET_MAX_AGE: f64 = 25.0;

/// Age bracket an applicant falls into.
///
/// Both the scaler and the model are chosen from the same bracket value, so the
/// vector is always scaled for the model that consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    /// Age 25 and under.
    #[serde(rename = "up_to_25")]
    UpTo25,
    /// Older than 25.
    #[serde(rename = "above_25")]
    Above25,
}

impl AgeBracket {
    pub const ALL: [Self; 2] = [Self::UpTo25, Self::Above25];

    #[must_use]
    pub fn from_age(age: f64) -> Self {
        if age <= YOUNG_BRACKET_MAX_AGE {
            Self::UpTo25
        } else {
            Self::Above25
        }
    }

    /// Suffix used in artifact file names.
    #[must_use]
    pub fn artifact_suffix(&self) -> &'static str {
        match self {
            Self::UpTo25 => "age_under_25",
            Self::Above25 => "age_above_25",
        }
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpTo25 => write!(f, "<=25"),
            Self::Above25 => write!(f, ">25"),
        }
    }
}

/// One value per age bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketPair<T> {
    pub up_to_25: T,
    pub above_25: T,
}

impl<T> BracketPair<T> {
    pub fn new(up_to_25: T, above_25: T) -> Self {
        Self { up_to_25, above_25 }
    }

    pub fn get(&self, bracket: AgeBracket) -> &T {
        match bracket {
            AgeBracket::UpTo25 => &self.up_to_25,
            AgeBracket::Above25 => &self.above_25,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> BracketPair<U> {
        BracketPair {
            up_to_25: f(self.up_to_25),
            above_25: f(self.above_25),
        }
    }

    /// Build a pair by running a fallible loader for each bracket.
    ///
    /// # Errors
    /// Returns the first loader error.
    pub fn try_from_fn<E>(mut f: impl FnMut(AgeBracket) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            up_to_25: f(AgeBracket::UpTo25)?,
            above_25: f(AgeBracket::Above25)?,
        })
    }
}
