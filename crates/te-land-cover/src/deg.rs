//! Land-cover change meanings in terms of land degradation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use te_core::ValidationError;

use crate::transition::{
    TransitionDefinition, TransitionMatrix, TransitionMeaning, TransitionMeaningKind,
};

/// Whether a transition degrades, keeps, or improves land condition.
///
/// Serialized as `"degradation"`, `"stable"` or `"improvement"`. Emitted in
/// remap tables as `-1`, `0` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradationMeaning {
    /// Land condition worsens.
    Degradation,
    /// No change in land condition.
    #[default]
    Stable,
    /// Land condition improves.
    Improvement,
}

impl DegradationMeaning {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degradation => "degradation",
            Self::Stable => "stable",
            Self::Improvement => "improvement",
        }
    }
}

impl TransitionMeaningKind for DegradationMeaning {
    fn code(&self) -> i32 {
        match self {
            Self::Degradation => -1,
            Self::Stable => 0,
            Self::Improvement => 1,
        }
    }
}

impl fmt::Display for DegradationMeaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DegradationMeaning {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degradation" => Ok(Self::Degradation),
            "stable" => Ok(Self::Stable),
            "improvement" => Ok(Self::Improvement),
            other => Err(ValidationError::InvalidOption {
                field: "meaning",
                value: other.to_string(),
                allowed: "degradation, stable, improvement",
            }),
        }
    }
}

/// A transition with a degradation meaning.
pub type DegradationTransition = TransitionMeaning<DegradationMeaning>;

/// A degradation transition matrix.
pub type DegradationMatrix = TransitionMatrix<DegradationMeaning>;

/// A degradation transition definition.
pub type DegradationDefinition = TransitionDefinition<DegradationMeaning>;
