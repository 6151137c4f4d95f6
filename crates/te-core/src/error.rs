//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the Trends.Earth schema crates.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Structural validation failures carry the offending codes, fields, and
//!   limits so the message points straight at the bad input.
//! - Lookup misses are only errors on the legacy raising API; the primary
//!   lookups return `Option`.
//! - Contract violations are caller bugs and are never retried.

use thiserror::Error;

/// Top-level error type for the Trends.Earth schema crates.
#[derive(Error, Debug)]
pub enum TeError {
    /// Structural validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A raising lookup found nothing.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// The caller broke an API contract.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural validation failures.
///
/// Raised at construction or from an explicit `validate()` call. Never
/// silently coerced: the input has to be corrected before it will load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A length-limited string field is too long.
    #[error("field '{field}' must be at most {max} characters (got {actual})")]
    TooLong {
        /// Wire name of the field.
        field: &'static str,
        /// Maximum permitted length, in characters.
        max: usize,
        /// Actual length, in characters.
        actual: usize,
    },

    /// A colour is not a `#RGB` or `#RRGGBB` hex string.
    #[error("invalid color \"{0}\" (expected #RGB or #RRGGBB)")]
    InvalidColor(String),

    /// Two classes in one legend share a code.
    #[error("duplicate class code {code} found in legend \"{legend}\"")]
    DuplicateCode {
        /// Legend name.
        legend: String,
        /// The repeated code.
        code: i32,
    },

    /// A code appears more than once in a nesting.
    #[error(
        "duplicates detected in {role} codes listed in nesting - each {role} must be listed \
         once and only once. {role} codes: {codes:?}"
    )]
    NestingDuplicates {
        /// `"parent"` or `"child"`.
        role: &'static str,
        /// All codes of that role listed in the nesting, sorted.
        codes: Vec<i32>,
    },

    /// The codes in a nesting do not match the codes of the legend.
    #[error("codes listed in nesting {nesting:?} don't match {role} key {legend:?}")]
    NestingMismatch {
        /// `"parent"` or `"child"`.
        role: &'static str,
        /// Codes listed in the nesting, sorted.
        nesting: Vec<i32>,
        /// Codes of the legend, sorted.
        legend: Vec<i32>,
    },

    /// No meaning is defined for a transition.
    #[error("meaning of transition from {initial} to {final_code} is undefined in matrix \"{matrix}\"")]
    TransitionUndefined {
        /// Matrix name.
        matrix: String,
        /// Initial class code.
        initial: i32,
        /// Final class code.
        final_code: i32,
    },

    /// More than one meaning is defined for a transition.
    #[error(
        "multiple definitions found for transition from {initial} to {final_code} in matrix \
         \"{matrix}\" - each transition must have only one meaning"
    )]
    TransitionDuplicate {
        /// Matrix name.
        matrix: String,
        /// Initial class code.
        initial: i32,
        /// Final class code.
        final_code: i32,
    },

    /// A transition references the legend's nodata class.
    #[error(
        "transition from {initial} to {final_code} in matrix \"{matrix}\" involves nodata class \
         {nodata} - meanings are not allowed for transitions from or to nodata"
    )]
    TransitionNodata {
        /// Matrix name.
        matrix: String,
        /// Initial class code.
        initial: i32,
        /// Final class code.
        final_code: i32,
        /// The nodata class code.
        nodata: i32,
    },

    /// A matrix does not have exactly one entry per ordered class pair.
    #[error("transitions list length for matrix \"{matrix}\" is {actual}, expected {expected} based on legend")]
    TransitionCount {
        /// Matrix name.
        matrix: String,
        /// `len(key)^2`.
        expected: usize,
        /// Number of entries present.
        actual: usize,
    },

    /// Packed transition codes for this legend do not fit in an `i32`.
    #[error("legend \"{legend}\" has {classes} classes; its transition codes overflow a 32-bit integer")]
    TransitionCodeOverflow {
        /// Legend name.
        legend: String,
        /// Number of key classes.
        classes: usize,
    },

    /// A remap table's two lists differ in length.
    #[error("remap table lists must have equal lengths (from: {from}, to: {to})")]
    RemapLengthMismatch {
        /// Length of the `from` list.
        from: usize,
        /// Length of the `to` list.
        to: usize,
    },

    /// A transition definition holds no matrices.
    #[error("transition definition \"{0}\" must contain at least one matrix")]
    NoDefinitions(String),

    /// A value is not one of the permitted options for a field.
    #[error("{value} is not a permitted value for '{field}' (allowed: {allowed})")]
    InvalidOption {
        /// Wire name of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable list of accepted values.
        allowed: &'static str,
    },

    /// A list field that must be non-empty is empty.
    #[error("field '{0}' must not be empty")]
    Empty(&'static str),

    /// A discriminator field has the wrong constant value.
    #[error("field 'type' must be \"{expected}\" (got \"{actual}\")")]
    WrongType {
        /// Required value.
        expected: &'static str,
        /// Value found.
        actual: String,
    },
}

/// Failures of the legacy raising lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No class has this code.
    #[error("no land cover class found for code \"{0}\"")]
    ClassCode(i32),

    /// The child class is not nested under any parent.
    #[error("no parent class found for child class \"{0}\"")]
    ParentForChild(i32),

    /// No meaning is defined for this transition.
    #[error("no meaning found for transition from {initial} to {final_code}")]
    Transition {
        /// Initial class code.
        initial: i32,
        /// Final class code.
        final_code: i32,
    },

    /// The attribute name does not exist on a land cover class.
    #[error("land cover classes have no attribute \"{0}\"")]
    UnknownAttribute(String),
}

/// Programming-contract violations. These are caller bugs, not data errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// A definition holds several named matrices and no key was given.
    #[error("definition holds multiple named matrices; a matrix key is required (available: {0:?})")]
    MatrixKeyRequired(Vec<String>),

    /// The requested matrix key does not exist.
    #[error("no transition matrix named \"{0}\"")]
    UnknownMatrixKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn te_error_validation_display() {
        let err = TeError::from(ValidationError::DuplicateCode {
            legend: "UNCCD".to_string(),
            code: 3,
        });
        let msg = format!("{err}");
        assert!(msg.starts_with("validation error"));
        assert!(msg.contains("duplicate class code 3"));
        assert!(msg.contains("UNCCD"));
    }

    #[test]
    fn nesting_duplicates_cites_codes() {
        let err = ValidationError::NestingDuplicates {
            role: "child",
            codes: vec![10, 11, 11],
        };
        let msg = format!("{err}");
        assert!(msg.contains("child codes"));
        assert!(msg.contains("[10, 11, 11]"));
    }

    #[test]
    fn nesting_mismatch_cites_both_lists() {
        let err = ValidationError::NestingMismatch {
            role: "parent",
            nesting: vec![1, 3],
            legend: vec![1, 2],
        };
        let msg = format!("{err}");
        assert!(msg.contains("[1, 3]"));
        assert!(msg.contains("parent key [1, 2]"));
    }

    #[test]
    fn lookup_error_display() {
        let err = TeError::from(LookupError::ClassCode(42));
        assert!(format!("{err}").contains("\"42\""));
    }

    #[test]
    fn contract_error_lists_keys() {
        let err = ContractError::MatrixKeyRequired(vec!["deg".into(), "soc".into()]);
        let msg = format!("{err}");
        assert!(msg.contains("\"deg\""));
        assert!(msg.contains("\"soc\""));
    }

    #[test]
    fn json_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TeError::from(bad);
        assert!(matches!(err, TeError::Json(_)));
    }
}
