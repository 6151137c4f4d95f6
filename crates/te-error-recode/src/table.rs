//! # Recode Lookup Tables
//!
//! An error-recode polygon can override each of the three SDG 15.3.1
//! indicator states (degraded, stable, improved) independently. Each axis
//! has four options, `None` meaning "leave unchanged", so there are
//! `4 × 4 × 4 = 64` option triples. Each triple gets a sequential code
//! `0..=63`, enumerated with the degraded axis outermost, then stable, then
//! improved innermost.
//!
//! Two shapes of the same enumeration are exposed:
//!
//! - [`trans_code_lists`]: four parallel lists `(code, deg_to, stable_to,
//!   imp_to)` for the raster engine, with `None` written as [`NO_RECODE`].
//! - [`recode_to_trans_code_dict`]: option triple (with `None` kept) to code.
//!
//! Both are built from [`triples`], so a code means the same triple in
//! either shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use te_core::ValidationError;

/// Sentinel standing for "no recoding" in [`trans_code_lists`]. Distinct from
/// `-32768`, which means "recode to nodata".
pub const NO_RECODE: i32 = -9999;

/// Options for `recode_deg_to`.
pub const RECODE_DEG_TO_OPTIONS: [Option<i32>; 4] = [None, Some(-32768), Some(0), Some(1)];

/// Options for `recode_stable_to`.
pub const RECODE_STABLE_TO_OPTIONS: [Option<i32>; 4] = [None, Some(-32768), Some(-1), Some(1)];

/// Options for `recode_imp_to`.
pub const RECODE_IMP_TO_OPTIONS: [Option<i32>; 4] = [None, Some(-32768), Some(-1), Some(0)];

/// One option per axis: `(deg_to, stable_to, imp_to)`.
pub type RecodeTriple = (Option<i32>, Option<i32>, Option<i32>);

/// The enumeration as four parallel lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransCodeLists {
    /// Sequential codes, `0..=63`.
    pub codes: Vec<i32>,
    /// Target for degraded pixels, [`NO_RECODE`] for unchanged.
    pub deg_to: Vec<i32>,
    /// Target for stable pixels, [`NO_RECODE`] for unchanged.
    pub stable_to: Vec<i32>,
    /// Target for improved pixels, [`NO_RECODE`] for unchanged.
    pub imp_to: Vec<i32>,
}

/// Every option triple with its code, in code order.
pub fn triples() -> impl Iterator<Item = (i32, RecodeTriple)> {
    RECODE_DEG_TO_OPTIONS
        .into_iter()
        .flat_map(|deg| {
            RECODE_STABLE_TO_OPTIONS.into_iter().flat_map(move |stable| {
                RECODE_IMP_TO_OPTIONS
                    .into_iter()
                    .map(move |imp| (deg, stable, imp))
            })
        })
        .zip(0..)
        .map(|(triple, code)| (code, triple))
}

/// The enumeration as four parallel lists.
pub fn trans_code_lists() -> TransCodeLists {
    let mut out = TransCodeLists {
        codes: Vec::with_capacity(64),
        deg_to: Vec::with_capacity(64),
        stable_to: Vec::with_capacity(64),
        imp_to: Vec::with_capacity(64),
    };
    for (code, (deg, stable, imp)) in triples() {
        out.codes.push(code);
        out.deg_to.push(deg.unwrap_or(NO_RECODE));
        out.stable_to.push(stable.unwrap_or(NO_RECODE));
        out.imp_to.push(imp.unwrap_or(NO_RECODE));
    }
    out
}

/// The enumeration keyed by option triple.
pub fn recode_to_trans_code_dict() -> BTreeMap<RecodeTriple, i32> {
    triples().map(|(code, triple)| (triple, code)).collect()
}

/// Code of a triple, checking each value against its axis.
///
/// # Errors
///
/// [`ValidationError::InvalidOption`] naming the first axis whose value is
/// not one of its options.
pub fn trans_code((deg, stable, imp): RecodeTriple) -> Result<i32, ValidationError> {
    let i = axis_index("recode_deg_to", &RECODE_DEG_TO_OPTIONS, deg, "null, -32768, 0, 1")?;
    let j = axis_index(
        "recode_stable_to",
        &RECODE_STABLE_TO_OPTIONS,
        stable,
        "null, -32768, -1, 1",
    )?;
    let k = axis_index("recode_imp_to", &RECODE_IMP_TO_OPTIONS, imp, "null, -32768, -1, 0")?;
    Ok(i * 16 + j * 4 + k)
}

fn axis_index(
    field: &'static str,
    options: &[Option<i32>; 4],
    value: Option<i32>,
    allowed: &'static str,
) -> Result<i32, ValidationError> {
    (0..)
        .zip(options)
        .find(|(_, o)| **o == value)
        .map(|(i, _)| i)
        .ok_or_else(|| ValidationError::InvalidOption {
            field,
            value: value.map_or_else(|| "null".to_string(), |v| v.to_string()),
            allowed,
        })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn option_of(options: [Option<i32>; 4]) -> impl Strategy<Value = Option<i32>> {
        prop::sample::select(options.to_vec())
    }

    proptest! {
        /// Any valid triple's code points at that triple in the lists form.
        #[test]
        fn code_round_trips_through_lists(
            deg in option_of(RECODE_DEG_TO_OPTIONS),
            stable in option_of(RECODE_STABLE_TO_OPTIONS),
            imp in option_of(RECODE_IMP_TO_OPTIONS),
        ) {
            let code = trans_code((deg, stable, imp)).unwrap();
            let lists = trans_code_lists();
            let idx = usize::try_from(code).unwrap();
            prop_assert_eq!(lists.deg_to[idx], deg.unwrap_or(NO_RECODE));
            prop_assert_eq!(lists.stable_to[idx], stable.unwrap_or(NO_RECODE));
            prop_assert_eq!(lists.imp_to[idx], imp.unwrap_or(NO_RECODE));
        }
    }
}
