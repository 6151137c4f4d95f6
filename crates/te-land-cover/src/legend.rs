//! # Land Cover Legend
//!
//! An ordered, code-unique collection of [`LandCoverClass`]es plus an
//! optional nodata sentinel class.
//!
//! ## Invariants
//!
//! - Every code in `key` is unique, and the nodata code (if any) does not
//!   collide with a key code. Violations are rejected at construction.
//! - `key` is kept sorted ascending by code. Construction sorts it, and
//!   [`Legend::add_update_class`] inserts at the sorted position, so callers
//!   must not rely on insertion order.
//! - The nodata class takes part in lookups ([`Legend::key_with_nodata`],
//!   [`Legend::class_by_code`]) but never in transition ordinals.
//!
//! ## Transition codes
//!
//! A transition `(initial, final)` is packed into one integer as
//! `class_index(initial) * multiplier + class_index(final)`, where
//! `class_index` is the 1-based position in the code-sorted key and the
//! multiplier is the smallest power of ten `>= len(key)`. Using ordinals
//! rather than raw codes keeps the multiplier small for legends with sparse
//! or large codes, and makes the packing collision-free.
//!
//! Older legends derived the multiplier from the maximum class *code*. That
//! form collides when codes are non-contiguous and is superseded; tables
//! generated with it are not rewritten here.

use serde::{Deserialize, Serialize};
use te_core::{LookupError, Schema, TeError, Translate, Translations, ValidationError};

use crate::class::{ClassCode, LandCoverClass};

/// A land-cover legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    name: String,
    key: Vec<LandCoverClass>,
    nodata: Option<LandCoverClass>,
}

#[derive(Deserialize)]
struct LegendRecord {
    name: String,
    #[serde(default)]
    key: Vec<LandCoverClass>,
    #[serde(default)]
    nodata: Option<LandCoverClass>,
}

impl TryFrom<LegendRecord> for Legend {
    type Error = ValidationError;

    fn try_from(record: LegendRecord) -> Result<Self, Self::Error> {
        Self::new(record.name, record.key, record.nodata)
    }
}

te_core::impl_validating_deserialize!(Legend, LegendRecord);

impl Schema for Legend {
    fn validate(&self) -> Result<(), TeError> {
        check_codes(&self.name, &self.key, self.nodata.as_ref())?;
        Ok(())
    }
}

/// Attribute selector for [`Legend::class_by_attr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAttr<'a> {
    /// Match on `code`.
    Code(ClassCode),
    /// Match on `name_short`.
    NameShort(&'a str),
    /// Match on `name_long`.
    NameLong(&'a str),
    /// Match on `description`.
    Description(&'a str),
    /// Match on `color`.
    Color(&'a str),
}

impl<'a> ClassAttr<'a> {
    /// Build a selector from a wire attribute name and a textual value.
    ///
    /// # Errors
    ///
    /// [`LookupError::UnknownAttribute`] if `name` is not a class attribute,
    /// or a validation error if a `code` value is not an integer.
    pub fn parse(name: &str, value: &'a str) -> Result<Self, TeError> {
        match name {
            "code" => value.trim().parse().map(Self::Code).map_err(|_| {
                TeError::Validation(ValidationError::InvalidOption {
                    field: "code",
                    value: value.to_string(),
                    allowed: "an integer",
                })
            }),
            "name_short" => Ok(Self::NameShort(value)),
            "name_long" => Ok(Self::NameLong(value)),
            "description" => Ok(Self::Description(value)),
            "color" => Ok(Self::Color(value)),
            other => Err(LookupError::UnknownAttribute(other.to_string()).into()),
        }
    }

    fn matches(&self, lcc: &LandCoverClass) -> bool {
        match *self {
            Self::Code(code) => lcc.code() == code,
            Self::NameShort(v) => lcc.name_short() == Some(v),
            Self::NameLong(v) => lcc.name_long() == Some(v),
            Self::Description(v) => lcc.description() == Some(v),
            Self::Color(v) => lcc.color() == Some(v),
        }
    }
}

impl Legend {
    /// Build a legend, sorting `key` by code.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateCode`] if two classes share a code, or the
    /// nodata class shares a code with a key class.
    pub fn new(
        name: impl Into<String>,
        mut key: Vec<LandCoverClass>,
        nodata: Option<LandCoverClass>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        key.sort_by_key(LandCoverClass::code);
        check_codes(&name, &key, nodata.as_ref())?;
        Ok(Self { name, key, nodata })
    }

    /// Legend name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classes, sorted ascending by code. Excludes nodata.
    pub fn key(&self) -> &[LandCoverClass] {
        &self.key
    }

    /// The nodata sentinel class, if any.
    pub fn nodata(&self) -> Option<&LandCoverClass> {
        self.nodata.as_ref()
    }

    /// Number of classes in `key` (nodata excluded).
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// True if `key` has no classes.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Key classes followed by the nodata class.
    pub fn key_with_nodata(&self) -> impl Iterator<Item = &LandCoverClass> + '_ {
        self.key.iter().chain(self.nodata.iter())
    }

    /// Codes of the key classes followed by the nodata code.
    pub fn codes(&self) -> Vec<ClassCode> {
        self.key_with_nodata().map(LandCoverClass::code).collect()
    }

    /// Class with this code, including the nodata class.
    pub fn class_by_code(&self, code: ClassCode) -> Option<&LandCoverClass> {
        self.key_with_nodata().find(|c| c.code() == code)
    }

    /// Raising form of [`class_by_code`](Self::class_by_code).
    pub fn class_by_code_or_fail(&self, code: ClassCode) -> Result<&LandCoverClass, LookupError> {
        self.class_by_code(code).ok_or(LookupError::ClassCode(code))
    }

    /// First key class matching the selector. Nodata is not searched.
    pub fn class_by_attr(&self, attr: ClassAttr<'_>) -> Option<&LandCoverClass> {
        self.key.iter().find(|c| attr.matches(c))
    }

    /// First key class with this long name.
    pub fn class_by_name_long(&self, name_long: &str) -> Option<&LandCoverClass> {
        self.class_by_attr(ClassAttr::NameLong(name_long))
    }

    /// True if a class (or the nodata class) has this code.
    pub fn contains_key(&self, code: ClassCode) -> bool {
        self.class_by_code(code).is_some()
    }

    /// 1-based position of the class in the code-sorted key. `None` for the
    /// nodata class and for classes not in the legend.
    pub fn class_index(&self, lcc: &LandCoverClass) -> Option<i32> {
        let idx = self
            .key
            .binary_search_by_key(&lcc.code(), LandCoverClass::code)
            .ok()?;
        i32::try_from(idx + 1).ok()
    }

    /// Multiplier used to pack two class ordinals into one transition code:
    /// the smallest power of ten `>= len(key)`.
    ///
    /// Based on the class count, not the largest class code. Older legends
    /// derived it from `max(code)`, which can collide for sparse codes; tables
    /// stored under that scheme are not rewritten here.
    pub fn get_multiplier(&self) -> i32 {
        multiplier_for(self.key.len())
    }

    /// Packed transition code for `(initial, final)`, or `None` if either
    /// class is not in the key or the code overflows.
    pub fn transition_code(&self, initial: &LandCoverClass, final_: &LandCoverClass) -> Option<i32> {
        pack_ordinals(
            self.class_index(initial)?,
            self.class_index(final_)?,
            self.get_multiplier(),
        )
    }

    /// [`pack_ordinals`], failing with
    /// [`ValidationError::TransitionCodeOverflow`] for this legend.
    pub(crate) fn pack_checked(
        &self,
        initial_ord: i32,
        final_ord: i32,
        multiplier: i32,
    ) -> Result<i32, ValidationError> {
        pack_ordinals(initial_ord, final_ord, multiplier).ok_or_else(|| {
            ValidationError::TransitionCodeOverflow {
                legend: self.name.clone(),
                classes: self.key.len(),
            }
        })
    }

    /// Upsert by code. An existing class (nodata included) takes every field
    /// but `code` from `lcc`; a new class is inserted at its sorted position.
    pub fn add_update_class(&mut self, lcc: LandCoverClass) {
        if let Some(nodata) = self.nodata.as_mut().filter(|n| n.code() == lcc.code()) {
            tracing::debug!(legend = %self.name, code = lcc.code(), "updating nodata class");
            nodata.update(&lcc);
            return;
        }
        match self.key.binary_search_by_key(&lcc.code(), LandCoverClass::code) {
            Ok(idx) => {
                tracing::debug!(legend = %self.name, code = lcc.code(), "updating class");
                self.key[idx].update(&lcc);
            }
            Err(idx) => {
                tracing::debug!(legend = %self.name, code = lcc.code(), "adding class");
                self.key.insert(idx, lcc);
            }
        }
    }

    /// Remove the key class with this code. Returns `false` if there is none.
    pub fn remove_class(&mut self, code: ClassCode) -> bool {
        match self.key.binary_search_by_key(&code, LandCoverClass::code) {
            Ok(idx) => {
                self.key.remove(idx);
                tracing::debug!(legend = %self.name, code, "removed class");
                true
            }
            Err(_) => false,
        }
    }
}

impl Translate for Legend {
    fn translate(&mut self, translations: &Translations) {
        for c in &mut self.key {
            c.translate(translations);
        }
        if let Some(nodata) = self.nodata.as_mut() {
            nodata.translate(translations);
        }
    }
}

/// Smallest power of ten `>= n` (1 for `n <= 1`).
pub fn multiplier_for(n: usize) -> i32 {
    let mut m: i32 = 1;
    while usize::try_from(m).is_ok_and(|m| m < n) {
        match m.checked_mul(10) {
            Some(next) => m = next,
            None => break,
        }
    }
    m
}

/// `initial_ord * multiplier + final_ord`, or `None` if it overflows `i32`.
pub fn pack_ordinals(initial_ord: i32, final_ord: i32, multiplier: i32) -> Option<i32> {
    initial_ord.checked_mul(multiplier)?.checked_add(final_ord)
}

/// Reject duplicate codes. Expects `key` sorted by code.
fn check_codes(
    name: &str,
    key: &[LandCoverClass],
    nodata: Option<&LandCoverClass>,
) -> Result<(), ValidationError> {
    let duplicate = key
        .windows(2)
        .find(|w| w[0].code() == w[1].code())
        .map(|w| w[0].code())
        .or_else(|| {
            nodata
                .map(LandCoverClass::code)
                .filter(|code| key.iter().any(|c| c.code() == *code))
        });
    match duplicate {
        Some(code) => Err(ValidationError::DuplicateCode {
            legend: name.to_string(),
            code,
        }),
        None => Ok(()),
    }
}
