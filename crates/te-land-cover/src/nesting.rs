//! # Legend Nesting
//!
//! Defines how a detailed ("child") legend nests within a coarser
//! ("parent") legend: each parent code maps to the ordered list of child
//! codes aggregated into it.
//!
//! ## Partition Invariant
//!
//! Checked at construction and by [`Schema::validate`]:
//!
//! 1. Every child code appears in the nesting exactly once.
//! 2. The parent codes of the nesting are exactly the parent legend's codes.
//! 3. The child codes of the nesting are exactly the child legend's codes.
//!
//! Whether nodata classes take part is an explicit [`NestingOptions`]
//! choice, never inferred. With `nodata_in_nesting` (the default) each
//! legend's nodata code must be nested like any other class; without it,
//! nodata codes must not appear in the nesting at all.
//!
//! ## Mutation
//!
//! The map is private. The mutators keep the invariant under either nodata
//! setting, except where noted: [`LegendNesting::remove_parent_class`]
//! orphans the removed parent's children, and the caller is expected to
//! re-home them (see [`LegendNesting::orphan_children`]) before validating
//! again. A nodata parent never gets a bucket when nodata is left out of the
//! nesting, and cannot be removed since a legend's nodata class is not part
//! of its key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use te_core::{LookupError, Schema, TeError, Translate, Translations, ValidationError};

use crate::class::{ClassCode, LandCoverClass};
use crate::legend::{multiplier_for, Legend};
use crate::remap::RemapTable;

/// Parent code to ordered child codes.
pub type NestingMap = BTreeMap<ClassCode, Vec<ClassCode>>;

/// Configuration for how a nesting treats nodata classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestingOptions {
    /// Whether each legend's nodata class must be nested like a regular
    /// class.
    pub nodata_in_nesting: bool,
}

impl Default for NestingOptions {
    fn default() -> Self {
        Self {
            nodata_in_nesting: true,
        }
    }
}

/// A validated nesting of a child legend within a parent legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendNesting {
    parent: Legend,
    child: Legend,
    nesting: NestingMap,
    #[serde(skip)]
    options: NestingOptions,
}

#[derive(Deserialize)]
struct NestingRecord {
    parent: Legend,
    child: Legend,
    #[serde(default)]
    nesting: NestingMap,
}

impl TryFrom<NestingRecord> for LegendNesting {
    type Error = ValidationError;

    fn try_from(record: NestingRecord) -> Result<Self, Self::Error> {
        Self::new(record.parent, record.child, record.nesting)
    }
}

te_core::impl_validating_deserialize!(LegendNesting, NestingRecord);

impl Schema for LegendNesting {
    fn validate(&self) -> Result<(), TeError> {
        check_partition(&self.parent, &self.child, &self.nesting, self.options)?;
        Ok(())
    }
}

impl LegendNesting {
    /// Build a nesting with default options (nodata participates).
    ///
    /// # Errors
    ///
    /// A [`ValidationError::NestingDuplicates`] or
    /// [`ValidationError::NestingMismatch`] citing the offending codes.
    pub fn new(
        parent: Legend,
        child: Legend,
        nesting: impl IntoIterator<Item = (ClassCode, Vec<ClassCode>)>,
    ) -> Result<Self, ValidationError> {
        Self::with_options(parent, child, nesting, NestingOptions::default())
    }

    /// Build a nesting with explicit options.
    ///
    /// A parent code listed twice in `nesting` is rejected rather than
    /// merged.
    pub fn with_options(
        parent: Legend,
        child: Legend,
        nesting: impl IntoIterator<Item = (ClassCode, Vec<ClassCode>)>,
        options: NestingOptions,
    ) -> Result<Self, ValidationError> {
        let entries: Vec<(ClassCode, Vec<ClassCode>)> = nesting.into_iter().collect();
        let mut parent_codes: Vec<ClassCode> = entries.iter().map(|(p, _)| *p).collect();
        parent_codes.sort_unstable();
        if has_duplicates(&parent_codes) {
            return Err(ValidationError::NestingDuplicates {
                role: "parent",
                codes: parent_codes,
            });
        }
        let nesting: NestingMap = entries.into_iter().collect();
        check_partition(&parent, &child, &nesting, options)?;
        Ok(Self {
            parent,
            child,
            nesting,
            options,
        })
    }

    /// Deserialize from a JSON value with explicit options.
    pub fn load_with_options(value: Value, options: NestingOptions) -> Result<Self, TeError> {
        let record: NestingRecord = serde_json::from_value(value)?;
        Ok(Self::with_options(record.parent, record.child, record.nesting, options)?)
    }

    /// The coarser legend.
    pub fn parent(&self) -> &Legend {
        &self.parent
    }

    /// The finer legend.
    pub fn child(&self) -> &Legend {
        &self.child
    }

    /// Read-only view of the nesting map.
    pub fn nesting(&self) -> &NestingMap {
        &self.nesting
    }

    /// The options this nesting was validated with.
    pub fn options(&self) -> NestingOptions {
        self.options
    }

    /// Parent of `child`, or `None` for an orphan.
    pub fn parent_for_child(&self, child: &LandCoverClass) -> Option<&LandCoverClass> {
        let parent_code = self.parent_code_for(child.code())?;
        self.parent.class_by_code(parent_code)
    }

    /// Raising form of [`parent_for_child`](Self::parent_for_child).
    pub fn parent_for_child_or_fail(&self, child: &LandCoverClass) -> Result<&LandCoverClass, LookupError> {
        self.parent_for_child(child)
            .ok_or(LookupError::ParentForChild(child.code()))
    }

    /// Child class with this code, if any.
    pub fn child_class(&self, code: ClassCode) -> Option<&LandCoverClass> {
        self.child.class_by_code(code)
    }

    /// Children nested under `parent`, in nesting order. Empty if the parent
    /// has no bucket.
    pub fn children_for_parent(&self, parent: &LandCoverClass) -> Vec<&LandCoverClass> {
        self.nesting
            .get(&parent.code())
            .map(|codes| codes.iter().filter_map(|&c| self.child_class(c)).collect())
            .unwrap_or_default()
    }

    /// Child classes not nested under any parent. The child nodata class
    /// counts when nodata takes part in the nesting.
    pub fn orphan_children(&self) -> Vec<&LandCoverClass> {
        let nodata = self.child.nodata().filter(|_| self.options.nodata_in_nesting);
        self.child
            .key()
            .iter()
            .chain(nodata)
            .filter(|c| self.parent_code_for(c.code()).is_none())
            .collect()
    }

    /// Upsert `parent` into the parent legend, then nest `children` under it.
    ///
    /// A parent added without children still gets an (empty) bucket so the
    /// parent codes of the nesting keep matching the parent legend. The
    /// parent nodata class is only updated, with no bucket and no children,
    /// when nodata is left out of the nesting.
    pub fn add_update_parent(&mut self, parent: LandCoverClass, children: &[LandCoverClass]) {
        let code = parent.code();
        self.parent.add_update_class(parent);
        if !takes_part(&self.parent, code, self.options) {
            tracing::debug!(parent = code, "nodata parent kept out of nesting");
            return;
        }
        self.nesting.entry(code).or_default();
        if !children.is_empty() {
            let target = LandCoverClass::new(code);
            self.add_update_children(children, &target);
        }
    }

    /// Nest `children` under `parent`, moving each out of its previous
    /// bucket. Each child is upserted into the child legend first; the child
    /// nodata class is updated in place, never added to the key, and is only
    /// nested when nodata takes part in the nesting.
    ///
    /// Returns `false`, without changing anything, if `parent` is not a
    /// nested parent code (unknown, or the parent nodata class while nodata
    /// is left out).
    pub fn add_update_children(&mut self, children: &[LandCoverClass], parent: &LandCoverClass) -> bool {
        if !takes_part(&self.parent, parent.code(), self.options) {
            return false;
        }
        let child_nodata = self.child.nodata().map(LandCoverClass::code);
        for c in children {
            self.child.add_update_class(c.clone());
            if child_nodata == Some(c.code()) && !self.options.nodata_in_nesting {
                continue;
            }
            self.detach(c.code());
            self.nesting.entry(parent.code()).or_default().push(c.code());
            tracing::debug!(child = c.code(), parent = parent.code(), "nested child class");
        }
        true
    }

    /// Move `child` from its current parent to `new_parent`.
    ///
    /// # Errors
    ///
    /// [`LookupError::ParentForChild`] if `child` is an orphan, or
    /// [`LookupError::ClassCode`] if `new_parent` is not a nested parent code.
    pub fn update_parent(&mut self, child: &LandCoverClass, new_parent: &LandCoverClass) -> Result<(), LookupError> {
        if self.parent_code_for(child.code()).is_none() {
            return Err(LookupError::ParentForChild(child.code()));
        }
        if !takes_part(&self.parent, new_parent.code(), self.options) {
            return Err(LookupError::ClassCode(new_parent.code()));
        }
        self.detach(child.code());
        self.nesting
            .entry(new_parent.code())
            .or_default()
            .push(child.code());
        Ok(())
    }

    /// Remove `parent` from the parent legend and drop its bucket. Its
    /// children become orphans. Returns `false`, changing nothing, if
    /// `parent` is not a key class of the parent legend; the nodata class
    /// cannot be removed.
    pub fn remove_parent_class(&mut self, parent: &LandCoverClass) -> bool {
        if !self.parent.remove_class(parent.code()) {
            return false;
        }
        if let Some(orphaned) = self.nesting.remove(&parent.code()) {
            if !orphaned.is_empty() {
                tracing::warn!(
                    parent = parent.code(),
                    children = ?orphaned,
                    "removed parent class; its children are now orphans"
                );
            }
        }
        true
    }

    /// Nesting as a GEE remap table from child code to parent code, bucket
    /// by bucket in ascending parent-code order.
    pub fn get_list(&self) -> RemapTable {
        let mut out = RemapTable::with_capacity(self.nesting.values().map(Vec::len).sum());
        for (&parent, children) in &self.nesting {
            for &child in children {
                out.push(child, parent);
            }
        }
        out
    }

    /// Power of ten covering the larger of the two legends.
    pub fn get_multiplier(&self) -> i32 {
        multiplier_for(self.child.len().max(self.parent.len()))
    }

    fn parent_code_for(&self, child: ClassCode) -> Option<ClassCode> {
        self.nesting
            .iter()
            .find(|(_, children)| children.contains(&child))
            .map(|(&parent, _)| parent)
    }

    fn detach(&mut self, child: ClassCode) {
        for children in self.nesting.values_mut() {
            children.retain(|&c| c != child);
        }
    }
}

impl Translate for LegendNesting {
    fn translate(&mut self, translations: &Translations) {
        self.parent.translate(translations);
        self.child.translate(translations);
    }
}

fn has_duplicates(sorted: &[ClassCode]) -> bool {
    sorted.windows(2).any(|w| w[0] == w[1])
}

/// True if `code` belongs in the nesting for `legend`: a key class, or the
/// nodata class when nodata takes part.
fn takes_part(legend: &Legend, code: ClassCode, options: NestingOptions) -> bool {
    match legend.nodata() {
        Some(nodata) if nodata.code() == code => options.nodata_in_nesting,
        _ => legend.contains_key(code),
    }
}

fn legend_codes(legend: &Legend, options: NestingOptions) -> Vec<ClassCode> {
    let mut codes = if options.nodata_in_nesting {
        legend.codes()
    } else {
        legend.key().iter().map(LandCoverClass::code).collect()
    };
    codes.sort_unstable();
    codes
}

fn check_partition(
    parent: &Legend,
    child: &Legend,
    nesting: &NestingMap,
    options: NestingOptions,
) -> Result<(), ValidationError> {
    // Map keys are unique and already sorted.
    let nesting_parent_codes: Vec<ClassCode> = nesting.keys().copied().collect();
    let mut nesting_child_codes: Vec<ClassCode> = nesting.values().flatten().copied().collect();
    nesting_child_codes.sort_unstable();

    if has_duplicates(&nesting_child_codes) {
        return Err(ValidationError::NestingDuplicates {
            role: "child",
            codes: nesting_child_codes,
        });
    }

    let parent_codes = legend_codes(parent, options);
    if parent_codes != nesting_parent_codes {
        return Err(ValidationError::NestingMismatch {
            role: "parent",
            nesting: nesting_parent_codes,
            legend: parent_codes,
        });
    }

    let child_codes = legend_codes(child, options);
    if child_codes != nesting_child_codes {
        return Err(ValidationError::NestingMismatch {
            role: "child",
            nesting: nesting_child_codes,
            legend: child_codes,
        });
    }
    Ok(())
}
