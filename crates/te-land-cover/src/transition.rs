//! # Transition Matrices
//!
//! A transition matrix assigns a meaning to every ordered pair
//! `(initial, final)` of classes in a legend. A [`TransitionDefinition`]
//! binds one matrix, or several named matrices, to the legend they are
//! complete over, and derives the GEE remap tables consumed by the raster
//! remapping engine.
//!
//! The meaning type is pluggable through [`TransitionMeaningKind`]; the
//! degradation variant lives in [`crate::deg`].
//!
//! ## Completeness
//!
//! For a legend with `n` key classes, every matrix must hold exactly one
//! entry per ordered pair of key classes (`n²` entries in total), and no
//! entry may reference the legend's nodata class. Entries are matched to
//! pairs by class code.
//!
//! ## Table Order
//!
//! [`TransitionDefinition::get_list`] iterates `final` in the outer loop and
//! `initial` in the inner loop. [`TransitionDefinition::get_persistence_list`]
//! iterates `initial` outer and `final` inner. Consumers pair values by
//! position, so both orders are fixed.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use te_core::{
    ContractError, LookupError, Schema, TeError, Translate, Translations, ValidationError,
};

use crate::class::{ClassCode, LandCoverClass};
use crate::legend::Legend;
use crate::remap::RemapTable;

/// A meaning that can be attached to a transition and emitted as an integer
/// in remap tables.
///
/// `Default` is the meaning given to transitions created implicitly when a
/// class is added to a definition.
pub trait TransitionMeaningKind:
    Clone + fmt::Debug + PartialEq + Default + Serialize + DeserializeOwned
{
    /// Integer emitted for this meaning in remap tables.
    fn code(&self) -> i32;
}

/// The meaning of one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "M: TransitionMeaningKind")]
pub struct TransitionMeaning<M> {
    initial: LandCoverClass,
    #[serde(rename = "final")]
    final_: LandCoverClass,
    meaning: M,
}

impl<M: TransitionMeaningKind> TransitionMeaning<M> {
    /// A meaning for the transition `initial -> final_`.
    pub fn new(initial: LandCoverClass, final_: LandCoverClass, meaning: M) -> Self {
        Self {
            initial,
            final_,
            meaning,
        }
    }

    /// Class at the start of the transition.
    pub fn initial(&self) -> &LandCoverClass {
        &self.initial
    }

    /// Class at the end of the transition.
    pub fn final_class(&self) -> &LandCoverClass {
        &self.final_
    }

    /// The meaning.
    pub fn meaning(&self) -> &M {
        &self.meaning
    }

    /// Replace the meaning.
    pub fn set_meaning(&mut self, meaning: M) {
        self.meaning = meaning;
    }

    /// Integer code of the meaning.
    pub fn code(&self) -> i32 {
        self.meaning.code()
    }

    /// `(initial, final)` class codes.
    pub fn codes(&self) -> (ClassCode, ClassCode) {
        (self.initial.code(), self.final_.code())
    }

    /// True if `lcc` is the initial or the final class (by code).
    pub fn contains_class(&self, lcc: &LandCoverClass) -> bool {
        self.initial.code() == lcc.code() || self.final_.code() == lcc.code()
    }

    /// Copy the metadata of `lcc` into whichever side(s) carry its code.
    pub fn update_class(&mut self, lcc: &LandCoverClass) {
        if self.initial.code() == lcc.code() {
            self.initial.update(lcc);
        }
        if self.final_.code() == lcc.code() {
            self.final_.update(lcc);
        }
    }

    fn matches(&self, initial: ClassCode, final_: ClassCode) -> bool {
        self.initial.code() == initial && self.final_.code() == final_
    }
}

impl<M> Translate for TransitionMeaning<M> {
    fn translate(&mut self, translations: &Translations) {
        self.initial.translate(translations);
        self.final_.translate(translations);
    }
}

/// A named list of transition meanings.
///
/// Completeness is relative to a legend, so it is checked by the enclosing
/// [`TransitionDefinition`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "M: TransitionMeaningKind")]
pub struct TransitionMatrix<M> {
    name: String,
    transitions: Vec<TransitionMeaning<M>>,
}

impl<M: TransitionMeaningKind> TransitionMatrix<M> {
    /// A matrix with the given entries.
    pub fn new(name: impl Into<String>, transitions: Vec<TransitionMeaning<M>>) -> Self {
        Self {
            name: name.into(),
            transitions,
        }
    }

    /// Matrix name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in stored order.
    pub fn transitions(&self) -> &[TransitionMeaning<M>] {
        &self.transitions
    }

    /// First entry for `initial -> final_`, matched by code.
    pub fn meaning_by_transition(
        &self,
        initial: &LandCoverClass,
        final_: &LandCoverClass,
    ) -> Option<&TransitionMeaning<M>> {
        self.transitions
            .iter()
            .find(|t| t.matches(initial.code(), final_.code()))
    }

    /// Raising form of [`meaning_by_transition`](Self::meaning_by_transition).
    pub fn meaning_by_transition_or_fail(
        &self,
        initial: &LandCoverClass,
        final_: &LandCoverClass,
    ) -> Result<&TransitionMeaning<M>, LookupError> {
        self.meaning_by_transition(initial, final_)
            .ok_or(LookupError::Transition {
                initial: initial.code(),
                final_code: final_.code(),
            })
    }

    /// Mutable form of [`meaning_by_transition`](Self::meaning_by_transition).
    pub fn meaning_by_transition_mut(
        &mut self,
        initial: &LandCoverClass,
        final_: &LandCoverClass,
    ) -> Option<&mut TransitionMeaning<M>> {
        self.transitions
            .iter_mut()
            .find(|t| t.matches(initial.code(), final_.code()))
    }

    /// Entries with `lcc` on either side.
    pub fn meanings_by_class(&self, lcc: &LandCoverClass) -> Vec<&TransitionMeaning<M>> {
        self.transitions
            .iter()
            .filter(|t| t.contains_class(lcc))
            .collect()
    }

    /// Drop every entry with `lcc` on either side. Returns `true` if at least
    /// one entry was removed.
    pub fn remove_meanings_by_class(&mut self, lcc: &LandCoverClass) -> bool {
        let before = self.transitions.len();
        self.transitions.retain(|t| !t.contains_class(lcc));
        before != self.transitions.len()
    }

    /// Copy the metadata of `lcc` into every entry that references it.
    pub fn update_meaning_classes(&mut self, lcc: &LandCoverClass) {
        for t in &mut self.transitions {
            t.update_class(lcc);
        }
    }

    /// Check completeness against `legend`.
    pub fn check_complete(&self, legend: &Legend) -> Result<(), ValidationError> {
        if let Some(nodata) = legend.nodata().map(LandCoverClass::code) {
            if let Some(t) = self
                .transitions
                .iter()
                .find(|t| t.initial.code() == nodata || t.final_.code() == nodata)
            {
                return Err(ValidationError::TransitionNodata {
                    matrix: self.name.clone(),
                    initial: t.initial.code(),
                    final_code: t.final_.code(),
                    nodata,
                });
            }
        }

        let mut counts: HashMap<(ClassCode, ClassCode), usize> =
            HashMap::with_capacity(self.transitions.len());
        for t in &self.transitions {
            *counts.entry(t.codes()).or_default() += 1;
        }
        for c_final in legend.key() {
            for c_initial in legend.key() {
                let pair = (c_initial.code(), c_final.code());
                match counts.get(&pair).copied().unwrap_or(0) {
                    0 => {
                        return Err(ValidationError::TransitionUndefined {
                            matrix: self.name.clone(),
                            initial: pair.0,
                            final_code: pair.1,
                        })
                    }
                    1 => {}
                    _ => {
                        return Err(ValidationError::TransitionDuplicate {
                            matrix: self.name.clone(),
                            initial: pair.0,
                            final_code: pair.1,
                        })
                    }
                }
            }
        }

        let expected = legend.len() * legend.len();
        if self.transitions.len() != expected {
            return Err(ValidationError::TransitionCount {
                matrix: self.name.clone(),
                expected,
                actual: self.transitions.len(),
            });
        }
        Ok(())
    }

    /// Meaning codes keyed by `(initial, final)` class codes. The first
    /// entry wins when a pair is repeated.
    fn code_index(&self) -> HashMap<(ClassCode, ClassCode), i32> {
        let mut index = HashMap::with_capacity(self.transitions.len());
        for t in &self.transitions {
            index.entry(t.codes()).or_insert_with(|| t.code());
        }
        index
    }

    /// Add `meaning` for every ordered pair of `legend` key classes that has
    /// no entry yet. Returns the number of entries added.
    fn fill_missing(&mut self, legend: &Legend, meaning: &M) -> usize {
        let present: HashSet<(ClassCode, ClassCode)> =
            self.transitions.iter().map(TransitionMeaning::codes).collect();
        let before = self.transitions.len();
        for initial in legend.key() {
            for final_ in legend.key() {
                if !present.contains(&(initial.code(), final_.code())) {
                    self.transitions.push(TransitionMeaning::new(
                        initial.clone(),
                        final_.clone(),
                        meaning.clone(),
                    ));
                }
            }
        }
        self.transitions.len() - before
    }
}

impl<M> Translate for TransitionMatrix<M> {
    fn translate(&mut self, translations: &Translations) {
        for t in &mut self.transitions {
            t.translate(translations);
        }
    }
}

/// One matrix, or several matrices keyed by name, sharing a legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, bound = "M: TransitionMeaningKind")]
pub enum Definitions<M> {
    /// A single matrix.
    Single(TransitionMatrix<M>),
    /// Named matrices.
    Named(BTreeMap<String, TransitionMatrix<M>>),
}

impl<M: TransitionMeaningKind> Definitions<M> {
    /// All matrices; named ones in key order.
    pub fn matrices(&self) -> impl Iterator<Item = &TransitionMatrix<M>> + '_ {
        let (single, named) = match self {
            Self::Single(m) => (Some(m), None),
            Self::Named(map) => (None, Some(map)),
        };
        single.into_iter().chain(named.into_iter().flat_map(BTreeMap::values))
    }

    fn matrices_mut(&mut self) -> impl Iterator<Item = &mut TransitionMatrix<M>> + '_ {
        let (single, named) = match self {
            Self::Single(m) => (Some(m), None),
            Self::Named(map) => (None, Some(map)),
        };
        single
            .into_iter()
            .chain(named.into_iter().flat_map(BTreeMap::values_mut))
    }

    /// Names of the named matrices. Empty for a single matrix.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Single(_) => Vec::new(),
            Self::Named(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Select a matrix. A single matrix ignores `key`; named matrices
    /// require one.
    pub fn select(&self, key: Option<&str>) -> Result<&TransitionMatrix<M>, ContractError> {
        match (self, key) {
            (Self::Single(m), _) => Ok(m),
            (Self::Named(map), Some(k)) => map
                .get(k)
                .ok_or_else(|| ContractError::UnknownMatrixKey(k.to_string())),
            (Self::Named(map), None) => Err(ContractError::MatrixKeyRequired(
                map.keys().cloned().collect(),
            )),
        }
    }
}

/// Both class codes of a transition, as emitted by
/// [`TransitionDefinition::get_transition_integers_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPair {
    /// Initial class code.
    pub initial: ClassCode,
    /// Final class code.
    #[serde(rename = "final")]
    pub final_: ClassCode,
}

/// Transition meanings bound to the legend they are complete over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "M: TransitionMeaningKind")]
pub struct TransitionDefinition<M> {
    legend: Legend,
    name: String,
    definitions: Definitions<M>,
}

#[derive(Deserialize)]
#[serde(bound = "M: TransitionMeaningKind")]
struct DefinitionRecord<M> {
    legend: Legend,
    name: String,
    definitions: Definitions<M>,
}

impl<'de, M: TransitionMeaningKind> Deserialize<'de> for TransitionDefinition<M> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = DefinitionRecord::<M>::deserialize(deserializer)?;
        Self::new(record.legend, record.name, record.definitions).map_err(D::Error::custom)
    }
}

impl<M: TransitionMeaningKind> Schema for TransitionDefinition<M> {
    fn validate(&self) -> Result<(), TeError> {
        check_definitions(&self.legend, &self.name, &self.definitions)?;
        Ok(())
    }
}

impl<M: TransitionMeaningKind> TransitionDefinition<M> {
    /// Bind `definitions` to `legend`, checking every matrix for
    /// completeness.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoDefinitions`] for an empty map of named
    /// matrices, otherwise the first completeness failure found.
    pub fn new(
        legend: Legend,
        name: impl Into<String>,
        definitions: Definitions<M>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        check_definitions(&legend, &name, &definitions)?;
        Ok(Self {
            legend,
            name,
            definitions,
        })
    }

    /// The legend the matrices are defined over.
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Definition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The matrix or matrices.
    pub fn definitions(&self) -> &Definitions<M> {
        &self.definitions
    }

    /// Select a matrix; see [`Definitions::select`].
    pub fn matrix(&self, key: Option<&str>) -> Result<&TransitionMatrix<M>, ContractError> {
        self.definitions.select(key)
    }

    /// Meaning of `initial -> final_` in the selected matrix.
    pub fn get_definition(
        &self,
        initial: &LandCoverClass,
        final_: &LandCoverClass,
        key: Option<&str>,
    ) -> Result<Option<&TransitionMeaning<M>>, ContractError> {
        Ok(self.matrix(key)?.meaning_by_transition(initial, final_))
    }

    /// GEE remap table from transition code to meaning code for the selected
    /// matrix, `final` outer and `initial` inner.
    ///
    /// # Errors
    ///
    /// A [`ContractError`] if named matrices are held and `key` is missing
    /// or unknown, [`ValidationError::TransitionUndefined`] if the matrix
    /// was left incomplete by mutation, or
    /// [`ValidationError::TransitionCodeOverflow`] for an oversized legend.
    pub fn get_list(&self, key: Option<&str>) -> Result<RemapTable, TeError> {
        let m = self.matrix(key)?;
        let index = m.code_index();
        let multiplier = self.legend.get_multiplier();
        let mut out = RemapTable::with_capacity(self.legend.len() * self.legend.len());
        for (final_ord, c_final) in (1..).zip(self.legend.key()) {
            for (initial_ord, c_initial) in (1..).zip(self.legend.key()) {
                let meaning = index
                    .get(&(c_initial.code(), c_final.code()))
                    .copied()
                    .ok_or_else(|| ValidationError::TransitionUndefined {
                        matrix: m.name().to_string(),
                        initial: c_initial.code(),
                        final_code: c_final.code(),
                    })?;
                let code = self.legend.pack_checked(initial_ord, final_ord, multiplier)?;
                out.push(code, meaning);
            }
        }
        Ok(out)
    }

    /// GEE remap table compressing the persistence diagonal, `initial` outer
    /// and `final` inner.
    ///
    /// A persistence transition `c -> c` maps to `class_index(c)`; every other
    /// transition maps to its own transition code.
    ///
    /// # Errors
    ///
    /// [`ValidationError::TransitionCodeOverflow`] for an oversized legend.
    pub fn get_persistence_list(&self) -> Result<RemapTable, ValidationError> {
        let multiplier = self.legend.get_multiplier();
        let mut out = RemapTable::with_capacity(self.legend.len() * self.legend.len());
        for (initial_ord, c_initial) in (1..).zip(self.legend.key()) {
            for (final_ord, c_final) in (1..).zip(self.legend.key()) {
                let code = self.legend.pack_checked(initial_ord, final_ord, multiplier)?;
                if c_initial.code() == c_final.code() {
                    out.push(code, initial_ord);
                } else {
                    out.push(code, code);
                }
            }
        }
        Ok(out)
    }

    /// Transition code to the `(initial, final)` class codes it packs.
    pub fn get_transition_integers_key(
        &self,
    ) -> Result<BTreeMap<i32, TransitionPair>, ValidationError> {
        let multiplier = self.legend.get_multiplier();
        let mut out = BTreeMap::new();
        for (initial_ord, c_initial) in (1..).zip(self.legend.key()) {
            for (final_ord, c_final) in (1..).zip(self.legend.key()) {
                out.insert(
                    self.legend.pack_checked(initial_ord, final_ord, multiplier)?,
                    TransitionPair {
                        initial: c_initial.code(),
                        final_: c_final.code(),
                    },
                );
            }
        }
        Ok(out)
    }

    /// Transition codes keyed by initial class code, then final class code.
    pub fn get_transition_initial_final_key(
        &self,
    ) -> Result<BTreeMap<ClassCode, BTreeMap<ClassCode, i32>>, ValidationError> {
        let multiplier = self.legend.get_multiplier();
        let mut out: BTreeMap<ClassCode, BTreeMap<ClassCode, i32>> = BTreeMap::new();
        for (initial_ord, c_initial) in (1..).zip(self.legend.key()) {
            let row = out.entry(c_initial.code()).or_default();
            for (final_ord, c_final) in (1..).zip(self.legend.key()) {
                let code = self.legend.pack_checked(initial_ord, final_ord, multiplier)?;
                row.insert(c_final.code(), code);
            }
        }
        Ok(out)
    }

    /// Upsert `lcc` into the legend, then give every matrix an entry for each
    /// new ordered pair (the new class against every class, itself included).
    /// New entries get `meaning`, or `M::default()` when `None`. Existing
    /// entries keep their meaning and take the updated class metadata.
    pub fn add_update_class(&mut self, lcc: LandCoverClass, meaning: Option<M>) {
        let meaning = meaning.unwrap_or_default();
        self.legend.add_update_class(lcc.clone());
        for m in self.definitions.matrices_mut() {
            let added = m.fill_missing(&self.legend, &meaning);
            m.update_meaning_classes(&lcc);
            if added > 0 {
                tracing::debug!(
                    matrix = %m.name(),
                    code = lcc.code(),
                    added,
                    "expanded transition matrix"
                );
            }
        }
    }

    /// Remove `lcc` from the legend and every matching entry from every
    /// matrix. Returns `true` only if the legend held the class and every
    /// matrix had at least one entry for it; all removals are attempted
    /// either way.
    pub fn remove_class(&mut self, lcc: &LandCoverClass) -> bool {
        let mut status = self.legend.remove_class(lcc.code());
        for m in self.definitions.matrices_mut() {
            status &= m.remove_meanings_by_class(lcc);
        }
        status
    }
}

impl<M: TransitionMeaningKind> Translate for TransitionDefinition<M> {
    fn translate(&mut self, translations: &Translations) {
        for m in self.definitions.matrices_mut() {
            m.translate(translations);
        }
        self.legend.translate(translations);
    }
}

fn check_definitions<M: TransitionMeaningKind>(
    legend: &Legend,
    name: &str,
    definitions: &Definitions<M>,
) -> Result<(), ValidationError> {
    if matches!(definitions, Definitions::Named(map) if map.is_empty()) {
        return Err(ValidationError::NoDefinitions(name.to_string()));
    }
    for m in definitions.matrices() {
        m.check_complete(legend)?;
    }
    Ok(())
}
