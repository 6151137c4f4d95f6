//! # te-land-cover — Legends, Nesting, and Transition Matrices
//!
//! The classification core of the Trends.Earth schemas. A [`Legend`] is a
//! closed, code-unique set of [`LandCoverClass`]es; a [`LegendNesting`]
//! aggregates a detailed legend into a coarser one; a [`TransitionDefinition`]
//! assigns a meaning to every ordered pair of classes in a legend and derives
//! the integer remap tables consumed by the raster remapping engine.
//!
//! ## Key Design Principles
//!
//! 1. **Construction validates.** Duplicate codes, broken nesting partitions
//!    and incomplete matrices are rejected when the value is built or loaded.
//!    After in-place mutation, `Schema::validate()` re-runs the same checks.
//!
//! 2. **Codes are ordinals for packing.** Transition codes pack the 1-based
//!    positions of two classes in the code-sorted key, so they stay small and
//!    collision-free whatever the raw class codes are.
//!
//! 3. **Table order is a wire contract.** [`RemapTable`]s pair values by
//!    position; the loop order of each generator is fixed.
//!
//! 4. **Nodata policy is explicit.** Transition matrices never reference
//!    nodata. Whether nodata takes part in a nesting is a [`NestingOptions`]
//!    setting.
//!
//! ## Crate Policy
//!
//! - Depends only on `te-core` within the workspace.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod class;
pub mod deg;
pub mod legend;
pub mod nesting;
pub mod ramp;
pub mod remap;
pub mod transition;

// Re-export primary types for ergonomic imports.
pub use class::{ClassCode, LandCoverClass, NAME_LONG_MAX, NAME_SHORT_MAX};
pub use deg::{DegradationDefinition, DegradationMatrix, DegradationMeaning, DegradationTransition};
pub use legend::{multiplier_for, pack_ordinals, ClassAttr, Legend};
pub use nesting::{LegendNesting, NestingMap, NestingOptions};
pub use ramp::{RampItem, NO_CHANGE_COLOR};
pub use remap::RemapTable;
pub use transition::{
    Definitions, TransitionDefinition, TransitionMatrix, TransitionMeaning, TransitionMeaningKind,
    TransitionPair,
};
