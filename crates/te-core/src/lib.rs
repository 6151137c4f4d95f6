//! # te-core — Foundational Types for the Trends.Earth Schemas
//!
//! This crate is the leaf of the workspace DAG. It defines the pieces every
//! schema crate shares: the error taxonomy, the length/colour validators used
//! by land-cover classes, the display-localization hook, and the [`Schema`]
//! trait that gives every document type the same dump/load/validate surface.
//!
//! ## Key Design Principles
//!
//! 1. **Validation is eager.** Every document type routes deserialization
//!    through its validating constructor (see [`impl_validating_deserialize`]),
//!    so a partially-invalid object never escapes construction.
//!
//! 2. **Lookups return `Option`.** A lookup miss is not an error. The raising
//!    `*_or_fail` forms are thin wrappers that map `None` to [`LookupError`].
//!
//! 3. **Caller bugs are distinct from bad data.** [`ContractError`] is reserved
//!    for programming-contract violations such as asking for the GEE table of a
//!    multi-matrix definition without naming the matrix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `te-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod schema;
pub mod text;
pub mod translate;

pub use error::{ContractError, LookupError, TeError, ValidationError};
pub use schema::Schema;
pub use text::{validate_color, validate_max_len};
pub use translate::{translate_opt, Translate, Translations};
