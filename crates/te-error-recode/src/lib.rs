//! # te-error-recode — Error-Recode Polygons
//!
//! Analysts correct SDG 15.3.1 indicator rasters by drawing polygons and
//! stating, for each indicator state, what value pixels inside should take.
//! This crate models that GeoJSON layer ([`ErrorRecodePolygons`]) and the
//! fixed 64-entry lookup table ([`table`]) the raster engine uses to apply
//! it.
//!
//! ## Crate Policy
//!
//! - Depends only on `te-core` within the workspace.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod polygons;
pub mod table;

pub use polygons::{ErrorRecodeFeature, ErrorRecodePolygons, ErrorRecodeProperties, Period};
pub use table::{
    recode_to_trans_code_dict, trans_code, trans_code_lists, RecodeTriple, TransCodeLists,
    NO_RECODE, RECODE_DEG_TO_OPTIONS, RECODE_IMP_TO_OPTIONS, RECODE_STABLE_TO_OPTIONS,
};
