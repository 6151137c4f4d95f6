//! # te-cli — CLI Tool for the Trends.Earth Schemas
//!
//! Provides the `te-schemas` command-line interface over the land-cover and
//! error-recode schema crates. Every subcommand reads JSON, or YAML when the
//! file extension is `.yaml`/`.yml`, and writes compact JSON to stdout.
//!
//! ## Subcommands
//!
//! - `te-schemas validate` — Legend, nesting, transition and error-recode validation.
//! - `te-schemas remap` — Transition code to meaning (or persistence) remap table.
//! - `te-schemas nest` — Child code to parent code remap table.
//! - `te-schemas recode-table` — The error-recode lookup tables.
//!
//! ```bash
//! te-schemas validate transition matrices/unccd_deg.json
//! te-schemas remap matrices/unccd_deg.json --persistence
//! te-schemas nest nesting/esa_to_unccd.yaml -v
//! te-schemas recode-table --by-triple
//! ```
//!
//! Exit status is 0 on success, 1 on an invalid document or any error.

pub mod document;
pub mod recode;
pub mod remap;
pub mod validate;
