//! # Validate CLI — Check a document against its schema.
//!
//! ```bash
//! te-schemas validate legend legends/unccd.json
//! te-schemas validate nesting nesting/esa_to_unccd.yaml --exclude-nodata
//! te-schemas validate transition matrices/unccd_deg.json
//! te-schemas validate error-recode error_recode.geojson
//! ```
//!
//! Prints one `OK` or `INVALID` line. Exit code 1 on an invalid document.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::Value;

use te_core::{Schema, TeError};
use te_error_recode::ErrorRecodePolygons;
use te_land_cover::{DegradationDefinition, Legend, LegendNesting, NestingOptions};

use crate::document::read_document;

/// Kinds of document the validator understands.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// A land-cover legend.
    Legend,
    /// A parent/child legend nesting.
    Nesting,
    /// A degradation transition definition.
    Transition,
    /// A GeoJSON error-recode layer.
    ErrorRecode,
}

/// Validate subcommand arguments.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Kind of document to validate.
    #[arg(value_enum)]
    pub kind: DocumentKind,

    /// Path to a JSON or YAML document.
    pub path: PathBuf,

    /// Do not nest nodata classes (nesting documents only).
    #[arg(long)]
    pub exclude_nodata: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let value = read_document(&args.path)?;
    let options = NestingOptions {
        nodata_in_nesting: !args.exclude_nodata,
    };
    match summarize(args.kind, value, options) {
        Ok(summary) => {
            writeln!(out, "OK {}: {summary}", args.path.display())?;
            Ok(0)
        }
        Err(e) => {
            tracing::debug!(kind = ?args.kind, error = %e, "validation failed");
            writeln!(out, "INVALID {}: {e}", args.path.display())?;
            Ok(1)
        }
    }
}

fn summarize(kind: DocumentKind, value: Value, options: NestingOptions) -> Result<String, TeError> {
    Ok(match kind {
        DocumentKind::Legend => {
            let legend = Legend::load(value)?;
            let nodata = legend
                .nodata()
                .map(|c| format!(", nodata {}", c.code()))
                .unwrap_or_default();
            format!("legend \"{}\" with {} classes{nodata}", legend.name(), legend.len())
        }
        DocumentKind::Nesting => {
            let nesting = LegendNesting::load_with_options(value, options)?;
            format!(
                "nesting of \"{}\" ({} classes) in \"{}\" ({} classes)",
                nesting.child().name(),
                nesting.child().len(),
                nesting.parent().name(),
                nesting.parent().len()
            )
        }
        DocumentKind::Transition => {
            let def = DegradationDefinition::load(value)?;
            let matrices = def.definitions().matrices().count();
            format!(
                "transition definition \"{}\" with {matrices} matrix(es) over {} classes",
                def.name(),
                def.legend().len()
            )
        }
        DocumentKind::ErrorRecode => {
            let polygons = ErrorRecodePolygons::load(value)?;
            format!("error-recode layer with {} features", polygons.features.len())
        }
    })
}
