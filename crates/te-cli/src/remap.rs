//! # Remap CLI — Emit GEE remap tables.
//!
//! ```bash
//! # Transition code -> meaning code for a single-matrix definition:
//! te-schemas remap matrices/unccd_deg.json
//!
//! # Pick one of several named matrices:
//! te-schemas remap matrices/custom.json --key strict
//!
//! # Persistence table (diagonal compressed to class ordinals):
//! te-schemas remap matrices/unccd_deg.json --persistence
//!
//! # Child code -> parent code for a nesting:
//! te-schemas nest nesting/esa_to_unccd.json
//! ```
//!
//! Output is one line of JSON, `[[from...],[to...]]`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use te_core::Schema;
use te_land_cover::{DegradationDefinition, LegendNesting, NestingOptions};

use crate::document::{read_document, write_json};

/// Remap subcommand arguments.
#[derive(Args, Debug)]
pub struct RemapArgs {
    /// Path to a transition definition (JSON or YAML).
    pub path: PathBuf,

    /// Name of the matrix to use when the definition holds several.
    #[arg(long)]
    pub key: Option<String>,

    /// Emit the persistence table instead of the meaning table.
    #[arg(long)]
    pub persistence: bool,
}

/// Nest subcommand arguments.
#[derive(Args, Debug)]
pub struct NestArgs {
    /// Path to a legend nesting (JSON or YAML).
    pub path: PathBuf,

    /// Do not nest nodata classes.
    #[arg(long)]
    pub exclude_nodata: bool,
}

/// Execute the remap subcommand.
pub fn run_remap(args: &RemapArgs, out: &mut dyn Write) -> Result<u8> {
    let def = DegradationDefinition::load(read_document(&args.path)?)
        .with_context(|| format!("invalid transition definition: {}", args.path.display()))?;
    let table = if args.persistence {
        if args.key.is_some() {
            tracing::warn!("--key is ignored with --persistence");
        }
        def.get_persistence_list()?
    } else {
        def.get_list(args.key.as_deref())?
    };
    tracing::info!(name = def.name(), entries = table.len(), "built remap table");
    write_json(out, &table)?;
    Ok(0)
}

/// Execute the nest subcommand.
pub fn run_nest(args: &NestArgs, out: &mut dyn Write) -> Result<u8> {
    let options = NestingOptions {
        nodata_in_nesting: !args.exclude_nodata,
    };
    let nesting = LegendNesting::load_with_options(read_document(&args.path)?, options)
        .with_context(|| format!("invalid legend nesting: {}", args.path.display()))?;
    let table = nesting.get_list();
    tracing::info!(entries = table.len(), "built nesting table");
    write_json(out, &table)?;
    Ok(0)
}
