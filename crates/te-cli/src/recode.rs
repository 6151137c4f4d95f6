//! # Recode Table CLI — Print the error-recode lookup tables.
//!
//! ```bash
//! # Four parallel lists: codes, deg_to, stable_to, imp_to
//! te-schemas recode-table
//!
//! # One entry per option triple
//! te-schemas recode-table --by-triple
//! ```

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use te_error_recode::{recode_to_trans_code_dict, trans_code_lists};

use crate::document::write_json;

/// Recode-table subcommand arguments.
#[derive(Args, Debug)]
pub struct RecodeTableArgs {
    /// Print `{recode, code}` entries keyed by option triple instead of
    /// parallel lists.
    #[arg(long)]
    pub by_triple: bool,
}

#[derive(Serialize)]
struct TripleEntry {
    recode: [Option<i32>; 3],
    code: i32,
}

/// Execute the recode-table subcommand.
pub fn run_recode_table(args: &RecodeTableArgs, out: &mut dyn Write) -> Result<u8> {
    if args.by_triple {
        let mut entries: Vec<TripleEntry> = recode_to_trans_code_dict()
            .into_iter()
            .map(|((deg, stable, imp), code)| TripleEntry {
                recode: [deg, stable, imp],
                code,
            })
            .collect();
        entries.sort_by_key(|e| e.code);
        write_json(out, &entries)?;
    } else {
        write_json(out, &trans_code_lists())?;
    }
    Ok(0)
}
