//! # te-schemas CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use te_cli::recode::{run_recode_table, RecodeTableArgs};
use te_cli::remap::{run_nest, run_remap, NestArgs, RemapArgs};
use te_cli::validate::{run_validate, ValidateArgs};

/// Trends.Earth schema tools.
///
/// Validates land-cover legends, legend nestings, transition matrices and
/// error-recode layers, and emits the remap tables used on Earth Engine.
#[derive(Parser, Debug)]
#[command(name = "te-schemas", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a legend, nesting, transition definition or error-recode layer.
    Validate(ValidateArgs),

    /// Print the remap table of a transition definition.
    Remap(RemapArgs),

    /// Print the child-to-parent remap table of a legend nesting.
    Nest(NestArgs),

    /// Print the error-recode lookup tables.
    RecodeTable(RecodeTableArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("te-schemas v{} starting", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &mut stdout),
        Commands::Remap(args) => run_remap(&args, &mut stdout),
        Commands::Nest(args) => run_nest(&args, &mut stdout),
        Commands::RecodeTable(args) => run_recode_table(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use te_cli::validate::DocumentKind;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["te-schemas", "validate", "error-recode", "layer.geojson"])
            .unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.kind, DocumentKind::ErrorRecode);
            assert_eq!(args.path.to_str(), Some("layer.geojson"));
            assert!(!args.exclude_nodata);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["te-schemas", "validate", "raster", "x.json"]).is_err());
    }

    #[test]
    fn cli_parse_remap_with_key() {
        let cli =
            Cli::try_parse_from(["te-schemas", "remap", "def.json", "--key", "strict"]).unwrap();
        if let Commands::Remap(args) = cli.command {
            assert_eq!(args.key.as_deref(), Some("strict"));
            assert!(!args.persistence);
        } else {
            panic!("expected remap");
        }
    }

    #[test]
    fn cli_parse_nest_exclude_nodata() {
        let cli =
            Cli::try_parse_from(["te-schemas", "nest", "n.yaml", "--exclude-nodata"]).unwrap();
        assert!(matches!(cli.command, Commands::Nest(ref a) if a.exclude_nodata));
    }

    #[test]
    fn cli_parse_recode_table() {
        let cli = Cli::try_parse_from(["te-schemas", "recode-table", "--by-triple"]).unwrap();
        assert!(matches!(cli.command, Commands::RecodeTable(ref a) if a.by_triple));
    }

    #[test]
    fn cli_parse_verbose_is_global() {
        let cli = Cli::try_parse_from(["te-schemas", "recode-table", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["te-schemas"]).is_err());
    }
}
