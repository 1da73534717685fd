//! # rsd CLI entry point
//!
//! Parses command-line arguments, sets up logging and configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rsd_cli::check::{run_check, CheckArgs};
use rsd_cli::dump::{run_dump, DumpArgs};
use rsd_cli::heal::{run_heal, HealArgs};
use rsd_cli::new::{run_new, NewArgs};
use rsd_cli::schemas::{run_schemas, SchemasArgs};
use rsd_cli::{RsdConfig, Settings, SCHEMA_DIR_NAME};

/// RSD asset toolkit
///
/// Loads `.rsd` schemas and checks, heals, creates, and inspects the asset
/// documents they describe.
#[derive(Parser, Debug)]
#[command(name = "rsd", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file. Defaults to `rsd.yaml` at the repository root.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schema directory. Overrides the configuration file.
    #[arg(long, global = true)]
    schemas: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bind asset documents and report every heal.
    Check(CheckArgs),

    /// Bind asset documents and save the healed result.
    Heal(HealArgs),

    /// Create a document with every field at its default.
    New(NewArgs),

    /// Print a document's canonical value.
    Dump(DumpArgs),

    /// List loaded schema classes.
    Schemas(SchemasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let repo_root = resolve_repo_root().unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let config = RsdConfig::discover(cli.config.as_deref(), &repo_root)?;
    let settings = Settings::resolve(&config, cli.schemas.as_deref(), &repo_root);

    match cli.command {
        Commands::Check(args) => run_check(&args, &settings),
        Commands::Heal(args) => run_heal(&args, &settings),
        Commands::New(args) => run_new(&args, &settings),
        Commands::Dump(args) => run_dump(&args, &settings),
        Commands::Schemas(args) => run_schemas(&args, &settings),
    }
}

/// Walk up from the current directory to the first directory holding an
/// `rsd/` schema directory.
fn resolve_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join(SCHEMA_DIR_NAME).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
