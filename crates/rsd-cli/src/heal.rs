//! # Heal CLI — Bind documents and save the healed result.
//!
//! ```bash
//! rsd heal content/props
//! rsd heal content/props/crate.mesh --dry-run
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::check::check_files;
use crate::{asset_files, Settings};

/// Heal subcommand arguments.
#[derive(Args, Debug)]
pub struct HealArgs {
    /// Asset files or directories. Defaults to the content root.
    pub paths: Vec<PathBuf>,

    /// Report what would be healed without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print only the summary line.
    #[arg(long, short)]
    pub quiet: bool,
}

/// Execute the heal subcommand.
pub fn run_heal(args: &HealArgs, settings: &Settings) -> Result<u8> {
    let registry = settings.load_registry()?;
    let files = asset_files(&args.paths, settings, &registry)?;
    let summary = check_files(&files, &registry, !args.dry_run, args.quiet)?;
    Ok(summary.exit_code())
}
