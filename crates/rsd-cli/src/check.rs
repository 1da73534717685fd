//! # Check CLI — Bind documents and report heals.
//!
//! ```bash
//! # Check everything under the content root:
//! rsd check
//!
//! # Check one directory, printing only the summary:
//! rsd check content/props --quiet
//! ```
//!
//! With `write_healed: true` in the config, healed documents are saved as
//! they are found.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use rsd_codec::{load_asset, save_asset};
use rsd_schema::SchemaRegistry;

use crate::{asset_files, Settings};

/// Check subcommand arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Asset files or directories. Defaults to the content root.
    pub paths: Vec<PathBuf>,

    /// Print only the summary line.
    #[arg(long, short)]
    pub quiet: bool,
}

/// Per-run document counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Bound without changes.
    pub clean: usize,
    /// Healed and left unsaved.
    pub healed: usize,
    /// Healed and saved.
    pub saved: usize,
    /// Could not be loaded or saved.
    pub failed: usize,
}

impl Summary {
    /// `1` on any failure, `2` if anything healed is unsaved, else `0`.
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 {
            1
        } else if self.healed > 0 {
            2
        } else {
            0
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} checked: {} clean, {} healed, {} saved, {} failed",
            self.clean + self.healed + self.saved + self.failed,
            self.clean,
            self.healed,
            self.saved,
            self.failed
        )
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, settings: &Settings) -> Result<u8> {
    let registry = settings.load_registry()?;
    let files = asset_files(&args.paths, settings, &registry)?;
    let summary = check_files(&files, &registry, settings.write_healed, args.quiet)?;
    Ok(summary.exit_code())
}

/// Bind every file, printing one line per file (unless `quiet`) and the
/// summary. When `write` is set, healed documents are saved.
pub(crate) fn check_files(
    files: &[PathBuf],
    registry: &SchemaRegistry,
    write: bool,
    quiet: bool,
) -> Result<Summary> {
    let mut summary = Summary::default();
    if files.is_empty() {
        println!("No asset files found.");
        return Ok(summary);
    }

    for file in files {
        let loaded = match load_asset(file, registry) {
            Ok(loaded) => loaded,
            Err(e) => {
                summary.failed += 1;
                println!("  FAIL    {}: {e}", file.display());
                continue;
            }
        };
        let outcome = &loaded.outcome;

        if !outcome.was_altered {
            summary.clean += 1;
            if !quiet {
                println!("  OK      {}", file.display());
                print_warnings(&outcome.warnings);
            }
            continue;
        }

        if !quiet {
            println!(
                "  HEALED  {} ({} warnings)",
                file.display(),
                outcome.warnings.len()
            );
            print_warnings(&outcome.warnings);
        }
        if !write {
            summary.healed += 1;
            continue;
        }
        match save(file, &loaded, registry) {
            Ok(()) => {
                summary.saved += 1;
                if !quiet {
                    println!("          saved");
                }
            }
            Err(e) => {
                summary.failed += 1;
                println!("  FAIL    {}: {e:#}", file.display());
            }
        }
    }

    if !quiet {
        println!();
    }
    println!("{summary}");
    Ok(summary)
}

fn save(file: &Path, loaded: &rsd_codec::LoadedAsset<'_>, registry: &SchemaRegistry) -> Result<()> {
    save_asset(file, &loaded.outcome.document, loaded.schema, registry)
        .with_context(|| format!("saving {}", file.display()))
}

fn print_warnings(warnings: &[String]) {
    for w in warnings {
        println!("          {w}");
    }
}
