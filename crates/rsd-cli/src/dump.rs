//! # Dump CLI — Print a document's canonical value.
//!
//! ```bash
//! rsd dump content/props/crate.mesh
//! rsd dump --format yaml content/props/crate.mesh
//! ```
//!
//! The document is bound (and healed in memory) first; nothing is written.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use rsd_codec::load_asset;
use rsd_core::CanonicalValue;

use crate::{resolve_path, Settings};

/// Output encodings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    #[default]
    Json,
    Yaml,
}

/// Dump subcommand arguments.
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Asset file to print.
    pub path: PathBuf,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = DumpFormat::Json)]
    pub format: DumpFormat,
}

/// What `rsd dump` prints.
#[derive(Debug, Serialize)]
pub struct DumpReport<'a> {
    pub class: &'a str,
    pub was_altered: bool,
    pub warnings: &'a [String],
    pub document: &'a CanonicalValue,
}

/// Execute the dump subcommand.
pub fn run_dump(args: &DumpArgs, settings: &Settings) -> Result<u8> {
    let registry = settings.load_registry()?;
    let path = resolve_path(&args.path, &settings.repo_root);
    let loaded = load_asset(&path, &registry)?;
    let report = DumpReport {
        class: loaded.schema.class_name(),
        was_altered: loaded.outcome.was_altered,
        warnings: &loaded.outcome.warnings,
        document: &loaded.outcome.document,
    };
    println!("{}", render(&report, args.format)?);
    Ok(0)
}

/// Serialize a report in `format`.
pub fn render(report: &DumpReport<'_>, format: DumpFormat) -> Result<String> {
    match format {
        DumpFormat::Json => serde_json::to_string_pretty(report).context("encoding JSON"),
        DumpFormat::Yaml => serde_yaml::to_string(report).context("encoding YAML"),
    }
}
