//! # New CLI — Create a default document.
//!
//! The output path's extension selects the schema:
//!
//! ```bash
//! rsd new content/cameras/main.camera
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;

use rsd_codec::{new_asset, save_asset};

use crate::Settings;

/// New subcommand arguments.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Path of the document to create.
    pub output: PathBuf,

    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

/// Execute the new subcommand.
pub fn run_new(args: &NewArgs, settings: &Settings) -> Result<u8> {
    let registry = settings.load_registry()?;
    let output = &args.output;
    let schema = registry.try_get_for_path(output).ok_or_else(|| {
        anyhow!(
            "no schema claims the extension of {} (see `rsd schemas`)",
            output.display()
        )
    })?;
    if output.exists() && !args.force {
        bail!("{} already exists; pass --force to replace it", output.display());
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory: {}", parent.display()))?;
    }

    let outcome = new_asset(schema, &registry);
    for w in &outcome.warnings {
        println!("  note: {w}");
    }
    save_asset(output, &outcome.document, schema, &registry)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Created {} ({})", output.display(), schema.class_name());
    Ok(0)
}
