//! # CLI Configuration
//!
//! An optional `rsd.yaml` at the repository root (or any file passed with
//! `--config`) sets where schemas and content live:
//!
//! ```yaml
//! schema_dir: tools/rsd
//! content_root: content
//! write_healed: true
//! ```
//!
//! Relative paths are taken from the repository root. Command-line flags
//! override the file; the file overrides the discovered defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use rsd_schema::SchemaRegistry;

use crate::SCHEMA_DIR_NAME;

/// Contents of a configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsdConfig {
    /// Directory holding the `*.rsd` schema files.
    pub schema_dir: Option<PathBuf>,
    /// Directory searched for asset documents when no path is given.
    pub content_root: Option<PathBuf>,
    /// Save healed documents during `rsd check`.
    pub write_healed: bool,
}

impl RsdConfig {
    /// File name looked up at the repository root.
    pub const FILE_NAME: &'static str = "rsd.yaml";

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).with_context(|| format!("parsing config: {}", path.display()))
    }

    /// Load `explicit` if given (it must exist), else `rsd.yaml` at
    /// `repo_root` if present, else the defaults.
    pub fn discover(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = repo_root.join(Self::FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using repository config");
            return Self::from_file(&candidate);
        }
        Ok(Self::default())
    }
}

/// Effective settings after merging flags, config, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Discovered repository root.
    pub repo_root: PathBuf,
    /// Schema directory.
    pub schema_dir: PathBuf,
    /// Default search root for asset documents.
    pub content_root: PathBuf,
    /// Save healed documents during `rsd check`.
    pub write_healed: bool,
}

impl Settings {
    /// Merge `--schemas` (highest), `config`, and the repository defaults.
    pub fn resolve(config: &RsdConfig, schemas_flag: Option<&Path>, repo_root: &Path) -> Self {
        let from_root = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                repo_root.join(p)
            }
        };
        let schema_dir = match (schemas_flag, &config.schema_dir) {
            (Some(flag), _) => crate::resolve_path(flag, repo_root),
            (None, Some(dir)) => from_root(dir),
            (None, None) => repo_root.join(SCHEMA_DIR_NAME),
        };
        let content_root = config
            .content_root
            .as_deref()
            .map_or_else(|| repo_root.to_path_buf(), from_root);

        Self {
            repo_root: repo_root.to_path_buf(),
            schema_dir,
            content_root,
            write_healed: config.write_healed,
        }
    }

    /// Load every schema in the schema directory.
    pub fn load_registry(&self) -> Result<SchemaRegistry> {
        let registry = SchemaRegistry::load_from_dir(&self.schema_dir)
            .with_context(|| format!("loading schemas from {}", self.schema_dir.display()))?;
        tracing::info!(
            dir = %self.schema_dir.display(),
            schemas = registry.len(),
            "schema registry ready"
        );
        Ok(registry)
    }
}
