//! # rsd-cli — Command-Line Shell for the RSD Toolkit
//!
//! Provides the `rsd` command, a thin layer over `rsd-schema` and
//! `rsd-codec` for working on a content repository from a terminal or CI.
//!
//! ## Subcommands
//!
//! - `rsd check`: bind documents and report every heal.
//! - `rsd heal`: bind documents and save the healed result.
//! - `rsd new`: create a default document for a file extension.
//! - `rsd dump`: print a document's canonical value as JSON or YAML.
//! - `rsd schemas`: list the loaded classes, or one class's fields.
//!
//! ```bash
//! rsd check content/
//! rsd heal content/props/crate.mesh
//! rsd --schemas tools/rsd new content/cameras/main.camera
//! rsd dump --format yaml content/props/crate.mesh
//! ```
//!
//! ## Exit Codes
//!
//! `0` clean, `1` failure, `2` at least one document was healed but not
//! saved.

pub mod check;
pub mod config;
pub mod dump;
pub mod heal;
pub mod new;
pub mod schemas;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use rsd_schema::SchemaRegistry;

pub use config::{RsdConfig, Settings};

/// Name of the schema directory that marks a repository root.
pub const SCHEMA_DIR_NAME: &str = "rsd";

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `repo_root` resolves there; otherwise it stays relative to the current
/// directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Expand `paths` into a sorted list of asset files.
///
/// Files are taken as given. Directories are searched recursively for
/// files whose extension some schema claims. No paths means the content
/// root.
pub fn asset_files(paths: &[PathBuf], settings: &Settings, registry: &SchemaRegistry) -> Result<Vec<PathBuf>> {
    let roots = if paths.is_empty() {
        vec![settings.content_root.clone()]
    } else {
        paths
            .iter()
            .map(|p| resolve_path(p, &settings.repo_root))
            .collect()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
        } else if root.is_dir() {
            collect_dir(&root, registry, &mut files)?;
        } else {
            bail!("no such file or directory: {}", root.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_dir(dir: &Path, registry: &SchemaRegistry, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("reading directory: {}", dir.display()))?
            .path();
        if path.is_dir() {
            collect_dir(&path, registry, out)?;
        } else if registry.try_get_for_path(&path).is_some() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_sources(vec![(
            "cam.rsd",
            r#"<rsd class_name="Camera" file_suffix=".camera"><field name="fov" type="Float"/></rsd>"#,
        )])
        .unwrap()
    }

    fn settings(root: &Path) -> Settings {
        Settings::resolve(&RsdConfig::default(), None, root)
    }

    #[test]
    fn test_resolve_path_absolute() {
        let result = resolve_path(Path::new("/abs/file.camera"), Path::new("/repo"));
        assert_eq!(result, PathBuf::from("/abs/file.camera"));
    }

    #[test]
    fn test_resolve_path_prefers_repo_relative() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.camera"), "<asset/>").unwrap();
        assert_eq!(resolve_path(Path::new("a.camera"), tmp.path()), tmp.path().join("a.camera"));
        assert_eq!(resolve_path(Path::new("b.camera"), tmp.path()), PathBuf::from("b.camera"));
    }

    #[test]
    fn test_asset_files_walks_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("cams").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b.camera"), "").unwrap();
        std::fs::write(tmp.path().join("cams").join("a.CAMERA"), "").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "").unwrap();

        let files = asset_files(&[], &settings(tmp.path()), &registry()).unwrap();
        assert_eq!(
            files,
            vec![
                tmp.path().join("cams").join("a.CAMERA"),
                nested.join("b.camera"),
            ]
        );
    }

    #[test]
    fn test_asset_files_keeps_explicit_files() {
        let tmp = tempfile::tempdir().unwrap();
        let odd = tmp.path().join("notes.txt");
        std::fs::write(&odd, "").unwrap();
        let files = asset_files(&[odd.clone()], &settings(tmp.path()), &registry()).unwrap();
        assert_eq!(files, vec![odd]);
    }

    #[test]
    fn test_asset_files_missing_path() {
        let tmp = tempfile::tempdir().unwrap();
        let err = asset_files(&[tmp.path().join("gone")], &settings(tmp.path()), &registry())
            .unwrap_err();
        assert!(err.to_string().contains("gone"));
    }
}
