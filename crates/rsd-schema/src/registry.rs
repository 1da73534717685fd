//! # Schema Registry
//!
//! Owns every [`Schema`] loaded from one schema directory and indexes them
//! by normalized file suffix and by exact class name.
//!
//! ## Lifecycle
//!
//! The registry is built once and never mutated or re-read from disk.
//! Callers that need to pick up edited schema files construct a new one.
//! It is `Send + Sync` and is shared by reference for the whole session.
//!
//! ## Lookup Rules
//!
//! - Suffix lookup normalizes its argument (`"MESH"`, `".Mesh"` and
//!   `".mesh"` are the same key). When several classes declare one suffix,
//!   the first in load order (file name, then declaration order) wins.
//! - Class lookup is exact and case-sensitive. Class names are unique
//!   across the registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rsd_core::{eq_ignore_case, TypeSpec};

use crate::error::SchemaLoadError;
use crate::loader::parse_schema_file;
use crate::schema::{normalize_suffix, Schema};

/// Origin name used for schemas that were not read from a file.
const IN_MEMORY: &str = "<memory>";

/// Immutable set of loaded schemas with suffix and class-name indices.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Directory the schemas were read from, if any.
    source_dir: Option<PathBuf>,
    /// Schemas in load order.
    schemas: Vec<Schema>,
    /// Normalized suffix to index into `schemas`.
    by_suffix: HashMap<String, usize>,
    /// Class name to index into `schemas`.
    by_class: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Load every `*.rsd` file directly inside `dir`, in file-name order.
    ///
    /// # Errors
    ///
    /// - [`SchemaLoadError::DirectoryNotFound`] if `dir` is not a directory.
    /// - [`SchemaLoadError::NoSchemaFiles`] if it holds no `*.rsd` file.
    /// - Any error from an individual file, naming that file.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SchemaLoadError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let io_err = |path: &Path, source: std::io::Error| SchemaLoadError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
            let path = entry.map_err(|e| io_err(dir, e))?.path();
            let is_rsd = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| eq_ignore_case(e, "rsd"));
            if is_rsd && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(SchemaLoadError::NoSchemaFiles {
                path: dir.display().to_string(),
            });
        }

        let mut sources = Vec::with_capacity(files.len());
        for path in &files {
            let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            sources.push((name, content));
        }

        let mut registry = Self::from_sources(sources)?;
        registry.source_dir = Some(dir.to_path_buf());
        tracing::debug!(
            dir = %dir.display(),
            files = files.len(),
            classes = registry.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    /// Build a registry from in-memory schema file contents, given as
    /// `(file name, text)` pairs in load order.
    ///
    /// # Errors
    ///
    /// Any schema file error, or a class declared twice.
    pub fn from_sources<N, T>(sources: impl IntoIterator<Item = (N, T)>) -> Result<Self, SchemaLoadError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut loaded = Vec::new();
        for (name, text) in sources {
            let name = name.as_ref();
            for schema in parse_schema_file(text.as_ref(), name)? {
                loaded.push((name.to_string(), schema));
            }
        }
        Self::build(loaded)
    }

    /// Build a registry from already constructed schemas.
    ///
    /// # Errors
    ///
    /// [`SchemaLoadError::DuplicateClass`] if two schemas share a class name.
    pub fn from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Result<Self, SchemaLoadError> {
        Self::build(
            schemas
                .into_iter()
                .map(|s| (IN_MEMORY.to_string(), s))
                .collect(),
        )
    }

    fn build(loaded: Vec<(String, Schema)>) -> Result<Self, SchemaLoadError> {
        let mut registry = Self::default();
        let mut origins: Vec<String> = Vec::with_capacity(loaded.len());

        for (origin, schema) in loaded {
            let index = registry.schemas.len();
            if let Some(&first) = registry.by_class.get(schema.class_name()) {
                return Err(SchemaLoadError::DuplicateClass {
                    class_name: schema.class_name().to_string(),
                    first_file: origins[first].clone(),
                    second_file: origin,
                });
            }
            registry.by_class.insert(schema.class_name().to_string(), index);
            if let Some(suffix) = schema.file_suffix() {
                if registry.by_suffix.contains_key(suffix) {
                    tracing::debug!(
                        class = schema.class_name(),
                        suffix,
                        "suffix already claimed by an earlier class"
                    );
                } else {
                    registry.by_suffix.insert(suffix.to_string(), index);
                }
            }
            origins.push(origin);
            registry.schemas.push(schema);
        }
        Ok(registry)
    }

    /// Schema owning a file suffix. `ext` is normalized before lookup.
    pub fn try_get_by_suffix(&self, ext: &str) -> Option<&Schema> {
        let key = normalize_suffix(ext)?;
        self.by_suffix.get(&key).map(|&i| &self.schemas[i])
    }

    /// Schema for the file at `path`, chosen by its extension.
    pub fn try_get_for_path(&self, path: &Path) -> Option<&Schema> {
        let ext = path.extension()?.to_str()?;
        self.try_get_by_suffix(ext)
    }

    /// Schema by exact class name.
    pub fn try_get_by_class_name(&self, name: &str) -> Option<&Schema> {
        self.by_class.get(name).map(|&i| &self.schemas[i])
    }

    /// The class a nested-object field refers to, if it is declared.
    pub fn resolve_object(&self, spec: &TypeSpec) -> Option<&Schema> {
        match spec {
            TypeSpec::ObjectRef(class) => self.try_get_by_class_name(class),
            _ => None,
        }
    }

    /// All schemas in load order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    /// Number of loaded classes.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True when no class is loaded.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Directory the registry was loaded from.
    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }
}
