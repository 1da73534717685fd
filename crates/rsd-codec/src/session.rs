//! # Edit Session
//!
//! One open document: the bound value tree, the schema it belongs to, the
//! warnings from loading it, and a dirty flag. Edits go through
//! [`EditSession::apply`], which checks the new value against the schema
//! type at the target path before replacing it, so a session can always be
//! saved and re-bound without healing.
//!
//! A session is owned by exactly one caller; it holds the registry by
//! shared reference only.

use std::path::Path;

use rsd_core::{CanonicalValue, FieldPath, PathSegment, TypeSpec};
use rsd_schema::{Schema, SchemaRegistry};

use crate::asset::{load_asset, new_asset, save_asset};
use crate::binder::ValidationOutcome;
use crate::compat;
use crate::error::EditError;

/// An open, editable asset document.
#[derive(Debug, Clone)]
pub struct EditSession<'r> {
    registry: &'r SchemaRegistry,
    schema: &'r Schema,
    document: CanonicalValue,
    warnings: Vec<String>,
    dirty: bool,
}

impl<'r> EditSession<'r> {
    /// Wrap a bind outcome. A healed document starts dirty.
    pub fn from_outcome(registry: &'r SchemaRegistry, schema: &'r Schema, outcome: ValidationOutcome) -> Self {
        Self {
            registry,
            schema,
            dirty: outcome.was_altered,
            document: outcome.document,
            warnings: outcome.warnings,
        }
    }

    /// Open the asset file at `path`.
    ///
    /// # Errors
    ///
    /// Any [`load_asset`] failure.
    pub fn open(path: &Path, registry: &'r SchemaRegistry) -> Result<Self, EditError> {
        let loaded = load_asset(path, registry)?;
        Ok(Self::from_outcome(registry, loaded.schema, loaded.outcome))
    }

    /// Start a new document of `schema`. It is dirty until saved.
    pub fn create(schema: &'r Schema, registry: &'r SchemaRegistry) -> Self {
        let mut session = Self::from_outcome(registry, schema, new_asset(schema, registry));
        session.dirty = true;
        session
    }

    /// The document's schema.
    pub fn schema(&self) -> &'r Schema {
        self.schema
    }

    /// The current value tree.
    pub fn document(&self) -> &CanonicalValue {
        &self.document
    }

    /// Warnings from loading or creating the document.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True when the document differs from what is on disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Declared type (and the class declaring it) of the node at `path`.
    ///
    /// # Errors
    ///
    /// [`EditError::UnknownField`] or [`EditError::PathType`] when the path
    /// does not follow the schema.
    pub fn type_at(&self, path: &FieldPath) -> Result<(&'r TypeSpec, &'r Schema), EditError> {
        let mut owner = self.schema;
        let mut current: Option<&'r TypeSpec> = None;

        for seg in path.segments() {
            let next = match (current, seg) {
                (None, PathSegment::Field(name)) => Some(self.field_of(owner, name, path)?),
                (Some(TypeSpec::ObjectRef(class)), PathSegment::Field(name)) => {
                    match self.registry.try_get_by_class_name(class) {
                        Some(nested) => {
                            owner = nested;
                            Some(self.field_of(owner, name, path)?)
                        }
                        None => None,
                    }
                }
                (
                    Some(TypeSpec::DynamicArray(element) | TypeSpec::StaticArray(element, _)),
                    PathSegment::Index(_),
                ) => Some(&**element),
                (Some(TypeSpec::Map(_, value)), PathSegment::Key(_)) => Some(&**value),
                _ => None,
            };
            current = Some(next.ok_or_else(|| EditError::PathType {
                path: path.to_string(),
                segment: seg.to_string(),
                spec: current.map_or_else(|| owner.class_name().to_string(), ToString::to_string),
            })?);
        }

        match current {
            Some(spec) => Ok((spec, owner)),
            None => Err(EditError::PathType {
                path: path.to_string(),
                segment: String::new(),
                spec: owner.class_name().to_string(),
            }),
        }
    }

    fn field_of(&self, owner: &'r Schema, name: &str, path: &FieldPath) -> Result<&'r TypeSpec, EditError> {
        owner.field(name).ok_or_else(|| EditError::UnknownField {
            path: path.to_string(),
            class_name: owner.class_name().to_string(),
            field: name.to_string(),
        })
    }

    /// Replace the node at `path` with `value`.
    ///
    /// The root path replaces the whole document. Map keys may be added
    /// and arrays extended by one at their end.
    ///
    /// # Errors
    ///
    /// The path does not follow the schema or the document, or the value
    /// does not fit the declared type. On error the document is unchanged.
    pub fn apply(&mut self, path: &FieldPath, value: CanonicalValue) -> Result<(), EditError> {
        if path.is_root() {
            compat::check_document(self.registry, &value, self.schema)?;
            self.document = value;
            self.dirty = true;
            return Ok(());
        }

        let (spec, owner) = self.type_at(path)?;
        compat::check(self.registry, &value, spec, owner, path)?;
        let updated = self.document.apply(path, value)?;

        // Appending to a fixed-size array can break its count.
        if let Some(PathSegment::Field(top)) = path.segments().first() {
            let top_path = FieldPath::root().field(top.as_str());
            if let (Some(top_spec), Some(top_value)) = (self.schema.field(top), updated.lookup(&top_path)) {
                compat::check(self.registry, top_value, top_spec, self.schema, &top_path)?;
            }
        }

        tracing::debug!(class = self.schema.class_name(), path = %path, "applied edit");
        self.document = updated;
        self.dirty = true;
        Ok(())
    }

    /// Write the document to `path` and clear the dirty flag.
    ///
    /// # Errors
    ///
    /// Any [`save_asset`] failure; the session stays dirty.
    pub fn save(&mut self, path: &Path) -> Result<(), EditError> {
        save_asset(path, &self.document, self.schema, self.registry)?;
        self.dirty = false;
        Ok(())
    }

    /// Give up the session and keep the value tree.
    pub fn into_document(self) -> CanonicalValue {
        self.document
    }
}
