//! # Asset Class Schemas
//!
//! A [`Schema`] is one named class: an ordered list of typed fields plus the
//! enums visible to it. Field order is the canonical serialization and
//! synthesis order.
//!
//! A schema with a file suffix describes a root document type (`.mesh`,
//! `.camera`). A schema without one is a value type that only appears
//! nested inside other classes.

use indexmap::IndexMap;
use rsd_core::{EnumDef, TypeSpec};

/// Normalize a file suffix to lower case with exactly one leading dot.
///
/// Returns `None` for empty input (or a lone dot).
pub fn normalize_suffix(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// One asset class.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    class_name: String,
    file_suffix: Option<String>,
    fields: IndexMap<String, TypeSpec>,
    enums: IndexMap<String, EnumDef>,
}

impl Schema {
    /// An empty class. The suffix is normalized; an empty suffix means none.
    pub fn new(class_name: impl Into<String>, file_suffix: Option<&str>) -> Self {
        Self {
            class_name: class_name.into(),
            file_suffix: file_suffix.and_then(normalize_suffix),
            fields: IndexMap::new(),
            enums: IndexMap::new(),
        }
    }

    /// Append a field. Returns `false` (and changes nothing) if the name is
    /// already declared.
    pub fn add_field(&mut self, name: impl Into<String>, spec: TypeSpec) -> bool {
        let name = name.into();
        if self.fields.contains_key(&name) {
            return false;
        }
        self.fields.insert(name, spec);
        true
    }

    /// Builder form of [`Schema::add_field`]; a repeated name is ignored.
    pub fn with_field(mut self, name: impl Into<String>, spec: TypeSpec) -> Self {
        self.add_field(name, spec);
        self
    }

    /// Make an enum visible to this class, replacing one of the same name.
    pub fn add_enum(&mut self, def: EnumDef) {
        self.enums.insert(def.name().to_string(), def);
    }

    /// Builder form of [`Schema::add_enum`].
    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.add_enum(def);
        self
    }

    /// Class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Normalized file suffix (`.mesh`), if this is a root document class.
    pub fn file_suffix(&self) -> Option<&str> {
        self.file_suffix.as_deref()
    }

    /// True when documents of this class can exist as files.
    pub fn is_asset(&self) -> bool {
        self.file_suffix.is_some()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypeSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Type of one field.
    pub fn field(&self, name: &str) -> Option<&TypeSpec> {
        self.fields.get(name)
    }

    /// Enums visible to this class, in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.enums.values()
    }

    /// Enum by exact name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }
}
