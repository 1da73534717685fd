//! # Enum Definitions
//!
//! Enums are declared inside extended-form schema files and are visible to
//! every class declared in the same file. Each value has a canonical name
//! (what gets written back to disk), an optional display label for editors,
//! an optional legacy alias accepted when reading older documents, and a
//! numeric value used by the engine runtime.
//!
//! ## Matching Order
//!
//! On-disk text resolves to a value by trying, case-insensitively and in
//! this order: canonical name, legacy alias, display label. The first match
//! wins. A plain decimal literal equal to a declared numeric value is the
//! last resort.

use serde::Serialize;

use crate::error::EnumError;

/// Case-insensitive string equality (Unicode simple lowercase).
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// One declared enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// Canonical name, written back on save.
    pub name: String,
    /// Editor label. Defaults to `name`.
    pub display: String,
    /// Legacy spelling accepted on read. Empty when absent.
    pub alias: String,
    /// Underlying numeric value.
    pub value: u64,
}

impl EnumValue {
    /// A value whose display label is its canonical name and which has no alias.
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        let name = name.into();
        Self {
            display: name.clone(),
            name,
            alias: String::new(),
            value,
        }
    }

    /// Set the display label; an empty label keeps the canonical name.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        let display = display.into();
        if !display.is_empty() {
            self.display = display;
        }
        self
    }

    /// Set the legacy alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
}

/// A named, ordered list of enum values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDef {
    name: String,
    values: Vec<EnumValue>,
}

impl EnumDef {
    /// Build an enum, enforcing unique canonical names.
    ///
    /// # Errors
    ///
    /// Returns [`EnumError::DuplicateValue`] if two values share a
    /// canonical name (compared exactly).
    pub fn new(name: impl Into<String>, values: Vec<EnumValue>) -> Result<Self, EnumError> {
        let name = name.into();
        for (i, v) in values.iter().enumerate() {
            if values[..i].iter().any(|prev| prev.name == v.name) {
                return Err(EnumError::DuplicateValue {
                    enum_name: name,
                    value: v.name.clone(),
                });
            }
        }
        Ok(Self { name, values })
    }

    /// Enum name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// First declared value, used as the default.
    pub fn first(&self) -> Option<&EnumValue> {
        self.values.first()
    }

    /// True when the enum declares no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when `name` is a declared canonical name (exact match).
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|v| v.name == name)
    }

    /// Resolve on-disk text to a declared value.
    pub fn resolve(&self, raw: &str) -> Option<&EnumValue> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        self.values
            .iter()
            .find(|v| eq_ignore_case(&v.name, text))
            .or_else(|| {
                self.values
                    .iter()
                    .find(|v| !v.alias.is_empty() && eq_ignore_case(&v.alias, text))
            })
            .or_else(|| {
                self.values
                    .iter()
                    .find(|v| !v.display.is_empty() && eq_ignore_case(&v.display, text))
            })
            .or_else(|| {
                let n = text.parse::<u64>().ok()?;
                self.values.iter().find(|v| v.value == n)
            })
    }
}
