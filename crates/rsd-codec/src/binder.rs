//! # Binder and Validator
//!
//! Turns the decoder's [`FieldRead`] report into a canonical value tree,
//! healing everything that does not fit the schema.
//!
//! ## Healing Rules
//!
//! - An absent field is replaced by its synthesized default.
//! - A mismatched field (wrong literal, wrong vector width, wrong static
//!   array length, unmatched enum text) is replaced by its default.
//! - A mismatched array item or map value is replaced by the default of the
//!   element type; the container itself is kept.
//! - An unsupported container kind with content becomes an empty
//!   container. An empty one is read as-is and heals nothing.
//! - Map entries without a key are dropped; a repeated key keeps its last
//!   value.
//!
//! Every heal produces exactly one warning and sets `was_altered`. The
//! one non-healing warning is an enum field whose enum declares no values:
//! it is reported, whether read empty or synthesized inside a default, but
//! on its own it leaves the document unchanged.
//!
//! Nested objects are never rejected as a whole; their fields are healed
//! one by one with the same rules.

use std::fmt;

use rsd_core::{CanonicalValue, FieldPath, TypeSpec, XmlElement};
use rsd_schema::{DefaultSynthesizer, Schema, SchemaRegistry};

use crate::decode::{Decoder, FieldRead};
use crate::error::BindError;

/// Result of binding or creating one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// The canonical value tree.
    pub document: CanonicalValue,
    /// True when at least one value was healed.
    pub was_altered: bool,
    /// One human-readable line per heal, in document order.
    pub warnings: Vec<String>,
}

/// One correction (or notice) recorded while binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heal {
    /// The field had no element on disk.
    Missing {
        /// Field path.
        path: FieldPath,
    },
    /// The on-disk literal does not fit the declared type.
    Mismatch {
        /// Field path.
        path: FieldPath,
        /// Declared type.
        expected: String,
        /// Offending literal.
        literal: String,
    },
    /// The container kind cannot be read.
    Unsupported {
        /// Field path.
        path: FieldPath,
        /// Why.
        reason: String,
    },
    /// Map entries without a key were dropped.
    UnkeyedEntries {
        /// Map field path.
        path: FieldPath,
        /// Entries dropped.
        count: usize,
    },
    /// A map key appeared more than once.
    DuplicateKey {
        /// Map field path.
        path: FieldPath,
        /// The repeated key.
        key: String,
    },
    /// An empty enum field whose enum declares no values.
    EmptyEnum {
        /// Field path.
        path: FieldPath,
        /// Enum name.
        enum_name: String,
    },
}

impl Heal {
    /// True when this heal changed the document relative to disk.
    pub fn alters(&self) -> bool {
        !matches!(self, Self::EmptyEnum { .. })
    }
}

impl fmt::Display for Heal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => {
                write!(f, "field missing: {path}, using default value (not yet saved)")
            }
            Self::Mismatch {
                path,
                expected,
                literal,
            } => write!(
                f,
                "field type mismatch: {path}, expected {expected}, got '{literal}', \
                 replaced with default value (not yet saved)"
            ),
            Self::Unsupported { path, reason } => {
                write!(f, "field unsupported: {path}, {reason}, using empty value (not yet saved)")
            }
            Self::UnkeyedEntries { path, count } => write!(
                f,
                "map entries without key: {path}, dropped {count} entries (not yet saved)"
            ),
            Self::DuplicateKey { path, key } => write!(
                f,
                "duplicate map key: {path}, key '{key}' appears more than once, keeping the last value (not yet saved)"
            ),
            Self::EmptyEnum { path, enum_name } => {
                write!(f, "enum has no values: {path}, enum '{enum_name}' declares no values, left empty")
            }
        }
    }
}

/// Binds element trees to schemas from one registry.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Binder<'r> {
    /// A binder resolving nested classes in `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Bind a root document to a file-backed schema.
    ///
    /// # Errors
    ///
    /// [`BindError::NotAnAssetSchema`] if `schema` has no file suffix.
    pub fn bind(&self, root: &XmlElement, schema: &Schema) -> Result<ValidationOutcome, BindError> {
        if !schema.is_asset() {
            return Err(BindError::NotAnAssetSchema {
                class_name: schema.class_name().to_string(),
            });
        }
        Ok(self.bind_object(root, schema))
    }

    /// Bind a root document to the schema owning `suffix`.
    ///
    /// # Errors
    ///
    /// [`BindError::NoSchemaForSuffix`] if no schema claims the suffix.
    pub fn bind_for_suffix(&self, root: &XmlElement, suffix: &str) -> Result<ValidationOutcome, BindError> {
        let schema = self
            .registry
            .try_get_by_suffix(suffix)
            .ok_or_else(|| BindError::NoSchemaForSuffix {
                path: String::new(),
                suffix: suffix.to_string(),
            })?;
        self.bind(root, schema)
    }

    /// Bind the children of `el` to any schema, file-backed or not.
    pub fn bind_object(&self, el: &XmlElement, schema: &Schema) -> ValidationOutcome {
        let read = Decoder::new(self.registry).decode_object(el, schema);
        let mut healer = Healer {
            synth: DefaultSynthesizer::new(self.registry),
            heals: Vec::new(),
        };
        let document = healer.resolve(read, None, schema, &FieldPath::root());

        let was_altered = healer.heals.iter().any(Heal::alters);
        if was_altered {
            tracing::debug!(
                class = schema.class_name(),
                heals = healer.heals.len(),
                "document healed"
            );
        }
        ValidationOutcome {
            document,
            was_altered,
            warnings: healer.heals.iter().map(ToString::to_string).collect(),
        }
    }
}

struct Healer<'r> {
    synth: DefaultSynthesizer<'r>,
    heals: Vec<Heal>,
}

impl Healer<'_> {
    fn record(&mut self, owner: &Schema, heal: Heal) {
        tracing::warn!(class = owner.class_name(), "{heal}");
        self.heals.push(heal);
    }

    /// Synthesize the replacement for a healed value, reporting every empty
    /// enum left inside it.
    fn default_for(&mut self, spec: Option<&TypeSpec>, owner: &Schema, path: &FieldPath) -> CanonicalValue {
        let (value, notes) = match spec {
            Some(spec) => self.synth.default_at(spec, owner, path),
            None => self.synth.synthesize(owner),
        };
        for note in notes {
            self.record(
                owner,
                Heal::EmptyEnum {
                    path: note.path,
                    enum_name: note.enum_name,
                },
            );
        }
        value
    }

    /// Resolve one read. `spec` is `None` only for the document root, which
    /// is always an object read.
    fn resolve(
        &mut self,
        read: FieldRead<'_>,
        spec: Option<&TypeSpec>,
        owner: &Schema,
        path: &FieldPath,
    ) -> CanonicalValue {
        let expected = || spec.map(ToString::to_string).unwrap_or_else(|| owner.class_name().to_string());

        match read {
            FieldRead::Value(value) => value,
            FieldRead::Absent => {
                self.record(owner, Heal::Missing { path: path.clone() });
                self.default_for(spec, owner, path)
            }
            FieldRead::Mismatch { literal } => {
                self.record(
                    owner,
                    Heal::Mismatch {
                        path: path.clone(),
                        expected: expected(),
                        literal,
                    },
                );
                self.default_for(spec, owner, path)
            }
            FieldRead::Unsupported { reason } => {
                self.record(
                    owner,
                    Heal::Unsupported {
                        path: path.clone(),
                        reason,
                    },
                );
                self.default_for(spec, owner, path)
            }
            FieldRead::EmptyEnum { enum_name } => {
                self.record(
                    owner,
                    Heal::EmptyEnum {
                        path: path.clone(),
                        enum_name: enum_name.to_string(),
                    },
                );
                CanonicalValue::Enum(String::new())
            }
            FieldRead::Object { schema, fields } => CanonicalValue::Object(
                fields
                    .into_iter()
                    .map(|(name, field_spec, field_read)| {
                        let value =
                            self.resolve(field_read, Some(field_spec), schema, &path.field(name));
                        (name.to_string(), value)
                    })
                    .collect(),
            ),
            FieldRead::Items { element, items } => CanonicalValue::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.resolve(item, Some(element), owner, &path.index(i)))
                    .collect(),
            ),
            FieldRead::Entries {
                value,
                entries,
                unkeyed,
                duplicates,
            } => {
                if unkeyed > 0 {
                    self.record(
                        owner,
                        Heal::UnkeyedEntries {
                            path: path.clone(),
                            count: unkeyed,
                        },
                    );
                }
                for key in duplicates {
                    self.record(
                        owner,
                        Heal::DuplicateKey {
                            path: path.clone(),
                            key,
                        },
                    );
                }
                CanonicalValue::Object(
                    entries
                        .into_iter()
                        .map(|(key, entry)| {
                            let v = self.resolve(entry, Some(value), owner, &path.key(key.as_str()));
                            (key, v)
                        })
                        .collect(),
                )
            }
        }
    }
}
