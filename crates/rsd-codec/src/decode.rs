//! # Document Decoder
//!
//! Reads an XML element tree field by field against a schema and reports,
//! for every field, what was found on disk as a [`FieldRead`]. The decoder
//! never heals and never fails: absent elements, unparseable literals and
//! unsupported container kinds are all described, and the
//! [`Binder`](crate::Binder) decides what to do with them.
//!
//! ## Dialects
//!
//! Two on-disk dialects are read transparently:
//!
//! - Vector components come from `x y z w` attributes, falling back to
//!   same-named child elements. The attribute wins when both exist.
//! - Array items that hold text accept a `file` attribute, then a `value`
//!   attribute, then inline text. Numeric items accept `value`, then text.
//!
//! Fields may appear on disk in any order; extra elements are ignored.

use indexmap::IndexMap;
use rsd_core::{
    eq_ignore_case, CanonicalValue, ScalarKind, TypeSpec, VectorWidth, XmlElement,
};
use rsd_schema::{Schema, SchemaRegistry};

use crate::format::{unsupported_element, MapShape};

/// What the decoder found for one field, array item, or map value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRead<'a> {
    /// No element for this field.
    Absent,
    /// A well-formed value.
    Value(CanonicalValue),
    /// The element exists but its content does not fit the type.
    Mismatch {
        /// The offending on-disk literal.
        literal: String,
    },
    /// An empty enum field whose enum declares no values.
    EmptyEnum {
        /// The enum name.
        enum_name: &'a str,
    },
    /// A container kind that cannot be read.
    Unsupported {
        /// Why it cannot be read.
        reason: String,
    },
    /// A nested object, one entry per schema field in declaration order.
    Object {
        /// The nested class.
        schema: &'a Schema,
        /// `(field name, field type, read)` per declared field.
        fields: Vec<(&'a str, &'a TypeSpec, FieldRead<'a>)>,
    },
    /// Array items in document order.
    Items {
        /// Element type.
        element: &'a TypeSpec,
        /// One read per item.
        items: Vec<FieldRead<'a>>,
    },
    /// Map entries keyed by entry name.
    Entries {
        /// Value type.
        value: &'a TypeSpec,
        /// One read per key; a repeated key keeps its last read.
        entries: IndexMap<String, FieldRead<'a>>,
        /// Entries dropped for lack of a key.
        unkeyed: usize,
        /// Keys that appeared more than once.
        duplicates: Vec<String>,
    },
}

/// Decodes element trees against schemas from one registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Decoder<'r> {
    /// A decoder resolving nested classes in `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Read every field of `schema` from the children of `el`.
    ///
    /// The name of `el` itself is not checked.
    pub fn decode_object<'a>(&self, el: &XmlElement, schema: &'a Schema) -> FieldRead<'a>
    where
        'r: 'a,
    {
        let fields = schema
            .fields()
            .map(|(name, spec)| {
                tracing::trace!(class = schema.class_name(), field = name, "decode field");
                let read = match el.child(name) {
                    Some(child) => self.decode_value(child, spec, schema, false),
                    None => FieldRead::Absent,
                };
                (name, spec, read)
            })
            .collect();
        FieldRead::Object { schema, fields }
    }

    fn decode_value<'a>(
        &self,
        el: &XmlElement,
        spec: &'a TypeSpec,
        owner: &'a Schema,
        item: bool,
    ) -> FieldRead<'a>
    where
        'r: 'a,
    {
        match spec {
            TypeSpec::Scalar(kind) => {
                let text = scalar_text(el, spec, item);
                match parse_scalar(*kind, text) {
                    Some(value) => FieldRead::Value(value),
                    None => FieldRead::Mismatch {
                        literal: text.to_string(),
                    },
                }
            }
            TypeSpec::AssetReference(_) | TypeSpec::RawReference => {
                FieldRead::Value(CanonicalValue::String(scalar_text(el, spec, item).to_string()))
            }
            TypeSpec::Vector(width) => match read_vector(el, *width) {
                Ok(value) => FieldRead::Value(value),
                Err(literal) => FieldRead::Mismatch { literal },
            },
            TypeSpec::Enum(name) => decode_enum(scalar_text(el, spec, item), name, owner),
            TypeSpec::DynamicArray(element) => self.decode_items(el, element, owner),
            TypeSpec::StaticArray(element, count) => {
                let read = self.decode_items(el, element, owner);
                if let FieldRead::Items { items, .. } = &read {
                    // An empty container is the synthesized default and stays valid.
                    if !items.is_empty() && items.len() != *count {
                        return FieldRead::Mismatch {
                            literal: format!("{} items", items.len()),
                        };
                    }
                }
                read
            }
            TypeSpec::Map(key, value) => decode_map(el, key, value),
            TypeSpec::ObjectRef(class) => match self.registry.try_get_by_class_name(class) {
                Some(nested) => self.decode_object(el, nested),
                None => FieldRead::Value(CanonicalValue::String(el.text.clone())),
            },
        }
    }

    fn decode_items<'a>(&self, el: &XmlElement, element: &'a TypeSpec, owner: &'a Schema) -> FieldRead<'a>
    where
        'r: 'a,
    {
        if let Some(reason) = unsupported_element(element, self.registry) {
            if el.children.is_empty() {
                return FieldRead::Value(CanonicalValue::Array(Vec::new()));
            }
            return FieldRead::Unsupported { reason };
        }

        let items = el
            .children
            .iter()
            .map(|child| self.decode_value(child, element, owner, true))
            .collect();
        FieldRead::Items { element, items }
    }
}

/// Text of a scalar element, honouring the item attribute dialect.
fn scalar_text<'e>(el: &'e XmlElement, spec: &TypeSpec, item: bool) -> &'e str {
    if item {
        let attrs: &[&str] = if spec.is_string_like() {
            &["file", "value"]
        } else {
            &["value"]
        };
        if let Some(v) = attrs.iter().find_map(|a| el.attribute(a)) {
            return v;
        }
    }
    &el.text
}

/// Parse scalar text. Strings are kept verbatim; everything else is trimmed.
pub fn parse_scalar(kind: ScalarKind, text: &str) -> Option<CanonicalValue> {
    let t = text.trim();
    match kind {
        ScalarKind::String => Some(CanonicalValue::String(text.to_string())),
        ScalarKind::Bool => {
            if eq_ignore_case(t, "true") || t == "1" {
                Some(CanonicalValue::Bool(true))
            } else if eq_ignore_case(t, "false") || t == "0" {
                Some(CanonicalValue::Bool(false))
            } else {
                None
            }
        }
        ScalarKind::Int => t.parse::<i64>().ok().map(CanonicalValue::Int),
        ScalarKind::UInt => t.parse::<u64>().ok().map(CanonicalValue::UInt),
        ScalarKind::Float => parse_float(t).map(CanonicalValue::Float),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

fn decode_enum<'a>(raw: &str, name: &'a str, owner: &Schema) -> FieldRead<'a> {
    let text = raw.trim();
    match owner.enum_def(name).filter(|def| !def.is_empty()) {
        Some(def) => match def.resolve(text) {
            Some(value) => FieldRead::Value(CanonicalValue::Enum(value.name.clone())),
            None => FieldRead::Mismatch {
                literal: text.to_string(),
            },
        },
        None if text.is_empty() => FieldRead::EmptyEnum { enum_name: name },
        None => FieldRead::Mismatch {
            literal: text.to_string(),
        },
    }
}

/// Read a vector from attributes, falling back to child elements.
///
/// On failure returns a rendering of what was found, for the warning.
fn read_vector(el: &XmlElement, width: VectorWidth) -> Result<CanonicalValue, String> {
    let component = |name: &str| -> Option<f64> {
        let text = el
            .attribute(name)
            .or_else(|| el.child(name).map(|c| c.text.as_str()))?;
        parse_float(text)
    };

    let has_extra = width == VectorWidth::Three
        && (el.attribute("w").is_some() || el.child("w").is_some());
    let values: Option<Vec<f64>> = width.components().iter().map(|c| component(*c)).collect();

    match (values.as_deref(), has_extra) {
        (Some(&[x, y, z]), false) => Ok(CanonicalValue::Vector3(x, y, z)),
        (Some(&[x, y, z, w]), false) => Ok(CanonicalValue::Vector4(x, y, z, w)),
        _ => Err(literal_of(el)),
    }
}

/// Human-readable rendering of an element's content, without its key.
fn literal_of(el: &XmlElement) -> String {
    let mut parts: Vec<String> = el
        .attributes
        .iter()
        .filter(|(k, _)| k != "key" && k != "name")
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    parts.extend(
        el.children
            .iter()
            .map(|c| format!("{}={}", c.name, c.text.trim())),
    );
    if parts.is_empty() {
        el.text.trim().to_string()
    } else {
        parts.join(" ")
    }
}

fn decode_map<'a>(el: &XmlElement, key: &'a TypeSpec, value: &'a TypeSpec) -> FieldRead<'a> {
    let Some(shape) = MapShape::for_map(key, value) else {
        if el.children.is_empty() {
            return FieldRead::Value(CanonicalValue::empty_object());
        }
        return FieldRead::Unsupported {
            reason: format!("maps of type Map<{key}, {value}> are not supported"),
        };
    };

    let mut entries = IndexMap::new();
    let mut unkeyed = 0;
    let mut duplicates = Vec::new();
    for child in &el.children {
        let entry_key = ["key", "name"]
            .into_iter()
            .find_map(|a| child.attribute(a).filter(|k| !k.is_empty()));
        let Some(entry_key) = entry_key else {
            unkeyed += 1;
            continue;
        };

        let read = match shape {
            MapShape::Vector4 => match read_vector(child, VectorWidth::Four) {
                Ok(v) => FieldRead::Value(v),
                Err(literal) => FieldRead::Mismatch { literal },
            },
            MapShape::Float => {
                let text = child.attribute("value").unwrap_or(&child.text);
                match parse_float(text) {
                    Some(x) => FieldRead::Value(CanonicalValue::Float(x)),
                    None => FieldRead::Mismatch {
                        literal: text.trim().to_string(),
                    },
                }
            }
            MapShape::Text => {
                let text = ["file", "value"]
                    .into_iter()
                    .find_map(|a| child.attribute(a))
                    .unwrap_or(&child.text);
                FieldRead::Value(CanonicalValue::String(text.to_string()))
            }
        };
        if entries.insert(entry_key.to_string(), read).is_some() {
            duplicates.push(entry_key.to_string());
        }
    }
    FieldRead::Entries {
        value,
        entries,
        unkeyed,
        duplicates,
    }
}
