//! # Canonical Values
//!
//! The in-memory form of one parsed asset document. The variants mirror
//! [`TypeSpec`](crate::TypeSpec): objects keep their fields in insertion
//! order (schema order after binding), arrays keep element order, and maps
//! are objects keyed by entry name.
//!
//! A tree is owned by whoever parsed it. It carries no reference to its
//! schema; callers pass the schema alongside.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A node of the canonical value tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CanonicalValue {
    /// No value.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Unsigned integer scalar.
    #[serde(rename = "uint")]
    UInt(u64),
    /// Float scalar.
    Float(f64),
    /// Text, asset references, and raw references.
    String(String),
    /// Three-component vector.
    Vector3(f64, f64, f64),
    /// Four-component vector.
    Vector4(f64, f64, f64, f64),
    /// Ordered elements.
    Array(Vec<CanonicalValue>),
    /// Nested objects and maps.
    Object(IndexMap<String, CanonicalValue>),
    /// Canonical enum value name.
    Enum(String),
}

impl CanonicalValue {
    /// An object with no fields.
    pub fn empty_object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// Short lowercase name of the variant, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Vector3(..) => "vector3",
            Self::Vector4(..) => "vector4",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Enum(_) => "enum",
        }
    }

    /// Object fields, if this is an object.
    pub fn as_object(&self) -> Option<&IndexMap<String, CanonicalValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Array elements, if this is an array.
    pub fn as_array(&self) -> Option<&[CanonicalValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Text of a string or enum value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Field of an object by name.
    pub fn get(&self, field: &str) -> Option<&CanonicalValue> {
        self.as_object()?.get(field)
    }
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => f.write_str(&format_float(*x)),
            Self::String(s) | Self::Enum(s) => write!(f, "'{s}'"),
            Self::Vector3(x, y, z) => write!(
                f,
                "({}, {}, {})",
                format_float(*x),
                format_float(*y),
                format_float(*z)
            ),
            Self::Vector4(x, y, z, w) => write!(
                f,
                "({}, {}, {}, {})",
                format_float(*x),
                format_float(*y),
                format_float(*z),
                format_float(*w)
            ),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Shortest text that parses back to exactly `x` (`1.5`, `-2`, `0`).
pub fn format_float(x: f64) -> String {
    format!("{x}")
}
