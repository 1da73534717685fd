//! # Type Specifiers — The Closed Field Type System
//!
//! A schema field's type is written as a specifier string such as
//! `Vector3`, `DynamicArray<Enum<Topology>>`, `Map<String, Float>` or
//! `AssetReference<Material>`. This module parses those strings into the
//! closed [`TypeSpec`] union.
//!
//! ## Parsing Rules
//!
//! - Container keywords (`DynamicArray`, `StaticArray`, `Map`, `Enum`,
//!   `AssetReference`, `RawReference`) match case-insensitively, as do the
//!   scalar and vector keywords.
//! - Generic arguments span from the leftmost `<` to the rightmost `>`, and
//!   multi-argument lists split only on top-level commas, so nested
//!   generics such as `Map<String, DynamicArray<Int>>` stay intact.
//! - A bare identifier that is not a keyword is an [`TypeSpec::ObjectRef`].
//!   Whether it names a real class is decided lazily, at codec time, so
//!   schemas may refer to classes declared in later files.
//! - Anything else degrades to `String`, so fields of unknown future types
//!   still round-trip as opaque text.

use std::fmt;
use std::str::FromStr;

use crate::enums::eq_ignore_case;
use crate::error::TypeSpecError;

/// Scalar kinds stored as element text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Free text.
    String,
    /// `true` / `false`.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    UInt,
    /// 64-bit float.
    Float,
}

impl ScalarKind {
    /// Canonical keyword for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::UInt => "UInt",
            Self::Float => "Float",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        // `Double` is what the engine headers call the wide float.
        [
            ("String", Self::String),
            ("Bool", Self::Bool),
            ("Int", Self::Int),
            ("UInt", Self::UInt),
            ("Float", Self::Float),
            ("Double", Self::Float),
        ]
        .into_iter()
        .find(|(kw, _)| eq_ignore_case(kw, s))
        .map(|(_, kind)| kind)
    }
}

/// Width of a vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorWidth {
    /// `x y z`
    Three,
    /// `x y z w`
    Four,
}

impl VectorWidth {
    /// Component names in on-disk order.
    pub fn components(self) -> &'static [&'static str] {
        match self {
            Self::Three => &["x", "y", "z"],
            Self::Four => &["x", "y", "z", "w"],
        }
    }

    /// Number of components.
    pub fn len(self) -> usize {
        self.components().len()
    }
}

/// A parsed field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    /// Text, boolean, or numeric scalar.
    Scalar(ScalarKind),
    /// `Vector3` or `Vector4`.
    Vector(VectorWidth),
    /// `Enum<Name>`; values come from the owning schema's enum table.
    Enum(String),
    /// `DynamicArray<T>`
    DynamicArray(Box<TypeSpec>),
    /// `StaticArray<T, N>`
    StaticArray(Box<TypeSpec>, usize),
    /// `Map<K, V>`
    Map(Box<TypeSpec>, Box<TypeSpec>),
    /// `AssetReference<TargetClass>`: a path to another document.
    AssetReference(String),
    /// `RawReference`: an opaque path or identifier.
    RawReference,
    /// A nested instance of the named class, resolved at codec time.
    ObjectRef(String),
}

impl TypeSpec {
    /// Parse a specifier string.
    ///
    /// # Errors
    ///
    /// Returns [`TypeSpecError::Arity`] when `Map` or `StaticArray` does not
    /// receive exactly two arguments, and [`TypeSpecError::InvalidCount`]
    /// when a `StaticArray` count is not an integer. Unknown specifiers are
    /// never errors.
    pub fn parse(spec: &str) -> Result<Self, TypeSpecError> {
        let s = spec.trim();
        if let (Some(lt), Some(gt)) = (s.find('<'), s.rfind('>')) {
            if gt > lt {
                let base = s[..lt].trim();
                let inner = s[lt + 1..gt].trim();
                return Self::parse_generic(s, base, inner);
            }
        }
        Ok(Self::parse_bare(s))
    }

    fn parse_generic(full: &str, base: &str, inner: &str) -> Result<Self, TypeSpecError> {
        if eq_ignore_case(base, "DynamicArray") {
            return Ok(Self::DynamicArray(Box::new(Self::parse(inner)?)));
        }
        if eq_ignore_case(base, "StaticArray") {
            let args = split_top_level(inner);
            let [elem, count] = args.as_slice() else {
                return Err(TypeSpecError::Arity {
                    spec: full.to_string(),
                    container: "StaticArray",
                    expected: 2,
                    found: args.len(),
                });
            };
            let n = count.parse::<usize>().map_err(|_| TypeSpecError::InvalidCount {
                spec: full.to_string(),
                count: count.to_string(),
            })?;
            return Ok(Self::StaticArray(Box::new(Self::parse(elem)?), n));
        }
        if eq_ignore_case(base, "Map") {
            let args = split_top_level(inner);
            let [key, value] = args.as_slice() else {
                return Err(TypeSpecError::Arity {
                    spec: full.to_string(),
                    container: "Map",
                    expected: 2,
                    found: args.len(),
                });
            };
            return Ok(Self::Map(
                Box::new(Self::parse(key)?),
                Box::new(Self::parse(value)?),
            ));
        }
        if eq_ignore_case(base, "Enum") && !inner.is_empty() {
            return Ok(Self::Enum(inner.to_string()));
        }
        if eq_ignore_case(base, "AssetReference") {
            return Ok(Self::AssetReference(inner.to_string()));
        }
        Ok(Self::Scalar(ScalarKind::String))
    }

    fn parse_bare(s: &str) -> Self {
        if let Some(kind) = ScalarKind::from_keyword(s) {
            return Self::Scalar(kind);
        }
        if eq_ignore_case(s, "Vector3") {
            return Self::Vector(VectorWidth::Three);
        }
        if eq_ignore_case(s, "Vector4") {
            return Self::Vector(VectorWidth::Four);
        }
        if eq_ignore_case(s, "RawReference") {
            return Self::RawReference;
        }
        if eq_ignore_case(s, "AssetReference") {
            return Self::AssetReference(String::new());
        }
        if is_identifier(s) {
            return Self::ObjectRef(s.to_string());
        }
        Self::Scalar(ScalarKind::String)
    }

    /// Element type of an array specifier.
    pub fn element_type(&self) -> Option<&TypeSpec> {
        match self {
            Self::DynamicArray(elem) | Self::StaticArray(elem, _) => Some(elem),
            _ => None,
        }
    }

    /// Value type of a map specifier.
    pub fn map_value_type(&self) -> Option<&TypeSpec> {
        match self {
            Self::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// True for types stored as plain text paths or strings.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            Self::Scalar(ScalarKind::String) | Self::AssetReference(_) | Self::RawReference
        )
    }
}

impl FromStr for TypeSpec {
    type Err = TypeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.as_str()),
            Self::Vector(VectorWidth::Three) => f.write_str("Vector3"),
            Self::Vector(VectorWidth::Four) => f.write_str("Vector4"),
            Self::Enum(name) => write!(f, "Enum<{name}>"),
            Self::DynamicArray(elem) => write!(f, "DynamicArray<{elem}>"),
            Self::StaticArray(elem, n) => write!(f, "StaticArray<{elem}, {n}>"),
            Self::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            Self::AssetReference(target) => write!(f, "AssetReference<{target}>"),
            Self::RawReference => f.write_str("RawReference"),
            Self::ObjectRef(class) => f.write_str(class),
        }
    }
}

/// Split a generic argument list on commas that are not nested in `<...>`.
fn split_top_level(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut cur = String::new();
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            _ => {}
        }
        if c == ',' && depth == 0 {
            out.push(cur.trim().to_string());
            cur.clear();
        } else {
            cur.push(c);
        }
    }
    let last = cur.trim();
    if !last.is_empty() {
        out.push(last.to_string());
    }
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
