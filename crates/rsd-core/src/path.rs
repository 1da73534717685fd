//! # Field Paths
//!
//! Addresses a node inside a canonical value tree. The text form is the
//! same one used in heal warnings: `camera.position`, `parts[2].name`,
//! `params["roughness"]`.
//!
//! [`CanonicalValue::apply`] is the pure edit primitive: it returns a new
//! tree with one node replaced and leaves the input untouched.

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;
use crate::value::CanonicalValue;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named object field.
    Field(String),
    /// Array position.
    Index(usize),
    /// Map entry key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Key(k) => write!(f, "[\"{k}\"]"),
        }
    }
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// This path extended by one named field.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Field(name.into()))
    }

    /// This path extended by one array index.
    pub fn index(&self, i: usize) -> Self {
        self.with(PathSegment::Index(i))
    }

    /// This path extended by one map key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathSegment::Key(key.into()))
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 && matches!(seg, PathSegment::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = |reason: &str| PathError::Syntax {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut chars = s.chars().peekable();
        let mut expect_field = true;

        while let Some(&c) = chars.peek() {
            match c {
                '[' => {
                    chars.next();
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        let mut key = String::new();
                        loop {
                            match chars.next() {
                                Some('"') => break,
                                Some(ch) => key.push(ch),
                                None => return Err(syntax("unterminated map key")),
                            }
                        }
                        if chars.next() != Some(']') {
                            return Err(syntax("expected ']' after map key"));
                        }
                        segments.push(PathSegment::Key(key));
                    } else {
                        let mut digits = String::new();
                        loop {
                            match chars.next() {
                                Some(']') => break,
                                Some(ch) => digits.push(ch),
                                None => return Err(syntax("unterminated index")),
                            }
                        }
                        let i = digits
                            .trim()
                            .parse::<usize>()
                            .map_err(|_| syntax("index must be a non-negative integer"))?;
                        segments.push(PathSegment::Index(i));
                    }
                    expect_field = false;
                }
                '.' => {
                    chars.next();
                    if expect_field {
                        return Err(syntax("empty field name"));
                    }
                    expect_field = true;
                }
                _ => {
                    let mut name = String::new();
                    while let Some(&ch) = chars.peek() {
                        if ch == '.' || ch == '[' {
                            break;
                        }
                        name.push(ch);
                        chars.next();
                    }
                    if !expect_field {
                        return Err(syntax("missing '.' before field name"));
                    }
                    segments.push(PathSegment::Field(name));
                    expect_field = false;
                }
            }
        }

        if segments.is_empty() {
            return Err(syntax("path is empty"));
        }
        if expect_field {
            return Err(syntax("trailing '.'"));
        }
        Ok(Self(segments))
    }
}

impl CanonicalValue {
    /// The node at `path`, if it exists.
    pub fn lookup(&self, path: &FieldPath) -> Option<&CanonicalValue> {
        path.segments()
            .iter()
            .try_fold(self, |node, seg| match (seg, node) {
                (PathSegment::Field(k) | PathSegment::Key(k), Self::Object(map)) => map.get(k),
                (PathSegment::Index(i), Self::Array(items)) => items.get(*i),
                _ => None,
            })
    }

    /// Replace the node at `path` in place.
    ///
    /// A map key that does not exist yet is inserted when it is the last
    /// segment, and an index equal to the array length appends. Object
    /// fields must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NotFound`] or [`PathError::NotContainer`] when
    /// the path cannot be followed.
    pub fn set_at(&mut self, path: &FieldPath, value: CanonicalValue) -> Result<(), PathError> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            *self = value;
            return Ok(());
        };

        let mut node = self;
        for seg in parents {
            node = step_mut(node, seg, path)?;
        }

        match (last, node) {
            (PathSegment::Field(k), CanonicalValue::Object(map)) => match map.get_mut(k) {
                Some(slot) => *slot = value,
                None => return Err(not_found(path, last)),
            },
            (PathSegment::Key(k), CanonicalValue::Object(map)) => {
                map.insert(k.clone(), value);
            }
            (PathSegment::Index(i), CanonicalValue::Array(items)) => {
                if *i < items.len() {
                    items[*i] = value;
                } else if *i == items.len() {
                    items.push(value);
                } else {
                    return Err(not_found(path, last));
                }
            }
            (seg, other) => {
                return Err(PathError::NotContainer {
                    path: path.to_string(),
                    segment: seg.to_string(),
                    found: other.kind_name(),
                })
            }
        }
        Ok(())
    }

    /// A copy of this tree with the node at `path` replaced by `value`.
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalValue::set_at`].
    pub fn apply(&self, path: &FieldPath, value: CanonicalValue) -> Result<CanonicalValue, PathError> {
        let mut out = self.clone();
        out.set_at(path, value)?;
        Ok(out)
    }
}

fn step_mut<'a>(
    node: &'a mut CanonicalValue,
    seg: &PathSegment,
    path: &FieldPath,
) -> Result<&'a mut CanonicalValue, PathError> {
    match (seg, node) {
        (PathSegment::Field(k) | PathSegment::Key(k), CanonicalValue::Object(map)) => {
            map.get_mut(k).ok_or_else(|| not_found(path, seg))
        }
        (PathSegment::Index(i), CanonicalValue::Array(items)) => {
            items.get_mut(*i).ok_or_else(|| not_found(path, seg))
        }
        (seg, other) => Err(PathError::NotContainer {
            path: path.to_string(),
            segment: seg.to_string(),
            found: other.kind_name(),
        }),
    }
}

fn not_found(path: &FieldPath, seg: &PathSegment) -> PathError {
    PathError::NotFound {
        path: path.to_string(),
        segment: seg.to_string(),
    }
}
