//! # Codec Error Types
//!
//! Document *data* problems never surface here: the binder heals them and
//! reports warnings. These errors cover what cannot be healed: unreadable
//! files, documents with no matching schema, in-memory values that do not
//! fit their schema on save, and rejected edits.

use rsd_core::{PathError, XmlError};
use thiserror::Error;

/// Failure to serialize a canonical value tree.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The top-level value is not an object.
    #[error("document value must be an object, found {found}")]
    NotAnObject {
        /// Kind of the value supplied.
        found: &'static str,
    },

    /// A value's variant does not match its field type.
    #[error("field '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Field path.
        path: String,
        /// Declared type.
        expected: String,
        /// Kind of the value supplied.
        found: &'static str,
    },

    /// A map whose key or value type has no on-disk shape.
    #[error("field '{path}': maps of type {spec} cannot be written")]
    UnsupportedMap {
        /// Field path.
        path: String,
        /// Declared map type.
        spec: String,
    },

    /// An array whose element type has no on-disk form.
    #[error("field '{path}': {reason}")]
    UnsupportedArray {
        /// Field path.
        path: String,
        /// What makes the element type unwritable.
        reason: String,
    },

    /// Writing the XML failed.
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Failure to bind a document to a schema.
#[derive(Error, Debug)]
pub enum BindError {
    /// The document could not be read or is not well-formed XML.
    #[error("cannot read asset document: {0}")]
    Xml(#[from] XmlError),

    /// No schema claims the document's file suffix.
    #[error("no schema registered for suffix '{suffix}' ({path})")]
    NoSchemaForSuffix {
        /// Document path.
        path: String,
        /// Suffix looked up (may be empty).
        suffix: String,
    },

    /// The schema is a value type and cannot be a root document.
    #[error("class '{class_name}' has no file suffix and cannot be a root document")]
    NotAnAssetSchema {
        /// Class name.
        class_name: String,
    },
}

/// A rejected edit or a failure to load or save an edit session.
#[derive(Error, Debug)]
pub enum EditError {
    /// The path names a field the schema does not declare.
    #[error("class '{class_name}' has no field '{field}' (path '{path}')")]
    UnknownField {
        /// Full path text.
        path: String,
        /// Class searched.
        class_name: String,
        /// Missing field name.
        field: String,
    },

    /// The path steps into a type that has no such child.
    #[error("path '{path}': cannot apply '{segment}' to a field of type {spec}")]
    PathType {
        /// Full path text.
        path: String,
        /// Offending segment.
        segment: String,
        /// Type at that point.
        spec: String,
    },

    /// The new value does not fit the declared type.
    #[error("path '{path}': expected {expected}, found {found}")]
    Incompatible {
        /// Path of the offending node.
        path: String,
        /// Declared type.
        expected: String,
        /// What was supplied.
        found: String,
    },

    /// The path could not be followed in the document.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Loading the document failed.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Saving the document failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
