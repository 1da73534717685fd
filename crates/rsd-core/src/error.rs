//! # Error Types — Structured Error Hierarchy
//!
//! Defines the leaf error types shared across the RSD toolkit. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Type specifier errors name the full offending specifier so schema
//!   authors can find it in their `.rsd` file.
//! - Path errors carry the path text and the segment that failed.
//! - XML errors carry the byte position reported by the reader.

use thiserror::Error;

/// A type specifier that is structurally malformed.
///
/// Unknown specifiers are never errors (they degrade to `String`); only
/// generic containers with the wrong number or shape of arguments are.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeSpecError {
    /// A generic container received the wrong number of arguments.
    #[error("{container}<...> expects {expected} arguments, found {found}: '{spec}'")]
    Arity {
        /// The full specifier text.
        spec: String,
        /// Container keyword (`Map`, `StaticArray`).
        container: &'static str,
        /// Required argument count.
        expected: usize,
        /// Argument count actually present.
        found: usize,
    },

    /// A `StaticArray` count that is not a non-negative integer.
    #[error("StaticArray count must be a non-negative integer, got '{count}' in '{spec}'")]
    InvalidCount {
        /// The full specifier text.
        spec: String,
        /// The offending count text.
        count: String,
    },
}

/// An enum definition that cannot be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumError {
    /// Two values share a canonical name.
    #[error("enum '{enum_name}' declares value '{value}' more than once")]
    DuplicateValue {
        /// Enum name.
        enum_name: String,
        /// The repeated canonical name.
        value: String,
    },
}

/// Failure to parse or follow a field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path text is not well formed.
    #[error("invalid field path '{path}': {reason}")]
    Syntax {
        /// The path text.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A segment names a field, index, or key that does not exist.
    #[error("field path '{path}': no such element '{segment}'")]
    NotFound {
        /// The path text.
        path: String,
        /// The segment that could not be followed.
        segment: String,
    },

    /// A segment tried to descend into a value that is not a container.
    #[error("field path '{path}': cannot descend into {found} at '{segment}'")]
    NotContainer {
        /// The path text.
        path: String,
        /// The segment that could not be followed.
        segment: String,
        /// Kind of the value found there.
        found: &'static str,
    },
}

/// Failure to read or write an XML document.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The reader rejected the input.
    #[error("xml syntax error at byte {position}: {message}")]
    Syntax {
        /// Byte offset reported by the reader.
        position: u64,
        /// Reader error text.
        message: String,
    },

    /// Tags are unbalanced or there is more than one root.
    #[error("malformed xml: {0}")]
    Malformed(String),

    /// The document contains no element at all.
    #[error("xml document has no root element")]
    NoRoot,

    /// The writer failed.
    #[error("xml write error: {0}")]
    Write(String),

    /// IO error reading or writing a document file.
    #[error("io error on '{path}': {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
