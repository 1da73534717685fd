//! # Schema Load Errors
//!
//! Every failure while building a [`SchemaRegistry`](crate::SchemaRegistry)
//! is structural and aborts the load. Variants name the schema file (and
//! class or field where one exists) so authors can find the problem.

use rsd_core::{EnumError, TypeSpecError, XmlError};
use thiserror::Error;

/// Failure to load a schema directory or one schema file.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The schema directory does not exist or is not a directory.
    #[error("schema directory not found: {path}")]
    DirectoryNotFound {
        /// Directory that was requested.
        path: String,
    },

    /// The directory exists but holds no `*.rsd` files.
    #[error("no .rsd schema files found in {path}")]
    NoSchemaFiles {
        /// Directory that was scanned.
        path: String,
    },

    /// IO error reading the directory or a schema file.
    #[error("io error reading '{path}': {source}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not well-formed XML.
    #[error("schema file '{file}': {source}")]
    Xml {
        /// Schema file name.
        file: String,
        /// Reader error.
        #[source]
        source: XmlError,
    },

    /// The root element is neither `<rsd>` nor `<rsd_file>`.
    #[error("schema file '{file}': unknown root element <{element}>, expected <rsd> or <rsd_file>")]
    UnknownRootElement {
        /// Schema file name.
        file: String,
        /// Root element found.
        element: String,
    },

    /// An `<rsd_file>` container declares no classes.
    #[error("schema file '{file}': no <rsd> class declared")]
    NoClassDeclared {
        /// Schema file name.
        file: String,
    },

    /// A required attribute is absent or empty.
    #[error("schema file '{file}': {element} is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Schema file name.
        file: String,
        /// Description of the element, e.g. `field 'parts' of class 'Mesh'`.
        element: String,
        /// Attribute name.
        attribute: &'static str,
    },

    /// An enum block declares no values.
    #[error("schema file '{file}': enum '{enum_name}' declares no values")]
    EmptyEnum {
        /// Schema file name.
        file: String,
        /// Enum name.
        enum_name: String,
    },

    /// An enum value carries a non-integer `value` attribute.
    #[error("schema file '{file}': enum '{enum_name}' has non-integer value '{value}'")]
    InvalidEnumValue {
        /// Schema file name.
        file: String,
        /// Enum name.
        enum_name: String,
        /// Offending attribute text.
        value: String,
    },

    /// Two enums in one file share a name.
    #[error("schema file '{file}': enum '{enum_name}' declared more than once")]
    DuplicateEnum {
        /// Schema file name.
        file: String,
        /// Enum name.
        enum_name: String,
    },

    /// One enum repeats a canonical value name.
    #[error("schema file '{file}': {source}")]
    DuplicateEnumValue {
        /// Schema file name.
        file: String,
        /// Underlying enum error.
        #[source]
        source: EnumError,
    },

    /// A field's type specifier is structurally malformed.
    #[error("schema file '{file}': field '{field}' of class '{class_name}': {source}")]
    InvalidTypeSpec {
        /// Schema file name.
        file: String,
        /// Owning class.
        class_name: String,
        /// Field name.
        field: String,
        /// Parser error.
        #[source]
        source: TypeSpecError,
    },

    /// A class declares the same field twice.
    #[error("schema file '{file}': class '{class_name}' declares field '{field}' more than once")]
    DuplicateField {
        /// Schema file name.
        file: String,
        /// Owning class.
        class_name: String,
        /// Repeated field name.
        field: String,
    },

    /// Two schemas in the registry share a class name.
    #[error("class '{class_name}' declared in both '{first_file}' and '{second_file}'")]
    DuplicateClass {
        /// Repeated class name.
        class_name: String,
        /// File of the first declaration.
        first_file: String,
        /// File of the second declaration.
        second_file: String,
    },
}
