//! # rsd-schema — Asset Class Schemas
//!
//! Loads the `.rsd` schema directory of a content repository into an
//! immutable [`SchemaRegistry`] and synthesizes default values for the
//! classes it declares.
//!
//! ## Modules
//!
//! - [`loader`] parses one schema file in either the legacy single-class
//!   form or the extended multi-class form with file-local enums.
//! - [`registry`] indexes the loaded classes by file suffix and class name.
//! - [`defaults`] produces the canonical empty value for any field type.
//!
//! ## Crate Policy
//!
//! - Depends only on `rsd-core` internally.
//! - Schema errors are structural and abort the load. Nothing here heals.
//! - The registry never touches disk after construction.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod registry;
pub mod schema;

pub use defaults::{DefaultSynthesizer, EmptyEnumDefault};
pub use error::SchemaLoadError;
pub use loader::{parse_schema_document, parse_schema_file};
pub use registry::SchemaRegistry;
pub use schema::{normalize_suffix, Schema};
