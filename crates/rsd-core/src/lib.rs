//! # rsd-core — Foundational Types for RSD Assets
//!
//! This crate is the leaf of the RSD toolkit. It defines the closed type
//! system that asset class schemas are written in and the value tree that
//! asset documents are parsed into. Every other crate in the workspace
//! depends on `rsd-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged unions, not hierarchies.** `TypeSpec` and `CanonicalValue`
//!    are plain enums. Every consumer matches exhaustively, so adding a new
//!    container kind is a compile-time-checked change.
//!
//! 2. **Lenient type specifiers.** `TypeSpec::parse` never rejects an
//!    unknown specifier; it degrades to an opaque string. Only structurally
//!    malformed generics (`Map` without two arguments, `StaticArray` with a
//!    bad count) are errors, because those come from schema authors.
//!
//! 3. **No back-references.** A `CanonicalValue` tree never points at its
//!    schema. The schema travels alongside the value.
//!
//! 4. **One XML tree.** Schema files and asset documents share the small
//!    `XmlElement` tree in [`xml`], read and written with `quick-xml`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rsd-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod enums;
pub mod error;
pub mod path;
pub mod typespec;
pub mod value;
pub mod xml;

// Re-export primary types for ergonomic imports.
pub use enums::{eq_ignore_case, EnumDef, EnumValue};
pub use error::{EnumError, PathError, TypeSpecError, XmlError};
pub use path::{FieldPath, PathSegment};
pub use typespec::{ScalarKind, TypeSpec, VectorWidth};
pub use value::{format_float, CanonicalValue};
pub use xml::XmlElement;
