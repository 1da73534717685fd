//! # rsd-codec — Schema-Driven Asset Document Codec
//!
//! Converts asset documents between their on-disk XML form and canonical
//! value trees, driven field by field by the schema matched to the
//! document's file suffix.
//!
//! ## Load Path
//!
//! ```text
//! file ─► XmlElement ─► Decoder ─► FieldRead ─► Binder ─► ValidationOutcome
//!                                                 │
//!                                   DefaultSynthesizer (heals)
//! ```
//!
//! The [`Decoder`] reports what it found without judging it. The
//! [`Binder`] replaces missing and mismatched values with schema defaults
//! and records one warning per heal. Loading never fails on document
//! *data*; it fails only when the file cannot be read or no schema
//! matches.
//!
//! ## Save Path
//!
//! The [`Encoder`] writes fields in schema order, so an untouched
//! document re-saves without spurious diffs. A document produced by
//! [`new_asset`], saved, and loaded again binds with `was_altered == false`.
//!
//! ## Editing
//!
//! [`EditSession`] holds one open document and accepts only edits that
//! fit the schema (see [`compat`]).
//!
//! ## Crate Policy
//!
//! - Depends on `rsd-core` and `rsd-schema` internally.
//! - Every heal emits a `tracing::warn!` event and a warning string.
//! - Single-threaded and synchronous; the registry is shared read-only.

pub mod asset;
pub mod binder;
pub mod compat;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod session;

pub use asset::{load_asset, new_asset, parse_document, save_asset, serialize_document, LoadedAsset};
pub use binder::{Binder, Heal, ValidationOutcome};
pub use decode::{Decoder, FieldRead};
pub use encode::Encoder;
pub use error::{BindError, CodecError, EditError};
pub use session::EditSession;
