//! # Asset Document I/O
//!
//! Entry points that tie the codec to files and text:
//!
//! - [`parse_document`] / [`serialize_document`] convert between document
//!   text and canonical trees for a known schema.
//! - [`load_asset`] reads a file and picks its schema by extension.
//! - [`new_asset`] synthesizes a fresh document.
//! - [`save_asset`] writes a canonical tree back to disk.
//!
//! Every call runs to completion on the calling thread. A failure leaves
//! the registry and any other open document untouched.

use std::path::Path;

use rsd_core::{CanonicalValue, XmlElement};
use rsd_schema::{DefaultSynthesizer, Schema, SchemaRegistry};

use crate::binder::{Binder, Heal, ValidationOutcome};
use crate::encode::Encoder;
use crate::error::{BindError, CodecError};

/// A bound document together with the schema it was bound to.
#[derive(Debug, Clone)]
pub struct LoadedAsset<'r> {
    /// The schema chosen by file extension.
    pub schema: &'r Schema,
    /// Bind result.
    pub outcome: ValidationOutcome,
}

/// Parse document text against a file-backed schema.
///
/// # Errors
///
/// [`BindError::Xml`] for malformed text, [`BindError::NotAnAssetSchema`]
/// if `schema` has no suffix.
pub fn parse_document(
    source: &str,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> Result<ValidationOutcome, BindError> {
    let root = XmlElement::parse(source)?;
    Binder::new(registry).bind(&root, schema)
}

/// Serialize a canonical tree as document text.
///
/// # Errors
///
/// See [`Encoder::encode`].
pub fn serialize_document(
    value: &CanonicalValue,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> Result<String, CodecError> {
    let root = Encoder::new(registry).encode(value, schema)?;
    Ok(root.to_document_string()?)
}

/// Read and bind the asset file at `path`.
///
/// # Errors
///
/// [`BindError::NoSchemaForSuffix`] when no schema claims the extension,
/// [`BindError::Xml`] when the file cannot be read or parsed.
pub fn load_asset<'r>(path: &Path, registry: &'r SchemaRegistry) -> Result<LoadedAsset<'r>, BindError> {
    let schema = registry
        .try_get_for_path(path)
        .ok_or_else(|| BindError::NoSchemaForSuffix {
            path: path.display().to_string(),
            suffix: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })?;
    let root = XmlElement::read_file(path)?;
    let outcome = Binder::new(registry).bind(&root, schema)?;
    tracing::debug!(
        path = %path.display(),
        class = schema.class_name(),
        altered = outcome.was_altered,
        warnings = outcome.warnings.len(),
        "loaded asset"
    );
    Ok(LoadedAsset { schema, outcome })
}

/// A fresh document of `schema` with every field at its default.
///
/// Empty-enum defaults are listed as warnings, but the outcome is never
/// marked altered: nothing on disk was changed.
pub fn new_asset(schema: &Schema, registry: &SchemaRegistry) -> ValidationOutcome {
    let (document, notes) = DefaultSynthesizer::new(registry).synthesize(schema);
    let warnings = notes
        .into_iter()
        .map(|note| {
            Heal::EmptyEnum {
                path: note.path,
                enum_name: note.enum_name,
            }
            .to_string()
        })
        .collect();
    ValidationOutcome {
        document,
        was_altered: false,
        warnings,
    }
}

/// Serialize `value` and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Encoding errors, or [`CodecError::Xml`] if the file cannot be written.
pub fn save_asset(
    path: &Path,
    value: &CanonicalValue,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> Result<(), CodecError> {
    let root = Encoder::new(registry).encode(value, schema)?;
    root.write_file(path)?;
    tracing::debug!(path = %path.display(), class = schema.class_name(), "saved asset");
    Ok(())
}
