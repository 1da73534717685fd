//! # Value Compatibility
//!
//! Checks an in-memory value against a declared field type. Edit sessions
//! use it to refuse values that the encoder could not write or that would
//! not bind back unchanged.
//!
//! Matching is by variant (a `Float` field takes only a finite `Float`).
//! Enum values must be a declared canonical name. Static arrays hold either
//! no items or exactly their declared count. Nested objects may omit
//! fields but may not add undeclared ones.

use rsd_core::{CanonicalValue, FieldPath, ScalarKind, TypeSpec, VectorWidth};
use rsd_schema::{Schema, SchemaRegistry};

use crate::error::EditError;
use crate::format::{unsupported_element, MapShape};

/// Check `value` against `spec`, a field type of `owner`.
///
/// # Errors
///
/// [`EditError::Incompatible`] naming the first offending node under `path`.
pub fn check(
    registry: &SchemaRegistry,
    value: &CanonicalValue,
    spec: &TypeSpec,
    owner: &Schema,
    path: &FieldPath,
) -> Result<(), EditError> {
    let incompatible = |found: String| EditError::Incompatible {
        path: path.to_string(),
        expected: spec.to_string(),
        found,
    };
    let wrong_kind = || incompatible(value.kind_name().to_string());

    match (spec, value) {
        (TypeSpec::Scalar(ScalarKind::String), CanonicalValue::String(_))
        | (TypeSpec::AssetReference(_) | TypeSpec::RawReference, CanonicalValue::String(_))
        | (TypeSpec::Scalar(ScalarKind::Bool), CanonicalValue::Bool(_))
        | (TypeSpec::Scalar(ScalarKind::Int), CanonicalValue::Int(_))
        | (TypeSpec::Scalar(ScalarKind::UInt), CanonicalValue::UInt(_))
        | (TypeSpec::Vector(VectorWidth::Three), CanonicalValue::Vector3(..))
        | (TypeSpec::Vector(VectorWidth::Four), CanonicalValue::Vector4(..)) => Ok(()),
        (TypeSpec::Scalar(ScalarKind::Float), CanonicalValue::Float(x)) => {
            if x.is_finite() {
                Ok(())
            } else {
                Err(incompatible(format!("non-finite float {x}")))
            }
        }
        (TypeSpec::Enum(name), CanonicalValue::Enum(v)) => {
            let valid = match owner.enum_def(name).filter(|def| !def.is_empty()) {
                Some(def) => def.contains(v),
                None => v.is_empty(),
            };
            if valid {
                Ok(())
            } else {
                Err(incompatible(format!("undeclared value '{v}'")))
            }
        }
        (TypeSpec::DynamicArray(element) | TypeSpec::StaticArray(element, _), CanonicalValue::Array(items)) => {
            if let TypeSpec::StaticArray(_, count) = spec {
                if !items.is_empty() && items.len() != *count {
                    return Err(incompatible(format!("{} items", items.len())));
                }
            }
            if !items.is_empty() {
                if let Some(reason) = unsupported_element(element, registry) {
                    return Err(incompatible(reason));
                }
            }
            check_items(registry, items, element, owner, path)
        }
        (TypeSpec::Map(key, value_spec), CanonicalValue::Object(entries)) => {
            if MapShape::for_map(key, value_spec).is_none() && !entries.is_empty() {
                return Err(incompatible("a map kind with no on-disk form".to_string()));
            }
            entries.iter().try_for_each(|(k, v)| {
                check(registry, v, value_spec, owner, &path.key(k.as_str()))
            })
        }
        (TypeSpec::ObjectRef(class), _) => match (registry.try_get_by_class_name(class), value) {
            (Some(nested), CanonicalValue::Object(fields)) => {
                fields.iter().try_for_each(|(name, v)| {
                    let field_path = path.field(name.as_str());
                    match nested.field(name) {
                        Some(field_spec) => check(registry, v, field_spec, nested, &field_path),
                        None => Err(EditError::UnknownField {
                            path: field_path.to_string(),
                            class_name: nested.class_name().to_string(),
                            field: name.clone(),
                        }),
                    }
                })
            }
            (None, CanonicalValue::String(_)) => Ok(()),
            _ => Err(wrong_kind()),
        },
        _ => Err(wrong_kind()),
    }
}

/// Check a whole document value against its root schema.
///
/// # Errors
///
/// [`EditError::Incompatible`] or [`EditError::UnknownField`] for the first
/// offending node.
pub fn check_document(
    registry: &SchemaRegistry,
    value: &CanonicalValue,
    schema: &Schema,
) -> Result<(), EditError> {
    let CanonicalValue::Object(fields) = value else {
        return Err(EditError::Incompatible {
            path: String::new(),
            expected: schema.class_name().to_string(),
            found: value.kind_name().to_string(),
        });
    };
    fields.iter().try_for_each(|(name, v)| {
        let path = FieldPath::root().field(name.as_str());
        match schema.field(name) {
            Some(spec) => check(registry, v, spec, schema, &path),
            None => Err(EditError::UnknownField {
                path: path.to_string(),
                class_name: schema.class_name().to_string(),
                field: name.clone(),
            }),
        }
    })
}

fn check_items(
    registry: &SchemaRegistry,
    items: &[CanonicalValue],
    element: &TypeSpec,
    owner: &Schema,
    path: &FieldPath,
) -> Result<(), EditError> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(i, item)| check(registry, item, element, owner, &path.index(i)))
}
