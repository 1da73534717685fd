//! # Document Encoder
//!
//! Serializes a canonical value tree back to an element tree, field by
//! field in schema declaration order. This is the structural inverse of
//! the [`Decoder`](crate::Decoder): re-saving an untouched document never
//! reorders fields.
//!
//! Values must match their declared type variant exactly (`Float` for a
//! `Float` field, `Enum` for an `Enum<..>` field). Bound documents always
//! do; hand-built trees that do not are rejected with
//! [`CodecError::TypeMismatch`]. Object fields absent from the value are
//! skipped.

use indexmap::IndexMap;
use rsd_core::{
    format_float, CanonicalValue, FieldPath, ScalarKind, TypeSpec, VectorWidth, XmlElement,
};
use rsd_schema::{Schema, SchemaRegistry};

use crate::error::CodecError;
use crate::format::{unsupported_element, MapShape, ITEM_TAG, ROOT_TAG};

/// Encodes canonical trees against schemas from one registry.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Encoder<'r> {
    /// An encoder resolving nested classes in `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Encode a whole document as an `<asset>` element.
    ///
    /// # Errors
    ///
    /// [`CodecError::NotAnObject`] if `value` is not an object, otherwise
    /// the first field that does not fit its type.
    pub fn encode(&self, value: &CanonicalValue, schema: &Schema) -> Result<XmlElement, CodecError> {
        let CanonicalValue::Object(fields) = value else {
            return Err(CodecError::NotAnObject {
                found: value.kind_name(),
            });
        };
        let mut root = XmlElement::new(ROOT_TAG);
        self.encode_fields(&mut root, fields, schema, &FieldPath::root())?;
        Ok(root)
    }

    fn encode_fields(
        &self,
        parent: &mut XmlElement,
        fields: &IndexMap<String, CanonicalValue>,
        schema: &Schema,
        path: &FieldPath,
    ) -> Result<(), CodecError> {
        for (name, spec) in schema.fields() {
            let field_path = path.field(name);
            match fields.get(name) {
                Some(value) => {
                    parent.push_child(self.encode_value(name, value, spec, schema, &field_path)?)
                }
                None => tracing::debug!(
                    class = schema.class_name(),
                    field = %field_path,
                    "field absent from value, not written"
                ),
            }
        }
        Ok(())
    }

    fn encode_value(
        &self,
        tag: &str,
        value: &CanonicalValue,
        spec: &TypeSpec,
        owner: &Schema,
        path: &FieldPath,
    ) -> Result<XmlElement, CodecError> {
        let el = XmlElement::new(tag);
        let mismatch = || CodecError::TypeMismatch {
            path: path.to_string(),
            expected: spec.to_string(),
            found: value.kind_name(),
        };

        let el = match (spec, value) {
            (TypeSpec::Scalar(ScalarKind::String), CanonicalValue::String(s))
            | (TypeSpec::AssetReference(_) | TypeSpec::RawReference, CanonicalValue::String(s))
            | (TypeSpec::Enum(_), CanonicalValue::Enum(s)) => el.with_text(s.as_str()),
            (TypeSpec::Scalar(ScalarKind::Bool), CanonicalValue::Bool(b)) => {
                el.with_text(if *b { "true" } else { "false" })
            }
            (TypeSpec::Scalar(ScalarKind::Int), CanonicalValue::Int(i)) => el.with_text(i.to_string()),
            (TypeSpec::Scalar(ScalarKind::UInt), CanonicalValue::UInt(u)) => el.with_text(u.to_string()),
            (TypeSpec::Scalar(ScalarKind::Float), CanonicalValue::Float(x)) if x.is_finite() => {
                el.with_text(format_float(*x))
            }
            (TypeSpec::Vector(VectorWidth::Three), CanonicalValue::Vector3(..))
            | (TypeSpec::Vector(VectorWidth::Four), CanonicalValue::Vector4(..)) => {
                write_vector(el, value).ok_or_else(mismatch)?
            }
            (TypeSpec::DynamicArray(element) | TypeSpec::StaticArray(element, _), CanonicalValue::Array(items)) => {
                if !items.is_empty() {
                    if let Some(reason) = unsupported_element(element, self.registry) {
                        return Err(CodecError::UnsupportedArray {
                            path: path.to_string(),
                            reason,
                        });
                    }
                }
                let mut el = el;
                for (i, item) in items.iter().enumerate() {
                    el.push_child(self.encode_value(ITEM_TAG, item, element, owner, &path.index(i))?);
                }
                el
            }
            (TypeSpec::Map(key, value_spec), CanonicalValue::Object(entries)) => {
                let Some(shape) = MapShape::for_map(key, value_spec) else {
                    // An empty container needs no entry shape.
                    if entries.is_empty() {
                        return Ok(el);
                    }
                    return Err(CodecError::UnsupportedMap {
                        path: path.to_string(),
                        spec: spec.to_string(),
                    });
                };
                let mut el = el;
                for (k, v) in entries {
                    el.push_child(write_map_entry(shape, k, v, value_spec, &path.key(k.as_str()))?);
                }
                el
            }
            (TypeSpec::ObjectRef(class), _) => match (self.registry.try_get_by_class_name(class), value) {
                (Some(nested), CanonicalValue::Object(fields)) => {
                    let mut el = el;
                    self.encode_fields(&mut el, fields, nested, path)?;
                    el
                }
                (None, CanonicalValue::String(s)) => el.with_text(s.as_str()),
                _ => return Err(mismatch()),
            },
            _ => return Err(mismatch()),
        };
        Ok(el)
    }
}

/// Vector components as attributes, or `None` if the width does not fit.
fn write_vector(el: XmlElement, value: &CanonicalValue) -> Option<XmlElement> {
    let components = match value {
        CanonicalValue::Vector3(x, y, z) => vec![*x, *y, *z],
        CanonicalValue::Vector4(x, y, z, w) => vec![*x, *y, *z, *w],
        _ => return None,
    };
    Some(
        ["x", "y", "z", "w"]
            .into_iter()
            .zip(components)
            .fold(el, |el, (n, c)| el.with_attribute(n, format_float(c))),
    )
}

fn write_map_entry(
    shape: MapShape,
    key: &str,
    value: &CanonicalValue,
    value_spec: &TypeSpec,
    path: &FieldPath,
) -> Result<XmlElement, CodecError> {
    let el = XmlElement::new(shape.tag()).with_attribute("name", key);
    match (shape, value) {
        (MapShape::Vector4, CanonicalValue::Vector4(..)) => {
            if let Some(el) = write_vector(el, value) {
                return Ok(el);
            }
        }
        (MapShape::Float, CanonicalValue::Float(x)) if x.is_finite() => {
            return Ok(el.with_attribute("value", format_float(*x)));
        }
        (MapShape::Text, CanonicalValue::String(s)) => {
            return Ok(el.with_attribute("file", s.as_str()));
        }
        _ => {}
    }
    Err(CodecError::TypeMismatch {
        path: path.to_string(),
        expected: value_spec.to_string(),
        found: value.kind_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_sources(vec![(
            "m.rsd",
            r#"<rsd_file>
                 <rsd class_name="Part"><field name="name" type="String"/></rsd>
                 <rsd class_name="Mat" file_suffix=".mat">
                   <field name="tint" type="Vector4"/>
                   <field name="roughness" type="Float"/>
                   <field name="parts" type="DynamicArray" element="Part"/>
                   <field name="textures" type="Map" key="String" value="String"/>
                   <field name="ints" type="Map" key="String" value="Int"/>
                   <field name="grid" type="DynamicArray&lt;DynamicArray&lt;Int&gt;&gt;"/>
                 </rsd>
               </rsd_file>"#,
        )])
        .unwrap()
    }

    fn object(pairs: Vec<(&str, CanonicalValue)>) -> CanonicalValue {
        CanonicalValue::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_writes_schema_order_and_skips_absent() {
        let reg = registry();
        let schema = reg.try_get_by_suffix(".mat").unwrap();
        let value = object(vec![
            ("roughness", CanonicalValue::Float(0.5)),
            ("tint", CanonicalValue::Vector4(1.0, 0.5, 0.0, 1.0)),
        ]);
        let el = Encoder::new(&reg).encode(&value, schema).unwrap();
        let names: Vec<&str> = el.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["tint", "roughness"]);
        assert_eq!(el.children[0].attribute("y"), Some("0.5"));
        assert_eq!(el.children[0].attribute("w"), Some("1"));
        assert_eq!(el.children[1].text, "0.5");
    }

    #[test]
    fn test_array_of_objects_and_texture_map() {
        let reg = registry();
        let schema = reg.try_get_by_suffix(".mat").unwrap();
        let value = object(vec![
            (
                "parts",
                CanonicalValue::Array(vec![object(vec![(
                    "name",
                    CanonicalValue::String("wheel".into()),
                )])]),
            ),
            (
                "textures",
                object(vec![("albedo", CanonicalValue::String("t/a.png".into()))]),
            ),
        ]);
        let el = Encoder::new(&reg).encode(&value, schema).unwrap();
        let parts = el.child("parts").unwrap();
        assert_eq!(parts.children.len(), 1);
        assert_eq!(parts.children[0].name, "item");
        assert_eq!(parts.children[0].child("name").unwrap().text, "wheel");
        let tex = &el.child("textures").unwrap().children[0];
        assert_eq!(tex.name, "texture");
        assert_eq!(tex.attribute("name"), Some("albedo"));
        assert_eq!(tex.attribute("file"), Some("t/a.png"));
    }

    #[test]
    fn test_rejects_wrong_variants() {
        let reg = registry();
        let schema = reg.try_get_by_suffix(".mat").unwrap();
        let enc = Encoder::new(&reg);

        let err = enc.encode(&CanonicalValue::Int(1), schema).unwrap_err();
        assert!(matches!(err, CodecError::NotAnObject { found: "int" }));

        let value = object(vec![("tint", CanonicalValue::Vector3(0.0, 0.0, 0.0))]);
        let err = enc.encode(&value, schema).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));

        let value = object(vec![("roughness", CanonicalValue::Int(1))]);
        let err = enc.encode(&value, schema).unwrap_err();
        assert!(err.to_string().contains("roughness"));

        let value = object(vec![(
            "ints",
            object(vec![("a", CanonicalValue::Int(1))]),
        )]);
        let err = enc.encode(&value, schema).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedMap { .. }));
    }

    #[test]
    fn test_empty_map_without_entry_shape_is_written_empty() {
        let reg = registry();
        let schema = reg.try_get_by_suffix(".mat").unwrap();
        let value = object(vec![("ints", CanonicalValue::empty_object())]);
        let el = Encoder::new(&reg).encode(&value, schema).unwrap();
        let ints = el.child("ints").unwrap();
        assert!(ints.children.is_empty());
        assert!(ints.attributes.is_empty());
    }

    #[test]
    fn test_nested_array_only_written_empty() {
        let reg = registry();
        let schema = reg.try_get_by_suffix(".mat").unwrap();
        let enc = Encoder::new(&reg);

        let empty = object(vec![("grid", CanonicalValue::Array(vec![]))]);
        let el = enc.encode(&empty, schema).unwrap();
        assert!(el.child("grid").unwrap().children.is_empty());

        let filled = object(vec![(
            "grid",
            CanonicalValue::Array(vec![CanonicalValue::Array(vec![CanonicalValue::Int(1)])]),
        )]);
        let err = enc.encode(&filled, schema).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedArray { .. }));
    }

    #[test]
    fn test_vector_width_must_match() {
        let reg = registry();
        let schema = reg.try_get_by_suffix(".mat").unwrap();
        let err = Encoder::new(&reg)
            .encode_value(
                "v",
                &CanonicalValue::Vector4(0.0, 0.0, 0.0, 0.0),
                &TypeSpec::Vector(VectorWidth::Three),
                schema,
                &FieldPath::root().field("v"),
            )
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }
}
