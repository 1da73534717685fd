//! # Default-Value Synthesizer
//!
//! Produces the canonical empty value for any [`TypeSpec`]. Used for
//! missing and mismatched fields during binding and for fresh documents.
//!
//! | Type                           | Default                                |
//! |--------------------------------|----------------------------------------|
//! | `String`, references           | `""`                                   |
//! | `Bool`                         | `false`                                |
//! | `Int` / `UInt` / `Float`       | `0`                                    |
//! | `Vector3` / `Vector4`          | all components `0`                     |
//! | `DynamicArray` / `StaticArray` | empty array                            |
//! | `Map`                          | empty object                           |
//! | `Enum`                         | first declared value, else `""`        |
//! | nested class                   | object of per-field defaults           |
//! | undeclared class               | `""` (opaque text)                     |
//!
//! The empty-enum case is the one default that is not a valid value. It is
//! reported through [`EmptyEnumDefault`] so callers can warn about it.
//!
//! Class graphs may be cyclic (`Node` holding a `Node`). A class that is
//! already being synthesized further up the stack yields an empty object.

use indexmap::IndexMap;
use rsd_core::{CanonicalValue, FieldPath, ScalarKind, TypeSpec, VectorWidth};

use crate::registry::SchemaRegistry;
use crate::schema::Schema;

/// An enum default that fell back to the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyEnumDefault {
    /// Where the value was synthesized.
    pub path: FieldPath,
    /// The enum that has no usable value.
    pub enum_name: String,
}

/// Synthesizes defaults, resolving nested classes through a registry.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSynthesizer<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> DefaultSynthesizer<'r> {
    /// A synthesizer resolving nested classes in `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Default for a field of `owner` declared with `spec`.
    ///
    /// `owner` supplies the enum table for `Enum<...>` types.
    pub fn default_for(&self, spec: &TypeSpec, owner: &Schema) -> CanonicalValue {
        self.default_at(spec, owner, &FieldPath::root()).0
    }

    /// Like [`DefaultSynthesizer::default_for`], also reporting every empty
    /// enum default under `path`.
    pub fn default_at(
        &self,
        spec: &TypeSpec,
        owner: &Schema,
        path: &FieldPath,
    ) -> (CanonicalValue, Vec<EmptyEnumDefault>) {
        let mut walk = Walk::default();
        let value = walk.value(self.registry, spec, owner, path);
        (value, walk.notes)
    }

    /// An object holding the default of every field of `schema`.
    pub fn default_object(&self, schema: &Schema) -> CanonicalValue {
        self.synthesize(schema).0
    }

    /// [`DefaultSynthesizer::default_object`] plus empty enum reports.
    pub fn synthesize(&self, schema: &Schema) -> (CanonicalValue, Vec<EmptyEnumDefault>) {
        let mut walk = Walk::default();
        let value = walk.object(self.registry, schema, &FieldPath::root());
        (value, walk.notes)
    }
}

#[derive(Default)]
struct Walk {
    in_progress: Vec<String>,
    notes: Vec<EmptyEnumDefault>,
}

impl Walk {
    fn object(&mut self, registry: &SchemaRegistry, schema: &Schema, path: &FieldPath) -> CanonicalValue {
        if self.in_progress.iter().any(|c| c == schema.class_name()) {
            tracing::debug!(class = schema.class_name(), path = %path, "cyclic class default");
            return CanonicalValue::empty_object();
        }
        self.in_progress.push(schema.class_name().to_string());
        let fields: IndexMap<String, CanonicalValue> = schema
            .fields()
            .map(|(name, spec)| {
                let value = self.value(registry, spec, schema, &path.field(name));
                (name.to_string(), value)
            })
            .collect();
        self.in_progress.pop();
        CanonicalValue::Object(fields)
    }

    fn value(
        &mut self,
        registry: &SchemaRegistry,
        spec: &TypeSpec,
        owner: &Schema,
        path: &FieldPath,
    ) -> CanonicalValue {
        match spec {
            TypeSpec::Scalar(ScalarKind::String)
            | TypeSpec::AssetReference(_)
            | TypeSpec::RawReference => CanonicalValue::String(String::new()),
            TypeSpec::Scalar(ScalarKind::Bool) => CanonicalValue::Bool(false),
            TypeSpec::Scalar(ScalarKind::Int) => CanonicalValue::Int(0),
            TypeSpec::Scalar(ScalarKind::UInt) => CanonicalValue::UInt(0),
            TypeSpec::Scalar(ScalarKind::Float) => CanonicalValue::Float(0.0),
            TypeSpec::Vector(VectorWidth::Three) => CanonicalValue::Vector3(0.0, 0.0, 0.0),
            TypeSpec::Vector(VectorWidth::Four) => CanonicalValue::Vector4(0.0, 0.0, 0.0, 0.0),
            TypeSpec::DynamicArray(_) | TypeSpec::StaticArray(..) => CanonicalValue::Array(Vec::new()),
            TypeSpec::Map(..) => CanonicalValue::empty_object(),
            TypeSpec::Enum(name) => match owner.enum_def(name).and_then(|e| e.first()) {
                Some(first) => CanonicalValue::Enum(first.name.clone()),
                None => {
                    self.notes.push(EmptyEnumDefault {
                        path: path.clone(),
                        enum_name: name.clone(),
                    });
                    CanonicalValue::Enum(String::new())
                }
            },
            TypeSpec::ObjectRef(class) => match registry.try_get_by_class_name(class) {
                Some(nested) => self.object(registry, nested, path),
                None => CanonicalValue::String(String::new()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_sources(vec![(
            "mesh.rsd",
            r#"<rsd_file>
                 <enum class_name="Topology">
                   <value name="triangleList"/><value name="lineList"/>
                 </enum>
                 <rsd class_name="Part">
                   <field name="name" type="String"/>
                   <field name="count" type="UInt"/>
                   <field name="visible" type="Bool"/>
                 </rsd>
                 <rsd class_name="Mesh" file_suffix=".mesh">
                   <field name="topology" type="Topology"/>
                   <field name="main" type="Part"/>
                   <field name="parts" type="DynamicArray" element="Part"/>
                   <field name="weights" type="StaticArray" element="Float" count="4"/>
                   <field name="params" type="Map" key="String" value="Float"/>
                   <field name="tint" type="Vector4"/>
                   <field name="material" type="AssetReference" target="Material"/>
                   <field name="mode" type="Enum&lt;Missing&gt;"/>
                   <field name="future" type="Gadget"/>
                 </rsd>
                 <rsd class_name="Node">
                   <field name="label" type="String"/>
                   <field name="child" type="Node"/>
                 </rsd>
               </rsd_file>"#,
        )])
        .unwrap()
    }

    #[test]
    fn test_default_object_covers_every_field() {
        let reg = registry();
        let mesh = reg.try_get_by_class_name("Mesh").unwrap();
        let (value, notes) = DefaultSynthesizer::new(&reg).synthesize(mesh);

        assert_eq!(value.get("topology"), Some(&CanonicalValue::Enum("triangleList".into())));
        let main = value.get("main").unwrap();
        assert_eq!(main.get("name"), Some(&CanonicalValue::String(String::new())));
        assert_eq!(main.get("count"), Some(&CanonicalValue::UInt(0)));
        assert_eq!(main.get("visible"), Some(&CanonicalValue::Bool(false)));
        assert_eq!(value.get("parts"), Some(&CanonicalValue::Array(vec![])));
        assert_eq!(value.get("weights"), Some(&CanonicalValue::Array(vec![])));
        assert_eq!(value.get("params"), Some(&CanonicalValue::empty_object()));
        assert_eq!(value.get("tint"), Some(&CanonicalValue::Vector4(0.0, 0.0, 0.0, 0.0)));
        assert_eq!(value.get("material"), Some(&CanonicalValue::String(String::new())));
        assert_eq!(value.get("future"), Some(&CanonicalValue::String(String::new())));

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let declared: Vec<&str> = mesh.fields().map(|(n, _)| n).collect();
        assert_eq!(keys, declared);

        assert_eq!(value.get("mode"), Some(&CanonicalValue::Enum(String::new())));
        assert_eq!(
            notes,
            vec![EmptyEnumDefault {
                path: FieldPath::root().field("mode"),
                enum_name: "Missing".into(),
            }]
        );
    }

    #[test]
    fn test_cyclic_class_terminates() {
        let reg = registry();
        let node = reg.try_get_by_class_name("Node").unwrap();
        let value = DefaultSynthesizer::new(&reg).default_object(node);
        assert_eq!(value.get("child"), Some(&CanonicalValue::empty_object()));
    }

    #[test]
    fn test_default_for_single_field() {
        let reg = registry();
        let mesh = reg.try_get_by_class_name("Mesh").unwrap();
        let synth = DefaultSynthesizer::new(&reg);
        let spec = mesh.field("topology").unwrap();
        assert_eq!(synth.default_for(spec, mesh), CanonicalValue::Enum("triangleList".into()));
        assert_eq!(
            synth.default_for(&TypeSpec::Vector(VectorWidth::Three), mesh),
            CanonicalValue::Vector3(0.0, 0.0, 0.0)
        );
    }
}
