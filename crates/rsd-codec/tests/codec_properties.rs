//! Integration test: codec properties over the fixture schemas.
//!
//! Each test states one property of the load and save paths: synthesized
//! documents survive a save and reload untouched, healing replaces exactly
//! what does not fit, and every container kind round-trips.

use std::path::PathBuf;

use indexmap::IndexMap;
use proptest::prelude::*;
use rsd_codec::{new_asset, parse_document, serialize_document, Binder, BindError};
use rsd_core::{CanonicalValue, FieldPath, XmlElement};
use rsd_schema::{Schema, SchemaRegistry};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::load_from_dir(fixtures().join("rsd")).unwrap()
}

fn mesh(reg: &SchemaRegistry) -> &Schema {
    reg.try_get_by_suffix(".mesh").unwrap()
}

fn object(pairs: Vec<(&str, CanonicalValue)>) -> CanonicalValue {
    CanonicalValue::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

/// A default document with `field` replaced.
fn default_with(reg: &SchemaRegistry, schema: &Schema, field: &str, value: CanonicalValue) -> CanonicalValue {
    new_asset(schema, reg)
        .document
        .apply(&FieldPath::root().field(field), value)
        .unwrap()
}

fn round_trip(reg: &SchemaRegistry, schema: &Schema, value: &CanonicalValue) -> rsd_codec::ValidationOutcome {
    let text = serialize_document(value, schema, reg).unwrap();
    parse_document(&text, schema, reg).unwrap()
}

// ---------------------------------------------------------------------------
// Default documents
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_registry_loads() {
    let reg = registry();
    let classes: Vec<&str> = reg.schemas().map(Schema::class_name).collect();
    assert_eq!(classes, vec!["Camera", "Material", "MeshPart", "Mesh"]);
    assert!(reg.try_get_by_class_name("MeshPart").unwrap().file_suffix().is_none());
}

#[test]
fn test_default_document_round_trips_unaltered() {
    let reg = registry();
    for schema in reg.schemas().filter(|s| s.is_asset()) {
        let created = new_asset(schema, &reg);
        assert!(!created.was_altered);
        let loaded = round_trip(&reg, schema, &created.document);
        assert!(!loaded.was_altered, "{} healed: {:?}", schema.class_name(), loaded.warnings);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.document, created.document, "{}", schema.class_name());
    }
}

#[test]
fn test_default_mesh_values() {
    let reg = registry();
    let doc = new_asset(mesh(&reg), &reg).document;
    assert_eq!(doc.get("name"), Some(&CanonicalValue::String(String::new())));
    assert_eq!(doc.get("topology"), Some(&CanonicalValue::Enum("triangleList".into())));
    assert_eq!(doc.get("position"), Some(&CanonicalValue::Vector3(0.0, 0.0, 0.0)));
    assert_eq!(doc.get("tint"), Some(&CanonicalValue::Vector4(0.0, 0.0, 0.0, 0.0)));
    assert_eq!(doc.get("parts"), Some(&CanonicalValue::Array(vec![])));
    assert_eq!(doc.get("lods"), Some(&CanonicalValue::Array(vec![])));
    assert_eq!(doc.get("params"), Some(&CanonicalValue::empty_object()));
    assert_eq!(doc.get("material"), Some(&CanonicalValue::String(String::new())));
}

// ---------------------------------------------------------------------------
// Healing
// ---------------------------------------------------------------------------

#[test]
fn test_missing_field_heals_to_default() {
    let reg = registry();
    let schema = mesh(&reg);
    let mut doc = new_asset(schema, &reg).document;
    let CanonicalValue::Object(fields) = &mut doc else {
        panic!("document is not an object");
    };
    fields.shift_remove("position");

    let text = serialize_document(&doc, schema, &reg).unwrap();
    assert!(!text.contains("<position"));
    let loaded = parse_document(&text, schema, &reg).unwrap();
    assert!(loaded.was_altered);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("position"));
    assert_eq!(
        loaded.document.get("position"),
        Some(&CanonicalValue::Vector3(0.0, 0.0, 0.0))
    );
}

#[test]
fn test_vector3_with_four_components_heals() {
    let reg = registry();
    let schema = mesh(&reg);
    let mut root = rsd_core::XmlElement::parse(
        &serialize_document(&new_asset(schema, &reg).document, schema, &reg).unwrap(),
    )
    .unwrap();
    let position = root.children.iter_mut().find(|c| c.name == "position").unwrap();
    *position = rsd_core::XmlElement::new("position")
        .with_attribute("x", "1")
        .with_attribute("y", "2")
        .with_attribute("z", "3")
        .with_attribute("w", "4");

    let outcome = Binder::new(&reg).bind(&root, schema).unwrap();
    assert!(outcome.was_altered);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("position"));
    assert!(outcome.warnings[0].contains("Vector3"));
    assert_eq!(
        outcome.document.get("position"),
        Some(&CanonicalValue::Vector3(0.0, 0.0, 0.0))
    );
}

#[test]
fn test_unknown_enum_text_falls_back_to_first_value() {
    let reg = registry();
    let schema = mesh(&reg);
    let text = serialize_document(&new_asset(schema, &reg).document, schema, &reg)
        .unwrap()
        .replace("<topology>triangleList</topology>", "<topology>bogus</topology>");
    let outcome = parse_document(&text, schema, &reg).unwrap();
    assert!(outcome.was_altered);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("'bogus'"));
    assert_eq!(
        outcome.document.get("topology"),
        Some(&CanonicalValue::Enum("triangleList".into()))
    );
}

#[test]
fn test_enum_text_matches_case_insensitively() {
    let reg = registry();
    let schema = mesh(&reg);
    let text = serialize_document(&new_asset(schema, &reg).document, schema, &reg).unwrap();
    for spelling in ["LineList", "LINES", "line list", "1"] {
        let edited = text.replace(
            "<topology>triangleList</topology>",
            &format!("<topology>{spelling}</topology>"),
        );
        let outcome = parse_document(&edited, schema, &reg).unwrap();
        assert!(!outcome.was_altered, "{spelling}: {:?}", outcome.warnings);
        assert_eq!(
            outcome.document.get("topology"),
            Some(&CanonicalValue::Enum("lineList".into())),
            "{spelling}"
        );
    }
}

#[test]
fn test_bind_rejects_class_without_suffix() {
    let reg = registry();
    let part = reg.try_get_by_class_name("MeshPart").unwrap();
    let err = parse_document("<asset/>", part, &reg).unwrap_err();
    assert!(matches!(err, BindError::NotAnAssetSchema { .. }));
}

#[test]
fn test_malformed_document_is_error() {
    let reg = registry();
    let err = parse_document("<asset><name>x</asset>", mesh(&reg), &reg).unwrap_err();
    assert!(matches!(err, BindError::Xml(_)));
}

// ---------------------------------------------------------------------------
// Registry lookups
// ---------------------------------------------------------------------------

#[test]
fn test_suffix_lookup_is_normalized() {
    let reg = registry();
    let a = reg.try_get_by_suffix(".MESH").unwrap();
    let b = reg.try_get_by_suffix("mesh").unwrap();
    let c = reg.try_get_by_suffix(".mesh").unwrap();
    assert!(std::ptr::eq(a, b));
    assert!(std::ptr::eq(b, c));
    assert_eq!(a.class_name(), "Mesh");
    assert!(reg.try_get_by_suffix("").is_none());
    assert!(reg.try_get_by_suffix(".unknown").is_none());
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

fn part(name: &str, first: u64, visible: bool) -> CanonicalValue {
    object(vec![
        ("name", CanonicalValue::String(name.into())),
        ("firstIndex", CanonicalValue::UInt(first)),
        ("visible", CanonicalValue::Bool(visible)),
    ])
}

#[test]
fn test_array_of_objects_round_trips() {
    let reg = registry();
    let schema = mesh(&reg);
    let doc = default_with(
        &reg,
        schema,
        "parts",
        CanonicalValue::Array(vec![part("top", 0, true), part("bottom", 36, false)]),
    );
    let text = serialize_document(&doc, schema, &reg).unwrap();
    let root = XmlElement::parse(&text).unwrap();
    let parts = root.child("parts").unwrap();
    assert_eq!(parts.children.len(), 2);
    assert!(parts.children.iter().all(|item| item.name == "item"));

    let loaded = parse_document(&text, schema, &reg).unwrap();
    assert!(!loaded.was_altered, "{:?}", loaded.warnings);
    assert_eq!(loaded.document, doc);
}

#[test]
fn test_map_without_entry_shape_round_trips_when_empty() {
    let reg = SchemaRegistry::from_sources(vec![(
        "tally.rsd",
        r#"<rsd class_name="Tally" file_suffix=".tally">
             <field name="label" type="String"/>
             <field name="counts" type="Map" key="String" value="Int"/>
           </rsd>"#,
    )])
    .unwrap();
    let schema = reg.try_get_by_suffix(".tally").unwrap();
    let created = new_asset(schema, &reg);
    assert_eq!(created.document.get("counts"), Some(&CanonicalValue::empty_object()));

    let text = serialize_document(&created.document, schema, &reg).unwrap();
    assert!(text.contains("<counts/>"), "{text}");
    let loaded = parse_document(&text, schema, &reg).unwrap();
    assert!(!loaded.was_altered, "{:?}", loaded.warnings);
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.document, created.document);

    let filled = created
        .document
        .apply(&FieldPath::root().field("counts"), object(vec![("a", CanonicalValue::Int(1))]))
        .unwrap();
    assert!(serialize_document(&filled, schema, &reg).is_err());
}

#[test]
fn test_static_array_round_trips_at_declared_count() {
    let reg = registry();
    let schema = mesh(&reg);
    let lods = CanonicalValue::Array(vec![
        CanonicalValue::Float(1.0),
        CanonicalValue::Float(0.5),
        CanonicalValue::Float(0.125),
    ]);
    let doc = default_with(&reg, schema, "lods", lods);
    let loaded = round_trip(&reg, schema, &doc);
    assert!(!loaded.was_altered);
    assert_eq!(loaded.document, doc);
}

#[test]
fn test_float_map_round_trips() {
    let reg = registry();
    let schema = mesh(&reg);
    let params = object(vec![
        ("a", CanonicalValue::Float(1.5)),
        ("b", CanonicalValue::Float(-2.0)),
    ]);
    let doc = default_with(&reg, schema, "params", params.clone());
    let text = serialize_document(&doc, schema, &reg).unwrap();
    assert!(text.contains(r#"<float name="a" value="1.5"/>"#));
    let loaded = parse_document(&text, schema, &reg).unwrap();
    assert!(!loaded.was_altered);
    assert_eq!(loaded.document.get("params"), Some(&params));
}

#[test]
fn test_vector4_and_texture_maps_round_trip() {
    let reg = registry();
    let schema = mesh(&reg);
    let colors = object(vec![
        ("edge", CanonicalValue::Vector4(1.0, 0.0, 0.0, 1.0)),
        ("fill", CanonicalValue::Vector4(0.25, 0.5, 0.75, 0.5)),
    ]);
    let textures = object(vec![
        ("albedo", CanonicalValue::String("textures/a.png".into())),
        ("normal", CanonicalValue::String("textures/a_n.png".into())),
    ]);
    let doc = default_with(&reg, schema, "colors", colors.clone())
        .apply(&FieldPath::root().field("textures"), textures.clone())
        .unwrap();
    let text = serialize_document(&doc, schema, &reg).unwrap();
    assert!(text.contains(r#"<texture name="albedo" file="textures/a.png"/>"#));
    let loaded = parse_document(&text, schema, &reg).unwrap();
    assert!(!loaded.was_altered, "{:?}", loaded.warnings);
    assert_eq!(loaded.document.get("colors"), Some(&colors));
    assert_eq!(loaded.document.get("textures"), Some(&textures));
}

#[test]
fn test_enum_and_reference_arrays_round_trip() {
    let reg = registry();
    let material = reg.try_get_by_suffix(".material").unwrap();
    let doc = default_with(
        &reg,
        material,
        "textures",
        CanonicalValue::Array(vec![
            CanonicalValue::String("t/albedo.texture".into()),
            CanonicalValue::String("t/normal.texture".into()),
        ]),
    )
    .apply(
        &FieldPath::root().field("blend"),
        CanonicalValue::Enum("additive".into()),
    )
    .unwrap();
    let loaded = round_trip(&reg, material, &doc);
    assert!(!loaded.was_altered, "{:?}", loaded.warnings);
    assert_eq!(loaded.document, doc);
}

fn float_map() -> impl Strategy<Value = IndexMap<String, f64>> {
    prop::collection::vec(("[a-z][a-z0-9_]{0,8}", -1.0e6f64..1.0e6), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn float_maps_round_trip(entries in float_map()) {
        let reg = registry();
        let schema = mesh(&reg);
        let params = CanonicalValue::Object(
            entries.into_iter().map(|(k, v)| (k, CanonicalValue::Float(v))).collect(),
        );
        let doc = default_with(&reg, schema, "params", params.clone());
        let loaded = round_trip(&reg, schema, &doc);
        prop_assert!(!loaded.was_altered);
        prop_assert_eq!(loaded.document.get("params"), Some(&params));
    }
}
