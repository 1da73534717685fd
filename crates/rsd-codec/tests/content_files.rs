//! Integration test: load, heal, edit, and save real asset files.
//!
//! Works on the documents under `tests/fixtures/content`, copying them
//! into a temporary directory before anything is written.

use std::fs;
use std::path::{Path, PathBuf};

use rsd_codec::{load_asset, new_asset, save_asset, BindError, EditError, EditSession};
use rsd_core::{CanonicalValue, FieldPath};
use rsd_schema::SchemaRegistry;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::load_from_dir(fixtures().join("rsd")).unwrap()
}

fn content(name: &str) -> PathBuf {
    fixtures().join("content").join(name)
}

fn copy_to(dir: &Path, name: &str) -> PathBuf {
    let dest = dir.join(name);
    fs::copy(content(name), &dest).unwrap();
    dest
}

fn path(s: &str) -> FieldPath {
    s.parse().unwrap()
}

#[test]
fn test_clean_document_binds_without_warnings() {
    let reg = registry();
    let loaded = load_asset(&content("cube.mesh"), &reg).unwrap();
    assert_eq!(loaded.schema.class_name(), "Mesh");
    let out = &loaded.outcome;
    assert!(!out.was_altered, "{:?}", out.warnings);
    assert!(out.warnings.is_empty());

    let doc = &out.document;
    assert_eq!(doc.get("name"), Some(&CanonicalValue::String("cube".into())));
    assert_eq!(doc.get("topology"), Some(&CanonicalValue::Enum("lineList".into())));
    assert_eq!(doc.get("position"), Some(&CanonicalValue::Vector3(1.0, 2.0, 3.0)));
    assert_eq!(doc.get("tint"), Some(&CanonicalValue::Vector4(1.0, 0.5, 0.25, 1.0)));
    assert_eq!(
        doc.lookup(&path("parts[1].firstIndex")),
        Some(&CanonicalValue::UInt(36))
    );
    assert_eq!(
        doc.lookup(&path("parts[1].visible")),
        Some(&CanonicalValue::Bool(false))
    );
    assert_eq!(
        doc.get("lods"),
        Some(&CanonicalValue::Array(vec![
            CanonicalValue::Float(1.0),
            CanonicalValue::Float(0.5),
            CanonicalValue::Float(0.25),
        ]))
    );
    assert_eq!(
        doc.lookup(&path(r#"params["metallic"]"#)),
        Some(&CanonicalValue::Float(1.0))
    );
    assert_eq!(
        doc.lookup(&path(r#"colors["edge"]"#)),
        Some(&CanonicalValue::Vector4(1.0, 0.0, 0.0, 1.0))
    );
    assert_eq!(
        doc.lookup(&path(r#"textures["albedo"]"#)),
        Some(&CanonicalValue::String("textures/cube_albedo.png".into()))
    );
    assert_eq!(
        doc.lookup(&path("tags[1]")),
        Some(&CanonicalValue::String("debug".into()))
    );
    assert_eq!(
        doc.get("modes"),
        Some(&CanonicalValue::Array(vec![
            CanonicalValue::Enum("triangleList".into()),
            CanonicalValue::Enum("lineList".into()),
        ]))
    );
}

#[test]
fn test_legacy_schema_document() {
    let reg = registry();
    let loaded = load_asset(&content("main.camera"), &reg).unwrap();
    assert_eq!(loaded.schema.class_name(), "Camera");
    assert!(!loaded.outcome.was_altered);
    assert_eq!(
        loaded.outcome.document.get("position"),
        Some(&CanonicalValue::Vector3(0.0, 5.0, -10.0))
    );
    assert_eq!(
        loaded.outcome.document.get("orthographic"),
        Some(&CanonicalValue::Bool(false))
    );
}

#[test]
fn test_broken_document_is_healed() {
    let reg = registry();
    let loaded = load_asset(&content("broken.mesh"), &reg).unwrap();
    let out = &loaded.outcome;
    assert!(out.was_altered);

    let has = |needle: &str| out.warnings.iter().any(|w| w.contains(needle));
    assert!(has("topology, expected Enum<Topology>, got 'bogus'"), "{:?}", out.warnings);
    assert!(has("position, expected Vector3"));
    assert!(has("parts[0].firstIndex"));
    assert!(has("parts[0].visible"));
    assert!(has("lods, expected StaticArray<Float, 3>, got '1 items'"));
    assert!(has("map entries without key: params"));
    assert!(has("key 'a'"));
    assert!(has("field missing: tint"));
    assert!(has("field missing: modes"));

    let doc = &out.document;
    assert_eq!(doc.get("name"), Some(&CanonicalValue::String("broken".into())));
    assert_eq!(doc.get("topology"), Some(&CanonicalValue::Enum("triangleList".into())));
    assert_eq!(doc.get("position"), Some(&CanonicalValue::Vector3(0.0, 0.0, 0.0)));
    assert_eq!(doc.lookup(&path("parts[0].name")), Some(&CanonicalValue::String("only".into())));
    assert_eq!(doc.lookup(&path("parts[0].firstIndex")), Some(&CanonicalValue::UInt(0)));
    assert_eq!(doc.get("lods"), Some(&CanonicalValue::Array(vec![])));
    assert_eq!(doc.lookup(&path(r#"params["a"]"#)), Some(&CanonicalValue::Float(2.0)));
    assert_eq!(doc.get("params").and_then(CanonicalValue::as_object).map(|m| m.len()), Some(1));
}

#[test]
fn test_healed_document_saves_clean() {
    let reg = registry();
    let tmp = tempfile::tempdir().unwrap();
    let file = copy_to(tmp.path(), "broken.mesh");

    let loaded = load_asset(&file, &reg).unwrap();
    assert!(loaded.outcome.was_altered);
    save_asset(&file, &loaded.outcome.document, loaded.schema, &reg).unwrap();

    let text = fs::read_to_string(&file).unwrap();
    assert!(text.starts_with(r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>"#));
    assert!(text.contains("<asset>"));

    let reloaded = load_asset(&file, &reg).unwrap();
    assert!(!reloaded.outcome.was_altered, "{:?}", reloaded.outcome.warnings);
    assert_eq!(reloaded.outcome.document, loaded.outcome.document);
}

#[test]
fn test_resave_keeps_schema_order() {
    let reg = registry();
    let tmp = tempfile::tempdir().unwrap();
    let file = copy_to(tmp.path(), "cube.mesh");
    let loaded = load_asset(&file, &reg).unwrap();
    save_asset(&file, &loaded.outcome.document, loaded.schema, &reg).unwrap();
    let first = fs::read_to_string(&file).unwrap();

    let again = load_asset(&file, &reg).unwrap();
    save_asset(&file, &again.outcome.document, again.schema, &reg).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), first);

    let name_at = first.find("<name>cube</name>").unwrap();
    let modes_at = first.find("<modes>").unwrap();
    assert!(name_at < modes_at);
}

#[test]
fn test_load_errors() {
    let reg = registry();
    let tmp = tempfile::tempdir().unwrap();

    let unknown = tmp.path().join("thing.unknown");
    fs::write(&unknown, "<asset/>").unwrap();
    let err = load_asset(&unknown, &reg).unwrap_err();
    assert!(matches!(err, BindError::NoSchemaForSuffix { ref suffix, .. } if suffix == "unknown"));

    let err = load_asset(&tmp.path().join("absent.mesh"), &reg).unwrap_err();
    assert!(matches!(err, BindError::Xml(_)));
}

#[test]
fn test_new_asset_saved_and_loaded() {
    let reg = registry();
    let tmp = tempfile::tempdir().unwrap();
    let camera = reg.try_get_by_suffix("camera").unwrap();
    let created = new_asset(camera, &reg);
    let file = tmp.path().join("fresh.CAMERA");
    save_asset(&file, &created.document, camera, &reg).unwrap();

    let loaded = load_asset(&file, &reg).unwrap();
    assert!(!loaded.outcome.was_altered);
    assert_eq!(loaded.outcome.document, created.document);
}

#[test]
fn test_edit_session_open_apply_save() {
    let reg = registry();
    let tmp = tempfile::tempdir().unwrap();
    let file = copy_to(tmp.path(), "cube.mesh");

    let mut session = EditSession::open(&file, &reg).unwrap();
    assert!(!session.is_dirty());
    session
        .apply(&path("name"), CanonicalValue::String("renamed".into()))
        .unwrap();
    let top = session.document().lookup(&path("parts[0]")).unwrap().clone();
    session.apply(&path("parts[2]"), top).unwrap();
    session
        .apply(&path(r#"colors["fill"]"#), CanonicalValue::Vector4(0.0, 1.0, 0.0, 1.0))
        .unwrap();
    assert!(session.is_dirty());

    let err = session
        .apply(&path("lods[3]"), CanonicalValue::Float(0.1))
        .unwrap_err();
    assert!(matches!(err, EditError::Incompatible { .. }));

    session.save(&file).unwrap();
    assert!(!session.is_dirty());

    let reopened = EditSession::open(&file, &reg).unwrap();
    assert!(!reopened.is_dirty());
    assert_eq!(reopened.document(), session.document());
    assert_eq!(
        reopened.document().lookup(&path("parts[2].name")),
        Some(&CanonicalValue::String("top".into()))
    );
}

#[test]
fn test_edit_session_on_healed_file_starts_dirty() {
    let reg = registry();
    let session = EditSession::open(&content("broken.mesh"), &reg).unwrap();
    assert!(session.is_dirty());
    assert!(!session.warnings().is_empty());
}
