use serde_json::{json, Value};
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = workspace_root()
        .join("marketplace_api/tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn category_validator() -> jsonschema::Validator {
    let path = workspace_root().join("schema/category.schema.json");
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    let schema: Value = serde_json::from_str(&text).expect("schema is valid JSON");
    jsonschema::draft202012::new(&schema).expect("category schema compiles")
}

#[test]
fn test_categories_fixture_conforms_to_schema() {
    let fixture = load_fixture("categories.json");
    let validator = category_validator();
    if let Err(e) = validator.validate(&fixture["data"]) {
        panic!("categories fixture failed validation: {e}");
    }
}

#[test]
fn test_hierarchy_fixture_conforms_to_schema() {
    let fixture = load_fixture("hierarchy.json");
    let validator = category_validator();
    if let Err(e) = validator.validate(&fixture["data"]) {
        panic!("hierarchy fixture failed validation: {e}");
    }
}

#[test]
fn test_single_category_fixture_conforms_to_schema() {
    let fixture = load_fixture("category.json");
    let validator = category_validator();
    let data = json!([fixture["data"].clone()]);
    if let Err(e) = validator.validate(&data) {
        panic!("category fixture failed validation: {e}");
    }
}

#[test]
fn test_schema_rejects_missing_name() {
    let validator = category_validator();
    assert!(!validator.is_valid(&json!([{ "id": 1 }])));
}

#[test]
fn test_schema_rejects_unknown_gender() {
    let validator = category_validator();
    assert!(!validator.is_valid(&json!([{ "id": 1, "name": "Jouets", "gender": "unisex" }])));
}

#[test]
fn test_schema_rejects_additional_properties() {
    let validator = category_validator();
    assert!(!validator.is_valid(&json!([{ "id": 1, "name": "Jouets", "slug": "jouets" }])));
}

#[test]
fn test_empty_array_conforms() {
    assert!(category_validator().is_valid(&json!([])));
}
