//! Tests for CatalogService

use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use medhandout::application::services::CatalogService;
use medhandout::domain::CatalogSource;
use medhandout::infrastructure::traits::RealFileSystem;
use medhandout::util::testing::init_test_setup;

/// Helper to write a data file for testing
fn create_data_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("medications.json");
    std::fs::write(&path, content).expect("write data file");
    path
}

fn service() -> CatalogService {
    init_test_setup();
    CatalogService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_valid_data_file_when_loading_then_uses_its_entries() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_data_file(
        &temp,
        r#"[
  {"name": "Ibuprofen 200 mg", "image": "images/ibu.png", "aliases": ["Advil 200"]},
  {"name": "Lisinopril 10 mg", "image": "images/lis.png", "aliases": []}
]"#,
    );

    // Act
    let catalog = service().load(&path);

    // Assert
    assert_eq!(catalog.names(), vec!["Ibuprofen 200 mg", "Lisinopril 10 mg"]);
    assert_eq!(catalog.source(), &CatalogSource::DataFile(path));
    assert_eq!(
        catalog.find_med_by_name("ADVIL 200").map(|m| m.name.as_str()),
        Some("Ibuprofen 200 mg")
    );
}

#[test]
fn given_missing_data_file_when_loading_then_falls_back_to_built_in() {
    let temp = TempDir::new().unwrap();

    let catalog = service().load(&temp.path().join("nope.json"));

    assert_eq!(catalog.source(), &CatalogSource::BuiltIn);
    assert_eq!(catalog.len(), 3);
    assert!(catalog.find_med_by_name("Glucophage 500").is_some());
}

#[rstest]
#[case::not_json("this is not json")]
#[case::object(r#"{"name": "Ibuprofen 200 mg"}"#)]
#[case::missing_name(r#"[{"image": "x.png"}]"#)]
#[case::wrong_alias_type(r#"[{"name": "A", "aliases": "B"}]"#)]
fn given_malformed_data_file_when_loading_then_falls_back(#[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = create_data_file(&temp, content);

    let catalog = service().load(&path);

    assert_eq!(catalog.source(), &CatalogSource::BuiltIn);
    assert_eq!(catalog.len(), 3);
}

#[test]
fn given_empty_array_when_loading_then_catalog_is_empty() {
    let temp = TempDir::new().unwrap();
    let path = create_data_file(&temp, "[]");

    let catalog = service().load(&path);

    assert!(catalog.is_empty());
    assert!(matches!(catalog.source(), CatalogSource::DataFile(_)));
}
