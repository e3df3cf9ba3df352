//! Integration tests for the JSON catalog store
//!
//! Run with: cargo test --test catalog_store_test

mod common;

use catalogbot::core::StorageError;
use catalogbot::storage::{Catalog, CatalogStore, ImageTarget};
use common::{TestEnvironment, TEST_USER};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[tokio::test]
async fn test_save_of_load_reproduces_catalog() {
    let env = TestEnvironment::new().await;
    env.add_category(TEST_USER, "Animals").await;
    env.add_category(TEST_USER, "Plants").await;
    env.add_image(TEST_USER, "imgA", Some("Animals:Cats")).await;
    env.add_image(TEST_USER, "imgB", Some("Animals:Dogs")).await;
    let store = env.navigator.store();

    let loaded = store.load().await.unwrap();
    store.save(&loaded).await.unwrap();

    assert_eq!(store.load().await.unwrap(), loaded);
}

#[tokio::test]
async fn test_document_written_by_older_deployment_is_readable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("categories.json");
    std::fs::write(
        &path,
        r#"{
    "Animals": {
        "Cats": [
            "AgACAgIAAxkBAAIBZ2Y",
            "AgACAgIAAxkBAAIBaGY"
        ]
    },
    "Café": {}
}"#,
    )
    .unwrap();

    let store = CatalogStore::open(&path).await.unwrap();
    let catalog = store.load().await.unwrap();

    assert_eq!(
        catalog.images("Animals", "Cats"),
        ["AgACAgIAAxkBAAIBZ2Y", "AgACAgIAAxkBAAIBaGY"]
    );
    assert!(catalog.contains_category("Café"));
}

#[tokio::test]
async fn test_wrong_shape_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("categories.json");
    std::fs::write(&path, r#"{"Animals": {"Cats": "not-a-list"}}"#).unwrap();

    let store = CatalogStore::open(&path).await.unwrap();

    assert!(matches!(store.load().await, Err(StorageError::Json { .. })));
}

#[tokio::test]
async fn test_unwritable_location_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-dir").join("categories.json");

    let result = CatalogStore::open(&path).await;

    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test]
async fn test_saved_document_is_plain_json_tree() {
    let env = TestEnvironment::new().await;
    let mut catalog = Catalog::new();
    catalog.add_category("Animals").unwrap();
    catalog
        .file_image(&ImageTarget::parse("Animals:Cats").unwrap(), "imgA".to_string())
        .unwrap();

    env.navigator.store().save(&catalog).await.unwrap();

    let raw = std::fs::read_to_string(env.catalog_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!({ "Animals": { "Cats": ["imgA"] } }));
}
