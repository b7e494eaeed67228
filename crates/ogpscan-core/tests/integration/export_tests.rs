//! Integration tests for exporting a scanned, completed inventory.

use crate::integration::common::{MockCatalogueClient, TEST_REGISTRY_URL};
use ogpscan_core::export::{
    export_datasets, export_resources, LATEST_DATASETS_FILENAME, LATEST_RESOURCES_FILENAME,
};
use ogpscan_core::traits::CatalogueClient;
use ogpscan_core::{complete_missing_fields, fill_org_defaults, Inventory};

async fn scanned_inventory() -> Inventory {
    let client = MockCatalogueClient::new().with_package(
        r#"{
            "id": "d1",
            "name": "crop-yields",
            "title": "Crop Yields 2023",
            "organization": {"name": "aafc", "title": "Agriculture and Agri-Food Canada"},
            "metadata_modified": "2023-06-01T12:00:00",
            "resources": [
                {"id": "r1", "name": "Yields CSV", "format": "CSV", "size": 1024,
                 "language": ["en", "fr"], "last_modified": "2023-06-01T11:00:00"}
            ]
        }"#,
    );

    let ids = client.search_datasets("aafc").await.unwrap();
    let mut inventory = Inventory::new();
    inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();
    complete_missing_fields(&mut inventory);
    fill_org_defaults(&mut inventory, "Agriculture and Agri-Food Canada");
    inventory
}

/// Both tables export with the expected headers and one row per record.
#[tokio::test]
async fn test_export_scanned_inventory() {
    let inventory = scanned_inventory().await;
    let dir = tempfile::tempdir().unwrap();

    let datasets_path = export_datasets(&inventory, dir.path(), "datasets.csv").unwrap();
    let resources_path = export_resources(&inventory, dir.path(), "resources.csv").unwrap();

    let datasets = std::fs::read_to_string(datasets_path).unwrap();
    assert_eq!(datasets.lines().count(), 2, "header plus one dataset row");
    assert!(datasets.contains("Crop Yields 2023"));
    assert!(datasets.contains("https://registry.test.example/data/en/dataset/crop-yields"));
    assert!(datasets.contains("true")); // on_registry and compliance flags

    let resources = std::fs::read_to_string(resources_path).unwrap();
    assert_eq!(resources.lines().count(), 2);
    assert!(resources.contains("en;fr"));
    assert!(resources.contains("1024"));
}

/// The latest aliases always reflect the most recent run, independent of
/// any timestamped snapshots written alongside them.
#[tokio::test]
async fn test_latest_aliases_are_stable_names() {
    let inventory = scanned_inventory().await;
    let dir = tempfile::tempdir().unwrap();

    export_datasets(&inventory, dir.path(), "2023-06-01_datasets_inventory.csv").unwrap();
    export_datasets(&inventory, dir.path(), LATEST_DATASETS_FILENAME).unwrap();
    export_resources(&inventory, dir.path(), LATEST_RESOURCES_FILENAME).unwrap();

    assert!(dir.path().join("2023-06-01_datasets_inventory.csv").exists());
    assert!(dir.path().join(LATEST_DATASETS_FILENAME).exists());
    assert!(dir.path().join(LATEST_RESOURCES_FILENAME).exists());

    let snapshot =
        std::fs::read_to_string(dir.path().join("2023-06-01_datasets_inventory.csv")).unwrap();
    let latest = std::fs::read_to_string(dir.path().join(LATEST_DATASETS_FILENAME)).unwrap();
    assert_eq!(snapshot, latest);
}

/// An empty inventory still exports valid tables with headers only.
#[tokio::test]
async fn test_export_empty_inventory() {
    let inventory = Inventory::new();
    let dir = tempfile::tempdir().unwrap();

    let path = export_datasets(&inventory, dir.path(), LATEST_DATASETS_FILENAME).unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content.lines().count(), 1, "header only");
}
