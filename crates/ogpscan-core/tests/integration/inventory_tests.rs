//! Integration tests for the inventory pipeline.
//!
//! These tests drive `Inventory::inventory` end to end against mock
//! catalogue clients: listing, fetching, normalization and upserts.

use crate::integration::common::{
    MockCatalogueClient, UnreachableCatalogueClient, TEST_REGISTRY_URL,
};
use ogpscan_core::traits::CatalogueClient;
use ogpscan_core::{AppError, Inventory};

/// A dataset that vanishes between listing and detail fetch is skipped,
/// recorded as an omission, and never aborts the scan.
///
/// Catalogue state: dataset d1 (two resources) fetchable, dataset d2 listed
/// but gone. The resulting tables carry exactly one dataset row and two
/// resource rows.
#[tokio::test]
async fn test_vanished_dataset_is_skipped_not_fatal() {
    let client = MockCatalogueClient::new()
        .with_package(
            r#"{
                "id": "d1",
                "title": "Pesticide Residue Monitoring",
                "organization": {"name": "hc-sc", "title": "Health Canada"},
                "resources": [
                    {"id": "r1", "format": "CSV", "language": ["en"]},
                    {"id": "r2", "format": "PDF", "language": ["fr"]}
                ]
            }"#,
        )
        .with_gone("d2");

    let ids = client.search_datasets("health-canada").await.unwrap();
    assert_eq!(ids.len(), 2);

    let mut inventory = Inventory::new();
    let stats = inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    assert_eq!(stats.created, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(inventory.dataset_count(), 1);
    assert_eq!(inventory.resource_count(), 2);
    assert_eq!(inventory.skipped_ids(), &["d2".to_string()]);
}

/// Running the same scan twice yields identical tables: dedup by id plus
/// the never-regress merge make the pipeline idempotent.
#[tokio::test]
async fn test_scanning_twice_is_idempotent() {
    let client = MockCatalogueClient::new().with_package(
        r#"{
            "id": "d1",
            "title": "Crop Yields",
            "metadata_modified": "2023-06-01T12:00:00",
            "resources": [{"id": "r1", "format": "CSV"}]
        }"#,
    );

    let ids = client.search_datasets("aafc").await.unwrap();
    let mut inventory = Inventory::new();

    inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();
    let first_datasets: Vec<_> = inventory.datasets().cloned().collect();
    let first_resources: Vec<_> = inventory.resources().cloned().collect();

    let stats = inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    assert_eq!(stats.updated, 1);
    assert_eq!(stats.created, 0);
    let second_datasets: Vec<_> = inventory.datasets().cloned().collect();
    let second_resources: Vec<_> = inventory.resources().cloned().collect();
    assert_eq!(first_datasets, second_datasets);
    assert_eq!(first_resources, second_resources);
}

/// Every resource row references a dataset row present in the same
/// inventory; no orphan ever survives a scan.
#[tokio::test]
async fn test_referential_integrity() {
    let client = MockCatalogueClient::new()
        .with_package(
            r#"{"id": "d1", "resources": [{"id": "r1"}, {"id": "r2"}]}"#,
        )
        .with_package(r#"{"id": "d2", "resources": [{"id": "r3"}]}"#);

    let ids = client.search_datasets("org").await.unwrap();
    let mut inventory = Inventory::new();
    inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    for resource in inventory.resources() {
        assert!(
            inventory.get_dataset(&resource.dataset_id).is_some(),
            "resource {} references missing dataset {}",
            resource.id,
            resource.dataset_id
        );
    }
}

/// A per-id client error is counted as failed and the scan continues with
/// the remaining ids.
#[tokio::test]
async fn test_per_dataset_failure_does_not_abort_batch() {
    let client = MockCatalogueClient::new()
        .with_broken("d1")
        .with_package(r#"{"id": "d2", "title": "Still here"}"#);

    let ids = client.search_datasets("org").await.unwrap();
    let mut inventory = Inventory::new();
    let stats = inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.created, 1);
    assert!(inventory.get_dataset("d2").is_some());
}

/// An unreachable catalogue is fatal: the error propagates instead of
/// producing a silently empty inventory.
#[tokio::test]
async fn test_unreachable_catalogue_is_fatal() {
    let client = UnreachableCatalogueClient;
    let mut inventory = Inventory::new();
    let ids = vec!["d1".to_string()];

    let result = inventory.inventory(&client, TEST_REGISTRY_URL, &ids).await;
    assert!(matches!(result, Err(AppError::RemoteUnavailable(_))));
    assert_eq!(inventory.dataset_count(), 0);
}

/// Malformed raw fields (here an unparseable date) surface as data-quality
/// warnings on the inventory, not as errors.
#[tokio::test]
async fn test_data_quality_warnings_are_collected() {
    let client = MockCatalogueClient::new().with_package(
        r#"{"id": "d1", "metadata_modified": "sometime last week"}"#,
    );

    let ids = client.search_datasets("org").await.unwrap();
    let mut inventory = Inventory::new();
    inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    assert_eq!(inventory.warnings().len(), 1);
    assert_eq!(inventory.warnings()[0].dataset_id, "d1");
    assert!(inventory.get_dataset("d1").unwrap().last_modified.is_none());
}
