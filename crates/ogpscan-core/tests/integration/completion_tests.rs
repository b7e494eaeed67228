//! Integration tests for the field completion phase on scanned inventories.
//!
//! Unit tests in `complete.rs` cover single rules; these verify the whole
//! scan-then-complete ordering over a mock catalogue.

use crate::integration::common::{MockCatalogueClient, TEST_REGISTRY_URL};
use ogpscan_core::traits::CatalogueClient;
use ogpscan_core::{complete_missing_fields, fill_org_defaults, Inventory};

/// Completion after a scan derives dates, computes compliance, and fills
/// org defaults without touching anything the catalogue already supplied.
#[tokio::test]
async fn test_completion_after_scan() {
    let client = MockCatalogueClient::new()
        .with_package(
            r#"{
                "id": "d1",
                "title": "Air Quality",
                "organization": {"name": "eccc", "title": "Environment and Climate Change Canada"},
                "resources": [
                    {"id": "r1", "format": "CSV", "language": ["en", "fr"],
                     "last_modified": "2024-03-01T08:00:00"},
                    {"id": "r2", "format": "PDF", "language": ["en"],
                     "last_modified": "2024-01-15T08:00:00"}
                ]
            }"#,
        )
        .with_package(r#"{"id": "d2", "title": "Bare dataset"}"#);

    let ids = client.search_datasets("eccc").await.unwrap();
    let mut inventory = Inventory::new();
    inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    complete_missing_fields(&mut inventory);
    fill_org_defaults(&mut inventory, "Environment and Climate Change Canada");

    let d1 = inventory.get_dataset("d1").unwrap();
    // Derived from the newest resource, since the catalogue gave no date.
    assert_eq!(
        d1.last_modified.unwrap().format("%Y-%m-%d").to_string(),
        "2024-03-01"
    );
    assert_eq!(d1.open_formats, Some(true));
    assert_eq!(d1.official_langs, Some(true));
    // Scanned records keep their catalogue-provided org, not the default.
    assert_eq!(d1.org.as_deref(), Some("eccc"));
    assert_eq!(d1.on_registry, Some(true));

    let d2 = inventory.get_dataset("d2").unwrap();
    assert_eq!(d2.open_formats, Some(false));
    assert_eq!(d2.official_langs, Some(false));
    assert_eq!(
        d2.org.as_deref(),
        Some("Environment and Climate Change Canada")
    );
    // A scanned dataset stays on_registry=true even through the default fill.
    assert_eq!(d2.on_registry, Some(true));
}

/// Completion run twice is a no-op the second time.
#[tokio::test]
async fn test_completion_is_idempotent() {
    let client = MockCatalogueClient::new().with_package(
        r#"{
            "id": "d1",
            "resources": [{"id": "r1", "format": "CSV",
                           "last_modified": "2023-01-01T00:00:00"}]
        }"#,
    );

    let ids = client.search_datasets("org").await.unwrap();
    let mut inventory = Inventory::new();
    inventory
        .inventory(&client, TEST_REGISTRY_URL, &ids)
        .await
        .unwrap();

    complete_missing_fields(&mut inventory);
    fill_org_defaults(&mut inventory, "Health Canada");
    let first: Vec<_> = inventory.datasets().cloned().collect();

    complete_missing_fields(&mut inventory);
    fill_org_defaults(&mut inventory, "Health Canada");
    let second: Vec<_> = inventory.datasets().cloned().collect();

    assert_eq!(first, second);
}
