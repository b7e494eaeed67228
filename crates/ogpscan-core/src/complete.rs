//! Field completion engine.
//!
//! Post-scan pass that derives or backfills fields not obtainable directly
//! from the catalogue. The phase order is load-bearing:
//!
//! 1. `last_modified` derivation from resource history;
//! 2. compliance flags computed from presence/format rules;
//! 3. org/boolean default fill for records still missing an owning org.
//!
//! Derivation and compliance must run before the default fill, since
//! compliance rules consult `org` presence. The default fill never
//! overwrites a value set by normalization or upsert.

use crate::models::DatasetRecord;
use crate::store::Inventory;

/// Formats considered open and machine-readable for the `open_formats`
/// compliance flag. Uppercased, compared against the resource's normalized
/// format label.
pub const OPEN_FORMATS: &[&str] = &[
    "CSV", "JSON", "JSONL", "GEOJSON", "XML", "RDF", "TTL", "NT", "KML", "KMZ", "GPKG", "SHP",
    "TXT", "ODS", "ODT", "NETCDF", "WMS", "WFS", "API",
];

/// Both official languages must be covered for `official_langs` compliance.
const OFFICIAL_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Runs the completion pass over every dataset in the inventory.
///
/// Each rule is pure and total over the record: compliance flags come out
/// `Some(true)` or `Some(false)` even when inputs are missing (absence of
/// evidence counts as non-compliant, not unknown). `last_modified` may stay
/// `None` only when neither the dataset nor any of its resources carries a
/// date.
pub fn complete_missing_fields(inventory: &mut Inventory) {
    let ids: Vec<String> = inventory.datasets().map(|d| d.id.clone()).collect();

    for id in ids {
        let resources = inventory.resources_for(&id);

        let derived_modified = resources.iter().filter_map(|r| r.last_modified).max();
        let open_formats = resources.iter().any(|r| {
            r.format
                .as_deref()
                .is_some_and(|f| OPEN_FORMATS.contains(&f))
        });
        let official_langs = OFFICIAL_LANGUAGES.iter().all(|lang| {
            resources
                .iter()
                .any(|r| r.languages.iter().any(|l| l == lang))
        });

        // resources_for borrows the inventory; re-borrow mutably per dataset.
        if let Some(dataset) = inventory.datasets_mut().find(|d| d.id == id) {
            if dataset.last_modified.is_none() {
                dataset.last_modified = derived_modified;
            }
            dataset.open_formats = Some(open_formats);
            dataset.official_langs = Some(official_langs);
        }
    }
}

/// Final fallback: defaults `org`, `org_title` and `on_registry` from the
/// scan's target department where still missing.
///
/// Applied last, after [`complete_missing_fields`]; never overwrites a
/// value already set.
pub fn fill_org_defaults(inventory: &mut Inventory, department: &str) {
    for dataset in inventory.datasets_mut() {
        fill_dataset_defaults(dataset, department);
    }
}

fn fill_dataset_defaults(dataset: &mut DatasetRecord, department: &str) {
    if dataset.org.is_none() {
        dataset.org = Some(department.to_string());
    }
    if dataset.org_title.is_none() {
        dataset.org_title = Some(department.to_string());
    }
    if dataset.on_registry.is_none() {
        dataset.on_registry = Some(false);
    }
}
