//! Normalized domain models for the two-table inventory.
//!
//! The inventory is relational: one [`DatasetRecord`] row per catalogue
//! dataset, one [`ResourceRecord`] row per downloadable artifact, linked by
//! `ResourceRecord::dataset_id`.
//!
//! # Missing fields
//!
//! Every field the catalogue may omit is an `Option`. `None` is the explicit
//! "missing" marker: normalization never substitutes an empty string or a
//! guessed default, and `None` is never conflated with a legitimate falsy
//! value. Defaulting is the field completion engine's sole responsibility
//! (see [`crate::complete`]).

use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the datasets inventory table.
///
/// Created by [`crate::normalize::normalize`] from a raw catalogue record,
/// merged into the store by [`crate::store::Inventory`], and mutated only by
/// the field completion engine afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRecord {
    /// Catalogue-assigned unique identifier. Immutable once created.
    pub id: String,
    /// Human-readable title.
    pub title: Option<String>,
    /// Owning organization machine name.
    pub org: Option<String>,
    /// Owning organization display name.
    pub org_title: Option<String>,
    /// Whether this dataset was found via the registry scan (vs. inferred).
    pub on_registry: Option<bool>,
    /// Contact address published with the dataset.
    pub maintainer_email: Option<String>,
    /// Landing page URL on the registry.
    pub registry_link: Option<String>,
    /// Last modification timestamp. Derived from resources when the
    /// catalogue doesn't supply one.
    pub last_modified: Option<NaiveDateTime>,
    /// Compliance: at least one resource in an open, machine-readable format.
    pub open_formats: Option<bool>,
    /// Compliance: resources cover both official languages (en and fr).
    pub official_langs: Option<bool>,
}

impl DatasetRecord {
    /// Creates an empty record for the given id with every other field missing.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            org: None,
            org_title: None,
            on_registry: None,
            maintainer_email: None,
            registry_link: None,
            last_modified: None,
            open_formats: None,
            official_langs: None,
        }
    }

    /// Merges a newer record into this one, field by field.
    ///
    /// Non-missing fields of `newer` overwrite the corresponding fields here;
    /// a `None` in `newer` never clobbers a present value. The id is the
    /// merge key and is not touched.
    pub fn merge_from(&mut self, newer: DatasetRecord) {
        debug_assert_eq!(self.id, newer.id);
        merge_field(&mut self.title, newer.title);
        merge_field(&mut self.org, newer.org);
        merge_field(&mut self.org_title, newer.org_title);
        merge_field(&mut self.on_registry, newer.on_registry);
        merge_field(&mut self.maintainer_email, newer.maintainer_email);
        merge_field(&mut self.registry_link, newer.registry_link);
        merge_field(&mut self.last_modified, newer.last_modified);
        merge_field(&mut self.open_formats, newer.open_formats);
        merge_field(&mut self.official_langs, newer.official_langs);
    }
}

/// One row of the resources inventory table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRecord {
    /// Catalogue-assigned resource identifier. Unique key.
    pub id: String,
    /// Id of the owning dataset. Must exist in the same inventory.
    pub dataset_id: String,
    /// Resource title.
    pub title: Option<String>,
    /// File format, uppercased (e.g. `CSV`, `PDF`).
    pub format: Option<String>,
    /// Download URL.
    pub url: Option<String>,
    /// Size in bytes, when the catalogue reports one.
    pub size: Option<u64>,
    /// Language codes, lowercased (e.g. `en`, `fr`). Empty when unreported.
    pub languages: Vec<String>,
    /// Last modification timestamp of the artifact.
    pub last_modified: Option<NaiveDateTime>,
}

impl ResourceRecord {
    /// Creates an empty record linked to `dataset_id`.
    pub fn new(id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dataset_id: dataset_id.into(),
            title: None,
            format: None,
            url: None,
            size: None,
            languages: Vec::new(),
            last_modified: None,
        }
    }

    /// Merges a newer record into this one under the same policy as
    /// [`DatasetRecord::merge_from`].
    pub fn merge_from(&mut self, newer: ResourceRecord) {
        debug_assert_eq!(self.id, newer.id);
        self.dataset_id = newer.dataset_id;
        merge_field(&mut self.title, newer.title);
        merge_field(&mut self.format, newer.format);
        merge_field(&mut self.url, newer.url);
        merge_field(&mut self.size, newer.size);
        if !newer.languages.is_empty() {
            self.languages = newer.languages;
        }
        merge_field(&mut self.last_modified, newer.last_modified);
    }
}

/// A recoverable data-quality issue found during normalization.
///
/// Raised when a raw field is present but malformed (unparseable date,
/// negative size). The offending field is normalized to missing and the
/// warning is collected by the store for later reporting; it never aborts
/// the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQualityWarning {
    /// The dataset the malformed field belongs to.
    pub dataset_id: String,
    /// The raw field name, e.g. `metadata_modified` or `resources[2].size`.
    pub field: String,
    /// What was wrong with the value.
    pub detail: String,
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.dataset_id, self.field, self.detail)
    }
}

fn merge_field<T>(current: &mut Option<T>, newer: Option<T>) {
    if newer.is_some() {
        *current = newer;
    }
}
