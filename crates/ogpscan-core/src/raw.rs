//! Wire DTOs for CKAN catalogue responses.
//!
//! These structs mirror the subset of the CKAN `package_show` result that
//! normalization consumes. Every recognized field is optional so that a
//! partially broken record still deserializes; everything unrecognized lands
//! in the `extras` map via `#[serde(flatten)]`, keeping the shapes
//! forward-compatible with catalogue schema drift.
//!
//! CKAN API reference: <https://docs.ckan.org/en/2.9/api/>

use serde::Deserialize;
use serde_json::Value;

/// Raw dataset record as returned by the CKAN `package_show` API.
///
/// # Examples
///
/// ```
/// use ogpscan_core::raw::RawPackage;
///
/// let json = r#"{
///     "id": "dataset-123",
///     "title": "Crop Yields 2023",
///     "organization": {"name": "aafc", "title": "Agriculture and Agri-Food Canada"},
///     "metadata_modified": "2023-06-01T12:00:00",
///     "resources": [{"id": "res-1", "format": "CSV"}]
/// }"#;
///
/// let pkg: RawPackage = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.id, "dataset-123");
/// assert_eq!(pkg.resources.len(), 1);
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct RawPackage {
    /// Unique identifier for the dataset.
    pub id: String,
    /// Human-readable title.
    pub title: Option<String>,
    /// URL-friendly name/slug of the dataset.
    pub name: Option<String>,
    /// Owning organization block.
    pub organization: Option<RawOrganization>,
    /// Last metadata modification timestamp (zone-less ISO 8601 string).
    pub metadata_modified: Option<Value>,
    /// Published contact address.
    pub maintainer_email: Option<String>,
    /// Attached downloadable resources.
    #[serde(default)]
    pub resources: Vec<RawResource>,
    /// All other fields returned by the catalogue.
    #[serde(flatten)]
    pub extras: serde_json::Map<String, Value>,
}

/// Organization block embedded in a raw dataset record.
#[derive(Deserialize, Debug, Clone)]
pub struct RawOrganization {
    /// Machine name of the organization.
    pub name: Option<String>,
    /// Display title of the organization.
    pub title: Option<String>,
    #[serde(flatten)]
    pub extras: serde_json::Map<String, Value>,
}

/// Raw resource record embedded in a dataset.
///
/// CKAN portals are notoriously loose here: `size` may be a number, a numeric
/// string, an empty string, or null; `language` may be a string or a list.
/// The loose fields are kept as [`Value`] and coerced during normalization.
#[derive(Deserialize, Debug, Clone)]
pub struct RawResource {
    /// Unique identifier of the resource. Records without one are dropped
    /// during normalization with a data-quality warning.
    pub id: Option<String>,
    /// Resource title.
    pub name: Option<String>,
    /// File format label.
    pub format: Option<String>,
    /// Download URL.
    pub url: Option<String>,
    /// Size in bytes; number, numeric string, empty string, or null.
    pub size: Option<Value>,
    /// Language code(s); string or list of strings.
    pub language: Option<Value>,
    /// Last modification of the artifact itself.
    pub last_modified: Option<Value>,
    /// Last modification of the resource metadata. Fallback for
    /// `last_modified`.
    pub metadata_modified: Option<Value>,
    #[serde(flatten)]
    pub extras: serde_json::Map<String, Value>,
}
