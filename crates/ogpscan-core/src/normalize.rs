//! Record normalization: raw catalogue records into the two-table model.
//!
//! The mapping is fixed and total: every recognized raw field maps to exactly
//! one model field or is intentionally dropped; unrecognized raw fields are
//! ignored. Missing raw fields produce `None`, never a guessed default.
//! Malformed dates and sizes are coerced to `None` plus a recorded
//! [`DataQualityWarning`] rather than aborting the record.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::models::{DataQualityWarning, DatasetRecord, ResourceRecord};
use crate::raw::{RawPackage, RawResource};

/// Output of normalizing a single raw catalogue record.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub dataset: DatasetRecord,
    pub resources: Vec<ResourceRecord>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Normalizes a raw `package_show` record into one dataset row plus its
/// resource rows.
///
/// `registry_url` is used to build the dataset's landing page link, the same
/// way the portal's own frontend does (`{registry_url}/dataset/{name}`).
///
/// Records reach the normalizer only through a registry scan, so
/// `on_registry` is set to `Some(true)` here; the `false` default for
/// inferred datasets belongs to the completion engine.
pub fn normalize(raw: RawPackage, registry_url: &str) -> Normalized {
    let mut warnings = Vec::new();

    let mut dataset = DatasetRecord::new(raw.id.clone());
    dataset.title = non_empty(raw.title);
    dataset.maintainer_email = non_empty(raw.maintainer_email);
    dataset.on_registry = Some(true);

    if let Some(org) = raw.organization {
        dataset.org = non_empty(org.name);
        dataset.org_title = non_empty(org.title);
    }

    let slug = raw.name.as_deref().unwrap_or(&raw.id);
    dataset.registry_link = Some(format!(
        "{}/dataset/{}",
        registry_url.trim_end_matches('/'),
        slug
    ));

    dataset.last_modified = coerce_datetime(
        raw.metadata_modified.as_ref(),
        &raw.id,
        "metadata_modified",
        &mut warnings,
    );

    let mut resources = Vec::with_capacity(raw.resources.len());
    for (index, res) in raw.resources.into_iter().enumerate() {
        if let Some(record) = normalize_resource(res, &raw.id, index, &mut warnings) {
            resources.push(record);
        }
    }

    Normalized {
        dataset,
        resources,
        warnings,
    }
}

fn normalize_resource(
    raw: RawResource,
    dataset_id: &str,
    index: usize,
    warnings: &mut Vec<DataQualityWarning>,
) -> Option<ResourceRecord> {
    let id = match raw.id.filter(|s| !s.trim().is_empty()) {
        Some(id) => id,
        None => {
            warnings.push(DataQualityWarning {
                dataset_id: dataset_id.to_string(),
                field: format!("resources[{}].id", index),
                detail: "resource without id, dropped".to_string(),
            });
            return None;
        }
    };

    let mut record = ResourceRecord::new(id, dataset_id);
    record.title = non_empty(raw.name);
    record.format = non_empty(raw.format).map(|f| f.trim().to_uppercase());
    record.url = non_empty(raw.url);
    record.size = coerce_size(
        raw.size.as_ref(),
        dataset_id,
        &format!("resources[{}].size", index),
        warnings,
    );
    record.languages = coerce_languages(raw.language.as_ref());

    // Prefer the artifact's own modification date, fall back to its metadata.
    record.last_modified = coerce_datetime(
        raw.last_modified.as_ref(),
        dataset_id,
        &format!("resources[{}].last_modified", index),
        warnings,
    )
    .or_else(|| {
        coerce_datetime(
            raw.metadata_modified.as_ref(),
            dataset_id,
            &format!("resources[{}].metadata_modified", index),
            warnings,
        )
    });

    Some(record)
}

/// Parses the datetime formats CKAN portals emit for `metadata_modified`
/// and `last_modified`: zone-less ISO 8601 with or without fractional
/// seconds, space-separated variants, and bare dates.
pub fn parse_ckan_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn coerce_datetime(
    value: Option<&Value>,
    dataset_id: &str,
    field: &str,
    warnings: &mut Vec<DataQualityWarning>,
) -> Option<NaiveDateTime> {
    let value = value?;
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match parse_ckan_datetime(s) {
            Some(dt) => Some(dt),
            None => {
                warnings.push(DataQualityWarning {
                    dataset_id: dataset_id.to_string(),
                    field: field.to_string(),
                    detail: format!("unparseable date '{}'", s),
                });
                None
            }
        },
        other => {
            warnings.push(DataQualityWarning {
                dataset_id: dataset_id.to_string(),
                field: field.to_string(),
                detail: format!("expected a date string, got {}", other),
            });
            None
        }
    }
}

fn coerce_size(
    value: Option<&Value>,
    dataset_id: &str,
    field: &str,
    warnings: &mut Vec<DataQualityWarning>,
) -> Option<u64> {
    let value = value?;
    match value {
        Value::Null => None,
        Value::Number(n) => match n.as_u64() {
            Some(size) => Some(size),
            None => {
                warnings.push(DataQualityWarning {
                    dataset_id: dataset_id.to_string(),
                    field: field.to_string(),
                    detail: format!("negative or non-integer size {}", n),
                });
                None
            }
        },
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match s.trim().replace(',', "").parse::<u64>() {
            Ok(size) => Some(size),
            Err(_) => {
                warnings.push(DataQualityWarning {
                    dataset_id: dataset_id.to_string(),
                    field: field.to_string(),
                    detail: format!("unparseable size '{}'", s),
                });
                None
            }
        },
        other => {
            warnings.push(DataQualityWarning {
                dataset_id: dataset_id.to_string(),
                field: field.to_string(),
                detail: format!("expected a size, got {}", other),
            });
            None
        }
    }
}

fn coerce_languages(value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    let mut langs: Vec<String> = match value {
        Value::String(s) => s
            .split(|c| c == ',' || c == ';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect(),
        _ => Vec::new(),
    };
    langs.dedup();
    langs
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
