//! CSV export sink for the two inventory tables.
//!
//! Each table is written with a fixed column order (the row structs below —
//! `csv` serializes fields in declaration order). Writes are atomic with
//! respect to partial-file corruption: rows go to a temporary file in the
//! target directory which is then persisted over the destination, so a
//! failed write never leaves a truncated file behind.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::AppError;
use crate::models::{DatasetRecord, ResourceRecord};
use crate::store::Inventory;

/// Fixed "latest" alias filename for the datasets table, overwritten each run.
pub const LATEST_DATASETS_FILENAME: &str = "_latest_datasets_inventory.csv";
/// Fixed "latest" alias filename for the resources table, overwritten each run.
pub const LATEST_RESOURCES_FILENAME: &str = "_latest_resources_inventory.csv";

const DATASET_HEADERS: &[&str] = &[
    "id",
    "title",
    "org",
    "org_title",
    "maintainer_email",
    "registry_link",
    "on_registry",
    "last_modified",
    "open_formats",
    "official_langs",
];

const RESOURCE_HEADERS: &[&str] = &[
    "id",
    "dataset_id",
    "title",
    "format",
    "url",
    "size",
    "languages",
    "last_modified",
];

/// Default (timestamped) filename for the datasets table.
pub fn default_datasets_filename(date: chrono::NaiveDate) -> String {
    format!("{}_datasets_inventory.csv", date.format("%Y-%m-%d"))
}

/// Default (timestamped) filename for the resources table.
pub fn default_resources_filename(date: chrono::NaiveDate) -> String {
    format!("{}_resources_inventory.csv", date.format("%Y-%m-%d"))
}

/// One CSV row of the datasets table. Field order is the column order.
#[derive(Debug, Serialize)]
struct DatasetRow<'a> {
    id: &'a str,
    title: Option<&'a str>,
    org: Option<&'a str>,
    org_title: Option<&'a str>,
    maintainer_email: Option<&'a str>,
    registry_link: Option<&'a str>,
    on_registry: Option<bool>,
    last_modified: Option<String>,
    open_formats: Option<bool>,
    official_langs: Option<bool>,
}

impl<'a> From<&'a DatasetRecord> for DatasetRow<'a> {
    fn from(d: &'a DatasetRecord) -> Self {
        Self {
            id: &d.id,
            title: d.title.as_deref(),
            org: d.org.as_deref(),
            org_title: d.org_title.as_deref(),
            maintainer_email: d.maintainer_email.as_deref(),
            registry_link: d.registry_link.as_deref(),
            on_registry: d.on_registry,
            last_modified: d.last_modified.map(format_datetime),
            open_formats: d.open_formats,
            official_langs: d.official_langs,
        }
    }
}

/// One CSV row of the resources table. Field order is the column order.
#[derive(Debug, Serialize)]
struct ResourceRow<'a> {
    id: &'a str,
    dataset_id: &'a str,
    title: Option<&'a str>,
    format: Option<&'a str>,
    url: Option<&'a str>,
    size: Option<u64>,
    languages: String,
    last_modified: Option<String>,
}

impl<'a> From<&'a ResourceRecord> for ResourceRow<'a> {
    fn from(r: &'a ResourceRecord) -> Self {
        Self {
            id: &r.id,
            dataset_id: &r.dataset_id,
            title: r.title.as_deref(),
            format: r.format.as_deref(),
            url: r.url.as_deref(),
            size: r.size,
            languages: r.languages.join(";"),
            last_modified: r.last_modified.map(format_datetime),
        }
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Writes the datasets table to `dir/filename`. Returns the written path.
pub fn export_datasets(
    inventory: &Inventory,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, AppError> {
    write_atomic(dir, filename, DATASET_HEADERS, |writer| {
        for dataset in inventory.datasets() {
            writer
                .serialize(DatasetRow::from(dataset))
                .map_err(|e| AppError::ExportFailure(e.to_string()))?;
        }
        Ok(())
    })
}

/// Writes the resources table to `dir/filename`. Returns the written path.
pub fn export_resources(
    inventory: &Inventory,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, AppError> {
    write_atomic(dir, filename, RESOURCE_HEADERS, |writer| {
        for resource in inventory.resources() {
            writer
                .serialize(ResourceRow::from(resource))
                .map_err(|e| AppError::ExportFailure(e.to_string()))?;
        }
        Ok(())
    })
}

/// Streams rows into a temp file in `dir`, then renames it over
/// `dir/filename`. The temp file lives in the same directory so the final
/// persist is a same-filesystem rename.
///
/// The header row is written explicitly so that an empty table still
/// produces a valid CSV file with headers.
fn write_atomic<F>(
    dir: &Path,
    filename: &str,
    headers: &[&str],
    write_rows: F,
) -> Result<PathBuf, AppError>
where
    F: FnOnce(&mut csv::Writer<&mut NamedTempFile>) -> Result<(), AppError>,
{
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::ExportFailure(format!("cannot create directory {}: {}", dir.display(), e))
    })?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::ExportFailure(format!("cannot create temp file: {}", e)))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut tmp);
        writer
            .write_record(headers)
            .map_err(|e| AppError::ExportFailure(e.to_string()))?;
        write_rows(&mut writer)?;
        writer
            .flush()
            .map_err(|e| AppError::ExportFailure(e.to_string()))?;
    }

    let target = dir.join(filename);
    tmp.persist(&target).map_err(|e| {
        AppError::ExportFailure(format!("cannot persist {}: {}", target.display(), e))
    })?;

    tracing::info!(path = %target.display(), "Inventory exported");
    Ok(target)
}
