//! In-memory inventory store.
//!
//! The [`Inventory`] accumulates dataset and resource rows across one or
//! more scans, enforcing uniqueness by id. The upsert rule is the core
//! correctness property: newer scans win field by field, but a missing field
//! in the new record never regresses a present field in the old one.
//! Running the same scan twice therefore yields identical tables.
//!
//! Tables are `BTreeMap`s keyed by id so iteration and export order are
//! deterministic.

use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::{DataQualityWarning, DatasetRecord, ResourceRecord};
use crate::normalize::normalize;
use crate::progress::{ProgressReporter, ScanEvent, SilentReporter};
use crate::traits::CatalogueClient;

/// Outcome of processing a single dataset id during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First time this dataset id was seen.
    Created,
    /// Dataset id already present; fields merged.
    Updated,
    /// Dataset vanished between listing and detail fetch.
    Skipped,
    /// Fetching or decoding the dataset failed for another reason.
    Failed,
}

/// Statistics for one inventory pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome, incrementing the appropriate counter.
    pub fn record(&mut self, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::Created => self.created += 1,
            ScanOutcome::Updated => self.updated += 1,
            ScanOutcome::Skipped => self.skipped += 1,
            ScanOutcome::Failed => self.failed += 1,
        }
    }

    /// Returns the total number of processed dataset ids.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }
}

/// In-memory accumulation of dataset and resource records for a scan session.
#[derive(Debug, Default, Clone)]
pub struct Inventory {
    datasets: BTreeMap<String, DatasetRecord>,
    resources: BTreeMap<String, ResourceRecord>,
    /// Data-quality warnings collected during normalization.
    warnings: Vec<DataQualityWarning>,
    /// Ids that vanished between listing and detail fetch.
    skipped_ids: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches, normalizes and upserts every dataset id in `ids`.
    ///
    /// One dataset's failure never aborts the batch: `DatasetGone` is
    /// recorded as skipped, other per-id errors as failed, and processing
    /// continues. Only a fatal client error (`RemoteUnavailable`) propagates.
    pub async fn inventory<C: CatalogueClient>(
        &mut self,
        client: &C,
        registry_url: &str,
        ids: &[String],
    ) -> Result<ScanStats, AppError> {
        self.inventory_with_progress(client, registry_url, ids, &SilentReporter)
            .await
    }

    /// Same as [`inventory`](Self::inventory), but emits progress events
    /// through the provided reporter.
    pub async fn inventory_with_progress<C, R>(
        &mut self,
        client: &C,
        registry_url: &str,
        ids: &[String],
        reporter: &R,
    ) -> Result<ScanStats, AppError>
    where
        C: CatalogueClient,
        R: ProgressReporter,
    {
        let total = ids.len();
        let report_interval = std::cmp::max(total / 20, 10);
        let mut stats = ScanStats::new();

        for (current, id) in ids.iter().enumerate() {
            let raw = match client.get_dataset(id).await {
                Ok(raw) => raw,
                Err(AppError::DatasetGone(gone_id)) => {
                    reporter.report(ScanEvent::DatasetSkipped { id });
                    self.skipped_ids.push(gone_id);
                    stats.record(ScanOutcome::Skipped);
                    continue;
                }
                Err(e @ AppError::RemoteUnavailable(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(dataset_id = %id, error = %e, "Failed to fetch dataset");
                    stats.record(ScanOutcome::Failed);
                    continue;
                }
            };

            let normalized = normalize(raw, registry_url);
            for warning in &normalized.warnings {
                tracing::warn!(warning = %warning, "Data quality issue");
            }
            self.warnings.extend(normalized.warnings);

            let outcome = self.upsert_dataset(normalized.dataset);
            for resource in normalized.resources {
                self.upsert_resource(resource);
            }
            stats.record(outcome);

            let processed = current + 1;
            if processed % report_interval == 0 || processed == total {
                reporter.report(ScanEvent::Progress {
                    current: processed,
                    total,
                    stats: &stats,
                });
            }
        }

        reporter.report(ScanEvent::Completed { stats: &stats });
        Ok(stats)
    }

    /// Inserts or merges a dataset row keyed by its id.
    pub fn upsert_dataset(&mut self, record: DatasetRecord) -> ScanOutcome {
        match self.datasets.get_mut(&record.id) {
            Some(existing) => {
                existing.merge_from(record);
                ScanOutcome::Updated
            }
            None => {
                self.datasets.insert(record.id.clone(), record);
                ScanOutcome::Created
            }
        }
    }

    /// Inserts or merges a resource row keyed by its id.
    ///
    /// Orphan resources (no owning dataset in this store) are dropped and
    /// logged, never silently retained.
    pub fn upsert_resource(&mut self, record: ResourceRecord) -> Option<ScanOutcome> {
        if !self.datasets.contains_key(&record.dataset_id) {
            tracing::warn!(
                resource_id = %record.id,
                dataset_id = %record.dataset_id,
                "Dropping orphan resource (no such dataset in inventory)"
            );
            self.warnings.push(DataQualityWarning {
                dataset_id: record.dataset_id.clone(),
                field: format!("resources.{}", record.id),
                detail: "orphan resource dropped".to_string(),
            });
            return None;
        }
        match self.resources.get_mut(&record.id) {
            Some(existing) => {
                existing.merge_from(record);
                Some(ScanOutcome::Updated)
            }
            None => {
                self.resources.insert(record.id.clone(), record);
                Some(ScanOutcome::Created)
            }
        }
    }

    /// Dataset rows in id order.
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetRecord> {
        self.datasets.values()
    }

    /// Resource rows in id order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.resources.values()
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn get_dataset(&self, id: &str) -> Option<&DatasetRecord> {
        self.datasets.get(id)
    }

    pub fn get_resource(&self, id: &str) -> Option<&ResourceRecord> {
        self.resources.get(id)
    }

    /// Data-quality warnings collected so far.
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Ids that were listed but gone on detail fetch.
    pub fn skipped_ids(&self) -> &[String] {
        &self.skipped_ids
    }

    pub(crate) fn datasets_mut(&mut self) -> impl Iterator<Item = &mut DatasetRecord> {
        self.datasets.values_mut()
    }

    pub(crate) fn resources_for(&self, dataset_id: &str) -> Vec<&ResourceRecord> {
        self.resources
            .values()
            .filter(|r| r.dataset_id == dataset_id)
            .collect()
    }
}
