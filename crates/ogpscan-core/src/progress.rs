//! Progress reporting for scan operations.
//!
//! The store emits [`ScanEvent`]s through a [`ProgressReporter`] so that
//! logging and console output stay out of the core pipeline. The CLI uses
//! [`TracingReporter`]; tests and library callers that don't care use
//! [`SilentReporter`].

use crate::store::ScanStats;

/// Events emitted while inventorying a department.
#[derive(Debug)]
pub enum ScanEvent<'a> {
    /// The registry search finished and returned this many dataset ids.
    DatasetsFound { count: usize },
    /// A batch of datasets has been processed.
    Progress {
        current: usize,
        total: usize,
        stats: &'a ScanStats,
    },
    /// A dataset vanished between listing and detail fetch.
    DatasetSkipped { id: &'a str },
    /// The inventory pass finished.
    Completed { stats: &'a ScanStats },
}

/// Receiver for scan progress events.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ScanEvent<'_>);
}

/// Reporter that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _event: ScanEvent<'_>) {}
}

/// Reporter that logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ScanEvent<'_>) {
        match event {
            ScanEvent::DatasetsFound { count } => {
                tracing::info!(count, "Datasets found on the registry");
            }
            ScanEvent::Progress {
                current,
                total,
                stats,
            } => {
                tracing::info!(
                    current,
                    total,
                    created = stats.created,
                    updated = stats.updated,
                    skipped = stats.skipped,
                    failed = stats.failed,
                    "Processed {}/{} datasets",
                    current,
                    total
                );
            }
            ScanEvent::DatasetSkipped { id } => {
                tracing::warn!(dataset_id = id, "Dataset gone, skipping");
            }
            ScanEvent::Completed { stats } => {
                tracing::info!(
                    created = stats.created,
                    updated = stats.updated,
                    skipped = stats.skipped,
                    failed = stats.failed,
                    "Inventory pass completed"
                );
            }
        }
    }
}
