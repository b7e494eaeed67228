//! ogpscan Core - Domain types and inventory pipeline.
//!
//! This crate provides the core functionality for ogpscan, including:
//!
//! - **Domain models**: [`DatasetRecord`], [`ResourceRecord`], [`DataQualityWarning`]
//! - **Normalization**: raw CKAN records into the two-table model
//! - **Inventory store**: deduplicating upserts with newer-wins merge semantics
//! - **Field completion**: derived dates, compliance flags, org defaults
//! - **Export sink**: atomic CSV writes with a stable "latest" alias
//! - **Traits**: [`CatalogueClient`] for dependency injection
//! - **Progress reporting**: [`ProgressReporter`] trait for decoupled logging/UI
//!
//! # Architecture
//!
//! This crate is designed to be reusable by different frontends (CLI first).
//! The catalogue API is consumed through the [`CatalogueClient`] trait so the
//! pipeline stays free of HTTP concerns and testable with in-memory mocks.
//!
//! # Example
//!
//! ```ignore
//! use ogpscan_core::{Inventory, complete_missing_fields, fill_org_defaults};
//! use ogpscan_core::export::{export_datasets, LATEST_DATASETS_FILENAME};
//!
//! let ids = client.search_datasets("health-canada").await?;
//! let mut inventory = Inventory::new();
//! inventory.inventory(&client, registry_url, &ids).await?;
//! complete_missing_fields(&mut inventory);
//! fill_org_defaults(&mut inventory, "Health Canada");
//! export_datasets(&inventory, out_dir, LATEST_DATASETS_FILENAME)?;
//! ```

pub mod complete;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod raw;
pub mod store;
pub mod traits;

// Configuration
pub use config::{
    DEFAULT_EXPORT_DIR, DEFAULT_REGISTRY_URL, DepartmentEntry, DepartmentsConfig, HttpConfig,
    ScanConfig, default_config_path, load_departments_config,
};

// Error handling
pub use error::AppError;

// Domain models
pub use models::{DataQualityWarning, DatasetRecord, ResourceRecord};

// Wire DTOs
pub use raw::{RawOrganization, RawPackage, RawResource};

// Normalization
pub use normalize::{Normalized, normalize, parse_ckan_datetime};

// Inventory store
pub use store::{Inventory, ScanOutcome, ScanStats};

// Field completion
pub use complete::{OPEN_FORMATS, complete_missing_fields, fill_org_defaults};

// Export sink
pub use export::{
    LATEST_DATASETS_FILENAME, LATEST_RESOURCES_FILENAME, default_datasets_filename,
    default_resources_filename, export_datasets, export_resources,
};

// Progress reporting
pub use progress::{ProgressReporter, ScanEvent, SilentReporter, TracingReporter};

// Traits for dependency injection
pub use traits::CatalogueClient;
