//! Test utilities and mock implementations for integration tests.
//!
//! Provides an in-memory mock of the `CatalogueClient` trait so the
//! inventory pipeline can be exercised without a network.

use std::collections::HashMap;

use ogpscan_core::raw::RawPackage;
use ogpscan_core::traits::CatalogueClient;
use ogpscan_core::AppError;

pub const TEST_REGISTRY_URL: &str = "https://registry.test.example/data/en";

/// Mock catalogue with configurable raw dataset records.
///
/// Ids present in `gone` answer detail fetches with `DatasetGone`,
/// simulating a dataset vanishing between listing and fetch. Ids in
/// `broken` answer with a generic client error.
#[derive(Clone, Default)]
pub struct MockCatalogueClient {
    packages: HashMap<String, RawPackage>,
    listing: Vec<String>,
    gone: Vec<String>,
    broken: Vec<String>,
}

impl MockCatalogueClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset (as raw JSON) that is both listed and fetchable.
    pub fn with_package(mut self, json: &str) -> Self {
        let pkg: RawPackage = serde_json::from_str(json).expect("invalid test package JSON");
        self.listing.push(pkg.id.clone());
        self.packages.insert(pkg.id.clone(), pkg);
        self
    }

    /// Adds an id that is listed but gone on detail fetch.
    pub fn with_gone(mut self, id: &str) -> Self {
        self.listing.push(id.to_string());
        self.gone.push(id.to_string());
        self
    }

    /// Adds an id whose detail fetch fails with a client error.
    pub fn with_broken(mut self, id: &str) -> Self {
        self.listing.push(id.to_string());
        self.broken.push(id.to_string());
        self
    }
}

impl CatalogueClient for MockCatalogueClient {
    async fn search_datasets(&self, _owner_org: &str) -> Result<Vec<String>, AppError> {
        Ok(self.listing.clone())
    }

    async fn get_dataset(&self, id: &str) -> Result<RawPackage, AppError> {
        if self.gone.iter().any(|g| g == id) {
            return Err(AppError::DatasetGone(id.to_string()));
        }
        if self.broken.iter().any(|b| b == id) {
            return Err(AppError::ClientError(format!("500 for {}", id)));
        }
        self.packages
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::DatasetGone(id.to_string()))
    }
}

/// Catalogue that is entirely unreachable.
#[derive(Clone, Copy, Default)]
pub struct UnreachableCatalogueClient;

impl CatalogueClient for UnreachableCatalogueClient {
    async fn search_datasets(&self, _owner_org: &str) -> Result<Vec<String>, AppError> {
        Err(AppError::RemoteUnavailable("connection refused".to_string()))
    }

    async fn get_dataset(&self, _id: &str) -> Result<RawPackage, AppError> {
        Err(AppError::RemoteUnavailable("connection refused".to_string()))
    }
}
