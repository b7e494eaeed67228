//! Trait definitions for external dependencies.
//!
//! The catalogue API is consumed through the [`CatalogueClient`] trait,
//! which keeps the inventory store testable with in-memory mocks and keeps
//! the core crate free of HTTP concerns.

use std::future::Future;

use crate::error::AppError;
use crate::raw::RawPackage;

/// Client for a CKAN-compatible catalogue API.
///
/// Implementations handle pagination, retries and rate limiting internally;
/// callers see one logical operation per method.
pub trait CatalogueClient: Send + Sync {
    /// Searches the catalogue for all dataset ids owned by an organization.
    ///
    /// Traverses every result page of the underlying API and returns the
    /// union of ids, stable within a single call. Zero matches is a
    /// legitimate empty result; whether to treat it as an error belongs to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RemoteUnavailable` when the API is unreachable
    /// after retries.
    fn search_datasets(
        &self,
        owner_org: &str,
    ) -> impl Future<Output = Result<Vec<String>, AppError>> + Send;

    /// Fetches the full raw record for a single dataset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DatasetGone` when the dataset disappeared between
    /// listing and detail fetch; callers treat that as "skip and continue".
    fn get_dataset(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<RawPackage, AppError>> + Send;
}
