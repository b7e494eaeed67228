//! ogpscan Client - HTTP client for CKAN-compatible registries.
//!
//! This crate provides the [`registry`] module: a CKAN Action API client
//! implementing `ogpscan_core::traits::CatalogueClient`.
//!
//! # Overview
//!
//! The client handles request building, pagination, retries, rate limiting
//! and response parsing; the core crate never sees HTTP.

pub mod registry;

// Re-export main client type
pub use registry::RegistryClient;
