//! Service traits for shipping reference data
//!
//! The estimator never touches storage. Handlers fetch the reference data
//! through these traits and hand it to the estimator; implementations decide
//! on caching and concurrency control.

use crate::core::location::LocationDirectory;
use crate::shipping::{ProviderCatalog, ProviderSummary};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of administrative location data (provinces, districts, wards)
#[async_trait]
pub trait LocationService: Send + Sync {
    /// Snapshot of the whole location directory
    async fn directory(&self) -> Result<Arc<LocationDirectory>>;
}

/// Source of provider shipping catalogs
///
/// Implementations should report an unknown provider as `Ok(None)`; errors
/// are reserved for backend failures.
#[async_trait]
pub trait ShippingCatalog: Send + Sync {
    /// List all providers
    async fn list_providers(&self) -> Result<Vec<ProviderSummary>>;

    /// Get the full catalog of a provider
    async fn get_provider(&self, provider_id: &str) -> Result<Option<Arc<ProviderCatalog>>>;
}
