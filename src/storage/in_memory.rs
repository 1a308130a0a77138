//! In-memory reference data services for testing and development

use crate::config::ShippingConfig;
use crate::core::location::LocationDirectory;
use crate::core::service::{LocationService, ShippingCatalog};
use crate::shipping::{ProviderCatalog, ProviderSummary};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory location directory
///
/// Holds a single snapshot that can be swapped atomically with [`replace`].
///
/// [`replace`]: InMemoryLocationService::replace
#[derive(Clone, Default)]
pub struct InMemoryLocationService {
    directory: Arc<RwLock<Arc<LocationDirectory>>>,
}

impl InMemoryLocationService {
    pub fn new(directory: LocationDirectory) -> Self {
        Self {
            directory: Arc::new(RwLock::new(Arc::new(directory))),
        }
    }

    /// Swap in a new directory; in-flight requests keep their snapshot
    pub fn replace(&self, directory: LocationDirectory) -> Result<()> {
        let mut current = self
            .directory
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        *current = Arc::new(directory);

        Ok(())
    }
}

#[async_trait]
impl LocationService for InMemoryLocationService {
    async fn directory(&self) -> Result<Arc<LocationDirectory>> {
        let directory = self
            .directory
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(directory.clone())
    }
}

/// In-memory provider catalogs keyed by provider id
///
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryShippingCatalog {
    providers: Arc<RwLock<HashMap<String, Arc<ProviderCatalog>>>>,
}

impl InMemoryShippingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_providers(providers: impl IntoIterator<Item = ProviderCatalog>) -> Self {
        let providers = providers
            .into_iter()
            .map(|p| (p.id.clone(), Arc::new(p)))
            .collect();
        Self {
            providers: Arc::new(RwLock::new(providers)),
        }
    }

    /// Insert or replace a provider catalog
    pub fn upsert(&self, provider: ProviderCatalog) -> Result<()> {
        let mut providers = self
            .providers
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        providers.insert(provider.id.clone(), Arc::new(provider));

        Ok(())
    }

    /// Remove a provider, returning whether it existed
    pub fn remove(&self, provider_id: &str) -> Result<bool> {
        let mut providers = self
            .providers
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(providers.remove(provider_id).is_some())
    }
}

#[async_trait]
impl ShippingCatalog for InMemoryShippingCatalog {
    async fn list_providers(&self) -> Result<Vec<ProviderSummary>> {
        let providers = self
            .providers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut summaries: Vec<ProviderSummary> =
            providers.values().map(|p| p.summary()).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(summaries)
    }

    async fn get_provider(&self, provider_id: &str) -> Result<Option<Arc<ProviderCatalog>>> {
        let providers = self
            .providers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(providers.get(provider_id).cloned())
    }
}

/// Build both in-memory services from a loaded configuration
pub fn from_config(config: &ShippingConfig) -> (InMemoryLocationService, InMemoryShippingCatalog) {
    (
        InMemoryLocationService::new(config.location_directory()),
        InMemoryShippingCatalog::from_providers(config.providers.iter().cloned()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Province;
    use crate::shipping::ShippingZone;

    fn provider(id: &str) -> ProviderCatalog {
        ProviderCatalog::new(id, id.to_uppercase())
            .with_zone(ShippingZone::new("south", "South").with_rates(22000, 500, 800))
    }

    #[tokio::test]
    async fn test_get_provider() {
        let catalog = InMemoryShippingCatalog::from_providers([provider("ghn")]);

        let found = catalog.get_provider("ghn").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().zones.len(), 1);

        assert!(catalog.get_provider("ghtk").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_providers_is_sorted() {
        let catalog = InMemoryShippingCatalog::from_providers([provider("vtp"), provider("ghn")]);

        let list = catalog.list_providers().await.unwrap();
        let ids: Vec<&str> = list.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ghn", "vtp"]);
    }

    #[tokio::test]
    async fn test_upsert_and_remove() {
        let catalog = InMemoryShippingCatalog::new();
        catalog.upsert(provider("ghn")).unwrap();
        catalog
            .upsert(ProviderCatalog::new("ghn", "Renamed"))
            .unwrap();

        let found = catalog.get_provider("ghn").await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");

        assert!(catalog.remove("ghn").unwrap());
        assert!(!catalog.remove("ghn").unwrap());
        assert!(catalog.list_providers().await.unwrap().is_empty());
    }

    #[test]
    fn test_replace_directory_keeps_old_snapshots() {
        let service = InMemoryLocationService::default();
        let before = tokio_test::block_on(service.directory()).unwrap();
        assert!(before.is_empty());

        service
            .replace(LocationDirectory::new(vec![Province {
                code: "01".to_string(),
                name: "Hà Nội".to_string(),
                districts: vec![],
            }]))
            .unwrap();

        let after = tokio_test::block_on(service.directory()).unwrap();
        assert!(before.is_empty());
        assert!(after.province("01").is_some());
    }
}
