//! Server host holding the shared shipping state
//!
//! The host is independent of the transport: it owns the estimator, the
//! reference-data services and the clock, and exposures turn it into routes.

use crate::core::clock::Clock;
use crate::core::money::Currency;
use crate::core::service::{LocationService, ShippingCatalog};
use crate::shipping::handlers::ShippingState;
use crate::shipping::{EstimatorSettings, ShippingEstimator};
use std::sync::Arc;

/// Host context containing all shared state
pub struct ServerHost {
    /// Pure estimator configured with the merged settings
    pub estimator: Arc<ShippingEstimator>,

    /// Currency used to present amounts in major units
    pub currency: Arc<Currency>,

    /// Administrative location data
    pub locations: Arc<dyn LocationService>,

    /// Provider catalogs
    pub catalog: Arc<dyn ShippingCatalog>,

    /// Source of "now" for every estimate
    pub clock: Arc<dyn Clock>,

    /// Attach a permissive CORS layer to the router
    pub permissive_cors: bool,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        settings: EstimatorSettings,
        currency: Currency,
        locations: Arc<dyn LocationService>,
        catalog: Arc<dyn ShippingCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            estimator: Arc::new(ShippingEstimator::new(settings)),
            currency: Arc::new(currency),
            locations,
            catalog,
            clock,
            permissive_cors: false,
        }
    }

    pub fn with_permissive_cors(mut self, enabled: bool) -> Self {
        self.permissive_cors = enabled;
        self
    }

    /// State handed to the shipping handlers
    pub fn shipping_state(&self) -> ShippingState {
        ShippingState {
            estimator: self.estimator.clone(),
            currency: self.currency.clone(),
            locations: self.locations.clone(),
            catalog: self.catalog.clone(),
            clock: self.clock.clone(),
        }
    }
}
