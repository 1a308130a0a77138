//! Shipping domain: zones, service areas, delivery types and the estimator

pub mod delivery;
pub mod distance;
pub mod estimator;
pub mod handlers;
pub mod matcher;
pub mod zone;

pub use delivery::{DeliveryType, DeliveryTypeConfig};
pub use distance::{Distance, DistanceSource};
pub use estimator::{
    CostBreakdown, EstimatorSettings, ShipmentItem, ShippingCalculation, ShippingEstimateRequest,
    ShippingEstimator,
};
pub use matcher::{ZoneMatch, match_zones};
pub use zone::{ProviderCatalog, ProviderSummary, ServiceArea, ShippingZone, SpecificityRank};
