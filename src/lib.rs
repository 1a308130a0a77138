//! # shipquote
//!
//! Shipping cost estimation for a storefront, with a REST exposure.
//!
//! ## Features
//!
//! - **Service Area Matching**: Most specific area wins (ward > district > province)
//! - **Deterministic Pricing**: Integer minor units, rounded half away from zero
//! - **Distance Aware**: Haversine between coordinates, administrative proxy otherwise
//! - **Delivery Types**: STANDARD, EXPRESS, SAME_DAY and WEEKEND with per-provider rules
//! - **Configuration-Based**: Locations and provider catalogs defined in YAML
//! - **Pure Estimator**: No I/O, the caller passes the current time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shipquote::prelude::*;
//!
//! let config = ShippingConfig::default_config();
//! let provider = config.provider("ghn").unwrap();
//! let locations = config.location_directory();
//!
//! let estimator = ShippingEstimator::new(config.estimator_settings());
//! let calculation = estimator.estimate(&ShippingEstimateRequest {
//!     provider,
//!     locations: &locations,
//!     from_address: AddressInput::new("79", "760").with_ward("26734"),
//!     to_address: AddressInput::new("79", "769"),
//!     items: vec![ShipmentItem::new("paint-001", 2, 2.5)],
//!     delivery_type: DeliveryType::Express,
//!     requested_at: Utc::now(),
//! })?;
//!
//! println!("{} in {} days", calculation.total_shipping_cost(), calculation.delivery_days);
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod shipping;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        clock::{Clock, FixedClock, SystemClock},
        error::{
            AddressRole, CatalogError, ConfigError, EstimationError, ShipError, ShipResult,
            ValidationError,
        },
        location::{Address, AddressInput, Coordinates, LocationDirectory},
        money::{Currency, Money},
        service::{LocationService, ShippingCatalog},
        validation::ValidatedJson,
    };

    // === Shipping ===
    pub use crate::shipping::{
        DeliveryType, DeliveryTypeConfig, Distance, DistanceSource, EstimatorSettings,
        ProviderCatalog, ProviderSummary, ServiceArea, ShipmentItem, ShippingCalculation,
        ShippingEstimateRequest, ShippingEstimator, ShippingZone, SpecificityRank,
        handlers::{ApiResponse, EstimateShippingRequest, ShippingQuote, ShippingState},
    };

    // === Storage ===
    pub use crate::storage::{InMemoryLocationService, InMemoryShippingCatalog};

    // === Config ===
    pub use crate::config::ShippingConfig;

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{get, post},
    };
}
