//! HTTP handlers for shipping estimates and provider reference data
//!
//! Handlers fetch reference data through the service traits, read "now" from
//! the injected clock and hand everything to the pure estimator. Amounts are
//! converted to major units only here.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::clock::Clock;
use crate::core::error::{CatalogError, ShipResult};
use crate::core::location::{Address, AddressInput};
use crate::core::money::Currency;
use crate::core::service::{LocationService, ShippingCatalog};
use crate::core::validation::{ValidatedJson, validate_code};
use crate::shipping::{
    DeliveryType, DeliveryTypeConfig, DistanceSource, ProviderCatalog, ProviderSummary,
    ServiceArea, ShipmentItem, ShippingCalculation, ShippingEstimateRequest, ShippingEstimator,
    ShippingZone,
};

/// Application state shared across shipping handlers
#[derive(Clone)]
pub struct ShippingState {
    pub estimator: Arc<ShippingEstimator>,
    pub currency: Arc<Currency>,
    pub locations: Arc<dyn LocationService>,
    pub catalog: Arc<dyn ShippingCatalog>,
    pub clock: Arc<dyn Clock>,
}

impl ShippingState {
    /// Fetch a provider or fail with `PROVIDER_NOT_FOUND`
    async fn provider(&self, provider_id: &str) -> ShipResult<Arc<ProviderCatalog>> {
        self.catalog
            .get_provider(provider_id)
            .await?
            .ok_or_else(|| {
                CatalogError::ProviderNotFound {
                    provider_id: provider_id.to_string(),
                }
                .into()
            })
    }
}

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

fn default_delivery_type() -> DeliveryType {
    DeliveryType::Standard
}

/// Request body for `POST /shipping/estimate`
///
/// Only the shape of the payload is checked here. Empty shipments, zero
/// quantities and bad weights are reported by the estimator.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EstimateShippingRequest {
    #[validate(custom(function = "validate_code"))]
    pub provider_id: String,

    #[validate(nested)]
    pub from_address: AddressInput,

    #[validate(nested)]
    pub to_address: AddressInput,

    #[validate(nested)]
    pub items: Vec<ShipmentItem>,

    /// Defaults to STANDARD
    #[serde(default = "default_delivery_type")]
    pub delivery_type: DeliveryType,
}

/// A shipping estimate as returned to the storefront
#[derive(Debug, Clone, Serialize)]
pub struct ShippingQuote {
    pub quote_id: Uuid,
    pub provider_id: String,
    pub zone_id: String,
    pub zone_name: String,
    pub delivery_type: DeliveryType,
    pub currency: String,

    pub items: Vec<ShipmentItem>,
    pub total_weight: f64,
    pub from_address: Address,
    pub to_address: Address,
    pub distance_km: f64,
    pub distance_source: DistanceSource,

    pub base_shipping_cost: f64,
    pub weight_cost: f64,
    pub distance_cost: f64,
    pub subtotal: f64,
    pub total_shipping_cost: f64,

    pub delivery_days: u32,
    pub estimated_delivery_date: DateTime<Utc>,
    pub estimated_delivery_day: NaiveDate,
    pub requested_at: DateTime<Utc>,
}

impl ShippingQuote {
    pub fn from_calculation(
        calculation: ShippingCalculation,
        currency: &Currency,
        requested_at: DateTime<Utc>,
    ) -> Self {
        let costs = calculation.costs;
        Self {
            quote_id: Uuid::new_v4(),
            provider_id: calculation.provider_id,
            zone_id: calculation.zone_id,
            zone_name: calculation.zone_name,
            delivery_type: calculation.delivery_type,
            currency: currency.code.clone(),
            items: calculation.items,
            total_weight: calculation.total_weight,
            from_address: calculation.from_address,
            to_address: calculation.to_address,
            distance_km: calculation.distance.kilometers,
            distance_source: calculation.distance.source,
            base_shipping_cost: currency.to_major(costs.base_shipping_cost),
            weight_cost: currency.to_major(costs.weight_cost),
            distance_cost: currency.to_major(costs.distance_cost),
            subtotal: currency.to_major(costs.subtotal),
            total_shipping_cost: currency.to_major(costs.total_shipping_cost),
            delivery_days: calculation.delivery_days,
            estimated_delivery_date: calculation.estimated_delivery_date,
            estimated_delivery_day: calculation.estimated_delivery_day,
            requested_at,
        }
    }
}

/// A zone with its rates in major units and the areas it serves
#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_rate: f64,
    pub weight_factor: f64,
    pub distance_factor: f64,
    pub delivery_days: u32,
    pub service_areas: Vec<ServiceArea>,
}

impl ZoneView {
    fn new(zone: &ShippingZone, provider: &ProviderCatalog, currency: &Currency) -> Self {
        Self {
            id: zone.id.clone(),
            name: zone.name.clone(),
            description: zone.description.clone(),
            base_rate: currency.to_major(zone.base_rate),
            weight_factor: currency.to_major(zone.weight_factor),
            distance_factor: currency.to_major(zone.distance_factor),
            delivery_days: zone.delivery_days,
            service_areas: provider
                .service_areas
                .iter()
                .filter(|area| area.zone_id == zone.id)
                .cloned()
                .collect(),
        }
    }
}

/// A configured delivery type with its surcharge in major units
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryTypeView {
    pub delivery_type: DeliveryType,
    pub cost_multiplier: f64,
    pub time_reduction: u32,
    pub surcharge: f64,
    pub minimum_delivery_days: u32,
    pub available_areas: Vec<String>,
}

impl DeliveryTypeView {
    fn new(config: &DeliveryTypeConfig, currency: &Currency) -> Self {
        Self {
            delivery_type: config.delivery_type,
            cost_multiplier: config.cost_multiplier,
            time_reduction: config.time_reduction,
            surcharge: currency.to_major(config.surcharge),
            minimum_delivery_days: config.delivery_type.minimum_delivery_days(),
            available_areas: config.available_areas.clone(),
        }
    }
}

/// Estimate the shipping cost of a cart
///
/// POST /shipping/estimate
pub async fn estimate_shipping(
    State(state): State<ShippingState>,
    ValidatedJson(payload): ValidatedJson<EstimateShippingRequest>,
) -> ShipResult<Json<ApiResponse<ShippingQuote>>> {
    let provider = state.provider(&payload.provider_id).await?;
    let locations = state.locations.directory().await?;
    let requested_at = state.clock.now();

    let request = ShippingEstimateRequest {
        provider: &provider,
        locations: &locations,
        from_address: payload.from_address,
        to_address: payload.to_address,
        items: payload.items,
        delivery_type: payload.delivery_type,
        requested_at,
    };

    let calculation = state.estimator.estimate(&request)?;
    let quote = ShippingQuote::from_calculation(calculation, &state.currency, requested_at);

    tracing::info!(
        quote_id = %quote.quote_id,
        provider = %quote.provider_id,
        zone = %quote.zone_id,
        total = quote.total_shipping_cost,
        "shipping quote issued"
    );

    Ok(Json(ApiResponse::ok(quote)))
}

/// GET /shipping/providers
pub async fn list_providers(
    State(state): State<ShippingState>,
) -> ShipResult<Json<ApiResponse<Vec<ProviderSummary>>>> {
    let providers = state.catalog.list_providers().await?;
    Ok(Json(ApiResponse::ok(providers)))
}

/// GET /shipping/providers/{provider_id}/zones
pub async fn list_zones(
    State(state): State<ShippingState>,
    Path(provider_id): Path<String>,
) -> ShipResult<Json<ApiResponse<Vec<ZoneView>>>> {
    let provider = state.provider(&provider_id).await?;
    let zones = provider
        .zones
        .iter()
        .map(|zone| ZoneView::new(zone, &provider, &state.currency))
        .collect();
    Ok(Json(ApiResponse::ok(zones)))
}

/// GET /shipping/providers/{provider_id}/delivery-types
pub async fn list_delivery_types(
    State(state): State<ShippingState>,
    Path(provider_id): Path<String>,
) -> ShipResult<Json<ApiResponse<Vec<DeliveryTypeView>>>> {
    let provider = state.provider(&provider_id).await?;
    let mut delivery_types: Vec<DeliveryTypeView> = provider
        .delivery_types
        .iter()
        .map(|config| DeliveryTypeView::new(config, &state.currency))
        .collect();
    delivery_types.sort_by_key(|view| view.delivery_type);
    Ok(Json(ApiResponse::ok(delivery_types)))
}
