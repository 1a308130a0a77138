//! Shipping cost estimator
//!
//! [`ShippingEstimator::estimate`] turns a shipment, two addresses and a
//! provider's reference data into a [`ShippingCalculation`]:
//!
//! 1. total weight = sum of `quantity * unit_weight`
//! 2. zone = most specific matching service area, cheapest base rate on ties
//! 3. distance = haversine, or the administrative proxy without coordinates
//! 4. base + weight cost + distance cost = subtotal
//! 5. total = subtotal * multiplier + surcharge
//! 6. delivery days = zone days - reduction, floored per delivery type
//! 7. estimated date = request time + delivery days
//!
//! The estimator holds only immutable settings and performs no I/O. The
//! caller supplies "now" through the request, so identical requests always
//! produce identical calculations.

use crate::core::error::{AddressRole, ConfigError, EstimationError};
use crate::core::location::{Address, AddressInput, LocationDirectory};
use crate::core::money::Money;
use crate::shipping::delivery::{DeliveryType, DeliveryTypeConfig};
use crate::shipping::distance::{self, Distance};
use crate::shipping::matcher::match_zones;
use crate::shipping::zone::{ProviderCatalog, ShippingZone, SpecificityRank};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_same_day_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_same_day_max_distance_km() -> f64 {
    30.0
}

/// Tunables of the estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    /// Weight carried at no extra cost
    #[serde(default)]
    pub free_weight_threshold_kg: f64,

    /// Local time after which same-day orders are refused
    #[serde(default = "default_same_day_cutoff")]
    pub same_day_cutoff: NaiveTime,

    /// Same-day is refused at or beyond this distance
    #[serde(default = "default_same_day_max_distance_km")]
    pub same_day_max_distance_km: f64,

    /// Offset of the storefront's local time from UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            free_weight_threshold_kg: 0.0,
            same_day_cutoff: default_same_day_cutoff(),
            same_day_max_distance_km: default_same_day_max_distance_km(),
            utc_offset_minutes: 0,
        }
    }
}

impl EstimatorSettings {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = |field: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    message: "must be finite and non-negative".to_string(),
                })
            }
        };
        non_negative("free_weight_threshold_kg", self.free_weight_threshold_kg)?;
        non_negative("same_day_max_distance_km", self.same_day_max_distance_km)?;

        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "utc_offset_minutes".to_string(),
                value: self.utc_offset_minutes.to_string(),
                message: "must be strictly within ±24 hours".to_string(),
            });
        }
        Ok(())
    }
}

/// One line of the shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShipmentItem {
    #[validate(length(min = 1, max = 128))]
    pub product_id: String,

    /// Signed so that a negative quantity is reported as an invalid shipment
    pub quantity: i64,

    /// Weight of a single unit in kilograms
    pub unit_weight: f64,
}

impl ShipmentItem {
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_weight: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_weight,
        }
    }
}

/// Inputs of a single estimate
///
/// Reference data is borrowed: the caller fetches it once and may reuse it
/// across many estimates.
#[derive(Debug, Clone)]
pub struct ShippingEstimateRequest<'a> {
    pub provider: &'a ProviderCatalog,
    pub locations: &'a LocationDirectory,
    pub from_address: AddressInput,
    pub to_address: AddressInput,
    pub items: Vec<ShipmentItem>,
    pub delivery_type: DeliveryType,
    pub requested_at: DateTime<Utc>,
}

/// The three cost components and their totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_shipping_cost: Money,
    pub weight_cost: Money,
    pub distance_cost: Money,
    pub subtotal: Money,
    pub total_shipping_cost: Money,
}

/// Result of an estimate; computed per request, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingCalculation {
    pub provider_id: String,
    pub items: Vec<ShipmentItem>,
    pub total_weight: f64,
    pub from_address: Address,
    pub to_address: Address,
    pub zone_id: String,
    pub zone_name: String,
    pub specificity: SpecificityRank,
    pub delivery_type: DeliveryType,
    pub distance: Distance,
    #[serde(flatten)]
    pub costs: CostBreakdown,
    pub delivery_days: u32,
    pub estimated_delivery_date: DateTime<Utc>,
    /// Calendar day of the estimate in the storefront's local time
    pub estimated_delivery_day: NaiveDate,
}

impl ShippingCalculation {
    pub fn total_shipping_cost(&self) -> Money {
        self.costs.total_shipping_cost
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShippingEstimator {
    settings: EstimatorSettings,
}

impl ShippingEstimator {
    pub fn new(settings: EstimatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    pub fn estimate(
        &self,
        request: &ShippingEstimateRequest<'_>,
    ) -> Result<ShippingCalculation, EstimationError> {
        let total_weight = total_weight(&request.items)?;

        let from_address = request
            .locations
            .resolve(&request.from_address)
            .map_err(|source| EstimationError::AddressUnresolved {
                role: AddressRole::Origin,
                source,
            })?;
        let to_address = request
            .locations
            .resolve(&request.to_address)
            .map_err(|source| EstimationError::AddressUnresolved {
                role: AddressRole::Destination,
                source,
            })?;

        let provider = request.provider;
        let matches = match_zones(&to_address, &provider.service_areas, &provider.zones);
        let selected = matches
            .first()
            .ok_or_else(|| EstimationError::NoServiceableZone {
                province: to_address.province.code.clone(),
                district: to_address.district.code.clone(),
            })?;
        let zone = selected.zone;

        let distance = distance::measure(&from_address, &to_address);
        let delivery = self.delivery_config(
            provider,
            zone,
            request.delivery_type,
            &distance,
            request.requested_at,
        )?;

        let costs = self.price(zone, total_weight, distance.kilometers, delivery);
        let delivery_days = delivery.delivery_days(zone.delivery_days);
        let estimated_delivery_date = Duration::try_days(i64::from(delivery_days))
            .and_then(|days| request.requested_at.checked_add_signed(days))
            .ok_or_else(|| EstimationError::DeliveryTypeUnavailable {
                delivery_type: request.delivery_type,
                zone_id: zone.id.clone(),
                reason: format!("{} delivery days overflow the calendar", delivery_days),
            })?;
        let estimated_delivery_day = estimated_delivery_date
            .with_timezone(&self.settings.offset())
            .date_naive();

        tracing::debug!(
            provider = %provider.id,
            zone = %zone.id,
            rank = ?selected.rank,
            delivery_type = %request.delivery_type,
            distance_km = distance.kilometers,
            total = %costs.total_shipping_cost,
            delivery_days,
            "shipping estimate computed"
        );

        Ok(ShippingCalculation {
            provider_id: provider.id.clone(),
            items: request.items.clone(),
            total_weight,
            from_address,
            to_address,
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            specificity: selected.rank,
            delivery_type: request.delivery_type,
            distance,
            costs,
            delivery_days,
            estimated_delivery_date,
            estimated_delivery_day,
        })
    }

    /// Cost components for a zone, a weight, a distance and a delivery type
    pub fn price(
        &self,
        zone: &ShippingZone,
        total_weight_kg: f64,
        distance_km: f64,
        delivery: &DeliveryTypeConfig,
    ) -> CostBreakdown {
        let billable_weight = (total_weight_kg - self.settings.free_weight_threshold_kg).max(0.0);

        let base_shipping_cost = zone.base_rate;
        let weight_cost = zone.weight_factor.scale(billable_weight);
        let distance_cost = zone.distance_factor.scale(distance_km.max(0.0));
        let subtotal = base_shipping_cost + weight_cost + distance_cost;

        CostBreakdown {
            base_shipping_cost,
            weight_cost,
            distance_cost,
            subtotal,
            total_shipping_cost: delivery.apply_to(subtotal),
        }
    }

    fn delivery_config<'p>(
        &self,
        provider: &'p ProviderCatalog,
        zone: &ShippingZone,
        delivery_type: DeliveryType,
        distance: &Distance,
        requested_at: DateTime<Utc>,
    ) -> Result<&'p DeliveryTypeConfig, EstimationError> {
        let unavailable = |reason: String| EstimationError::DeliveryTypeUnavailable {
            delivery_type,
            zone_id: zone.id.clone(),
            reason,
        };

        let config = provider
            .delivery_type(delivery_type)
            .ok_or_else(|| unavailable(format!("not offered by provider '{}'", provider.id)))?;

        if !config.is_offered_in(&zone.id) {
            return Err(unavailable("not offered in this zone".to_string()));
        }

        if delivery_type == DeliveryType::SameDay {
            if !distance.kilometers.is_finite() {
                return Err(unavailable(format!(
                    "distance {} km cannot be checked against the same-day range",
                    distance.kilometers
                )));
            }
            if distance.kilometers >= self.settings.same_day_max_distance_km {
                return Err(unavailable(format!(
                    "distance {:.1} km is beyond the same-day range of {} km",
                    distance.kilometers, self.settings.same_day_max_distance_km
                )));
            }
            let local_time = requested_at.with_timezone(&self.settings.offset()).time();
            if local_time >= self.settings.same_day_cutoff {
                return Err(unavailable(format!(
                    "requested after the same-day cutoff of {}",
                    self.settings.same_day_cutoff.format("%H:%M")
                )));
            }
        }

        Ok(config)
    }
}

/// Sum of `quantity * unit_weight`, rejecting malformed items
fn total_weight(items: &[ShipmentItem]) -> Result<f64, EstimationError> {
    if items.is_empty() {
        return Err(EstimationError::invalid_shipment("shipment has no items"));
    }

    let mut total = 0.0;
    for item in items {
        if item.quantity < 1 {
            return Err(EstimationError::invalid_shipment(format!(
                "item '{}' must have a quantity of at least 1",
                item.product_id
            )));
        }
        if !item.unit_weight.is_finite() || item.unit_weight < 0.0 {
            return Err(EstimationError::invalid_shipment(format!(
                "item '{}' has an invalid unit weight {}",
                item.product_id, item.unit_weight
            )));
        }
        total += item.quantity as f64 * item.unit_weight;
    }

    if !total.is_finite() {
        return Err(EstimationError::invalid_shipment("total weight overflows"));
    }
    Ok(total)
}
