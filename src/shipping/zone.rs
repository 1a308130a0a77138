//! Shipping zones, service areas and provider catalogs

use crate::core::error::ConfigError;
use crate::core::location::{Address, LocationDirectory};
use crate::core::money::Money;
use crate::shipping::delivery::{DeliveryType, DeliveryTypeConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Longest transit a zone may advertise
pub const MAX_DELIVERY_DAYS: u32 = 365;

/// A provider-defined pricing region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Flat cost of any shipment in this zone
    pub base_rate: Money,

    /// Cost per kilogram above the free weight threshold
    #[serde(default)]
    pub weight_factor: Money,

    /// Cost per kilometer
    #[serde(default)]
    pub distance_factor: Money,

    /// Standard delivery time in whole days
    pub delivery_days: u32,
}

impl ShippingZone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            base_rate: Money::ZERO,
            weight_factor: Money::ZERO,
            distance_factor: Money::ZERO,
            delivery_days: 0,
        }
    }

    pub fn with_rates(mut self, base_rate: u64, weight_factor: u64, distance_factor: u64) -> Self {
        self.base_rate = Money::from_minor(base_rate);
        self.weight_factor = Money::from_minor(weight_factor);
        self.distance_factor = Money::from_minor(distance_factor);
        self
    }

    pub fn with_delivery_days(mut self, days: u32) -> Self {
        self.delivery_days = days;
        self
    }
}

/// How finely a service area pins down its locality
///
/// Ordered so that a finer match compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecificityRank {
    Province,
    District,
    Ward,
}

fn default_active() -> bool {
    true
}

/// Maps an administrative locality to the zone that serves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub id: String,
    pub zone_id: String,
    pub province_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward_code: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ServiceArea {
    pub fn province(
        id: impl Into<String>,
        zone_id: impl Into<String>,
        province_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            zone_id: zone_id.into(),
            province_code: province_code.into(),
            district_code: None,
            ward_code: None,
            is_active: true,
        }
    }

    pub fn with_district(mut self, district_code: impl Into<String>) -> Self {
        self.district_code = Some(district_code.into());
        self
    }

    pub fn with_ward(mut self, ward_code: impl Into<String>) -> Self {
        self.ward_code = Some(ward_code.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn specificity(&self) -> SpecificityRank {
        if self.ward_code.is_some() {
            SpecificityRank::Ward
        } else if self.district_code.is_some() {
            SpecificityRank::District
        } else {
            SpecificityRank::Province
        }
    }

    /// Hierarchical match against a resolved destination
    pub fn covers(&self, destination: &Address) -> bool {
        if self.province_code != destination.province.code {
            return false;
        }
        if let Some(district) = &self.district_code {
            if *district != destination.district.code {
                return false;
            }
        }
        match &self.ward_code {
            Some(ward) => destination.ward_code() == Some(ward.as_str()),
            None => true,
        }
    }
}

/// Summary row for provider listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
}

/// Everything a provider publishes about its shipping offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCatalog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub zones: Vec<ShippingZone>,
    #[serde(default)]
    pub service_areas: Vec<ServiceArea>,
    #[serde(default)]
    pub delivery_types: Vec<DeliveryTypeConfig>,
}

impl ProviderCatalog {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            zones: Vec::new(),
            service_areas: Vec::new(),
            delivery_types: Vec::new(),
        }
    }

    pub fn with_zone(mut self, zone: ShippingZone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn with_service_area(mut self, area: ServiceArea) -> Self {
        self.service_areas.push(area);
        self
    }

    pub fn with_delivery_type(mut self, config: DeliveryTypeConfig) -> Self {
        self.delivery_types.push(config);
        self
    }

    pub fn delivery_type(&self, delivery_type: DeliveryType) -> Option<&DeliveryTypeConfig> {
        self.delivery_types
            .iter()
            .find(|d| d.delivery_type == delivery_type)
    }

    pub fn summary(&self) -> ProviderSummary {
        ProviderSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Check the reference-data invariants of this catalog
    ///
    /// When `locations` is non-empty, service area codes must also exist in it.
    pub fn validate(&self, locations: &LocationDirectory) -> Result<(), ConfigError> {
        let context = |what: &str| format!("provider '{}' {}", self.id, what);

        let mut zone_ids = HashSet::new();
        for zone in &self.zones {
            if !zone_ids.insert(zone.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "zone".to_string(),
                    id: zone.id.clone(),
                });
            }
            if zone.delivery_days > MAX_DELIVERY_DAYS {
                return Err(ConfigError::InvalidValue {
                    field: "delivery_days".to_string(),
                    value: zone.delivery_days.to_string(),
                    message: context(&format!(
                        "zone '{}' must deliver within {} days",
                        zone.id, MAX_DELIVERY_DAYS
                    )),
                });
            }
        }

        let mut area_ids = HashSet::new();
        for area in &self.service_areas {
            if !area_ids.insert(area.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "service area".to_string(),
                    id: area.id.clone(),
                });
            }
            if !zone_ids.contains(area.zone_id.as_str()) {
                return Err(ConfigError::UnknownReference {
                    kind: "zone".to_string(),
                    id: area.zone_id.clone(),
                    context: context(&format!("service area '{}'", area.id)),
                });
            }
            if area.ward_code.is_some() && area.district_code.is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "ward_code".to_string(),
                    value: area.ward_code.clone().unwrap_or_default(),
                    message: format!("service area '{}' sets a ward without a district", area.id),
                });
            }
            if !locations.is_empty() {
                validate_area_locality(area, locations, &context)?;
            }
        }

        let mut types = HashSet::new();
        for config in &self.delivery_types {
            if !types.insert(config.delivery_type) {
                return Err(ConfigError::DuplicateId {
                    kind: "delivery type".to_string(),
                    id: config.delivery_type.to_string(),
                });
            }
            if !config.cost_multiplier.is_finite() || config.cost_multiplier < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "cost_multiplier".to_string(),
                    value: config.cost_multiplier.to_string(),
                    message: context("requires a finite, non-negative multiplier"),
                });
            }
            for zone_id in &config.available_areas {
                if !zone_ids.contains(zone_id.as_str()) {
                    return Err(ConfigError::UnknownReference {
                        kind: "zone".to_string(),
                        id: zone_id.clone(),
                        context: context(&format!("delivery type {}", config.delivery_type)),
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_area_locality(
    area: &ServiceArea,
    locations: &LocationDirectory,
    context: &dyn Fn(&str) -> String,
) -> Result<(), ConfigError> {
    let unknown = |kind: &str, id: &str| ConfigError::UnknownReference {
        kind: kind.to_string(),
        id: id.to_string(),
        context: context(&format!("service area '{}'", area.id)),
    };

    let province = locations
        .province(&area.province_code)
        .ok_or_else(|| unknown("province", &area.province_code))?;

    if let Some(district_code) = &area.district_code {
        let district = province
            .district(district_code)
            .ok_or_else(|| unknown("district", district_code))?;
        if let Some(ward_code) = &area.ward_code {
            district
                .ward(ward_code)
                .ok_or_else(|| unknown("ward", ward_code))?;
        }
    }

    Ok(())
}
