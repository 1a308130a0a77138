//! Configuration loading and management
//!
//! A [`ShippingConfig`] carries the estimator tunables, the storefront
//! currency and the reference data (locations and provider catalogs) used to
//! seed the in-memory services. Several configs can be merged, which lets a
//! deployment keep locations and providers in separate files.

use crate::core::error::ConfigError;
use crate::core::location::{District, LocationDirectory, Province, Ward};
use crate::core::money::{Currency, Money};
use crate::shipping::{
    DeliveryType, DeliveryTypeConfig, EstimatorSettings, ProviderCatalog, ServiceArea,
    ShippingZone,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete configuration for the shipping service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Estimator tunables (defaults apply when absent)
    #[serde(default)]
    pub estimator: Option<EstimatorSettings>,

    /// Storefront currency (VND when absent)
    #[serde(default)]
    pub currency: Option<Currency>,

    /// Province -> district -> ward tree
    #[serde(default)]
    pub locations: Vec<Province>,

    /// Shipping providers with their zones, service areas and delivery types
    #[serde(default)]
    pub providers: Vec<ProviderCatalog>,
}

impl ShippingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shipping config '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn estimator_settings(&self) -> EstimatorSettings {
        self.estimator.clone().unwrap_or_default()
    }

    pub fn currency(&self) -> Currency {
        self.currency.clone().unwrap_or_default()
    }

    pub fn location_directory(&self) -> LocationDirectory {
        LocationDirectory::new(self.locations.clone())
    }

    pub fn provider(&self, provider_id: &str) -> Option<&ProviderCatalog> {
        self.providers.iter().find(|p| p.id == provider_id)
    }

    /// Merge several configurations into one
    ///
    /// Provinces are keyed by code and providers by id; on conflict the last
    /// config wins. Estimator settings and currency are taken from the last
    /// config that sets them.
    pub fn merge(configs: Vec<ShippingConfig>) -> ShippingConfig {
        let mut merged = ShippingConfig::default();

        for config in configs {
            if config.estimator.is_some() {
                merged.estimator = config.estimator;
            }
            if config.currency.is_some() {
                merged.currency = config.currency;
            }

            for province in config.locations {
                match merged.locations.iter_mut().find(|p| p.code == province.code) {
                    Some(existing) => {
                        tracing::warn!(province = %province.code, "province redefined, last definition wins");
                        *existing = province;
                    }
                    None => merged.locations.push(province),
                }
            }

            for provider in config.providers {
                match merged.providers.iter_mut().find(|p| p.id == provider.id) {
                    Some(existing) => {
                        tracing::warn!(provider = %provider.id, "provider redefined, last definition wins");
                        *existing = provider;
                    }
                    None => merged.providers.push(provider),
                }
            }
        }

        merged
    }

    /// Check every reference-data invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator_settings().validate()?;

        let currency = self.currency();
        if currency.minor_units_per_major == 0 {
            return Err(ConfigError::InvalidValue {
                field: "currency.minor_units_per_major".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let mut province_codes = HashSet::new();
        for province in &self.locations {
            if !province_codes.insert(province.code.as_str()) {
                return Err(duplicate("province", &province.code));
            }
            let mut district_codes = HashSet::new();
            for district in &province.districts {
                if !district_codes.insert(district.code.as_str()) {
                    return Err(duplicate("district", &district.code));
                }
                let mut ward_codes = HashSet::new();
                for ward in &district.wards {
                    if !ward_codes.insert(ward.code.as_str()) {
                        return Err(duplicate("ward", &ward.code));
                    }
                }
            }
        }

        let directory = self.location_directory();
        let mut provider_ids = HashSet::new();
        for provider in &self.providers {
            if !provider_ids.insert(provider.id.as_str()) {
                return Err(duplicate("provider", &provider.id));
            }
            provider.validate(&directory)?;
        }

        Ok(())
    }

    /// Create a default configuration for testing
    ///
    /// Three provinces (Hồ Chí Minh, Hà Nội, Đà Nẵng) and one provider, "ghn",
    /// that serves the first two but not Đà Nẵng.
    pub fn default_config() -> Self {
        Self {
            estimator: Some(EstimatorSettings {
                utc_offset_minutes: 7 * 60,
                ..EstimatorSettings::default()
            }),
            currency: Some(Currency::new("VND", 1)),
            locations: vec![
                province(
                    "79",
                    "Thành phố Hồ Chí Minh",
                    vec![
                        district(
                            "760",
                            "Quận 1",
                            &[("26734", "Phường Tân Định"), ("26740", "Phường Bến Nghé")],
                        ),
                        district("769", "Thành phố Thủ Đức", &[("26800", "Phường Linh Xuân")]),
                    ],
                ),
                province(
                    "01",
                    "Thành phố Hà Nội",
                    vec![district("001", "Quận Ba Đình", &[("00001", "Phường Phúc Xá")])],
                ),
                province(
                    "48",
                    "Thành phố Đà Nẵng",
                    vec![district("490", "Quận Hải Châu", &[])],
                ),
            ],
            providers: vec![
                ProviderCatalog::new("ghn", "Giao Hàng Nhanh")
                    .with_zone(
                        ShippingZone::new("south", "Miền Nam")
                            .with_rates(22000, 500, 800)
                            .with_delivery_days(2),
                    )
                    .with_zone(
                        ShippingZone::new("hcm-inner", "Nội thành HCM")
                            .with_rates(18000, 400, 1000)
                            .with_delivery_days(1),
                    )
                    .with_zone(
                        ShippingZone::new("ben-nghe", "Bến Nghé")
                            .with_rates(15000, 400, 1000)
                            .with_delivery_days(1),
                    )
                    .with_zone(
                        ShippingZone::new("north", "Miền Bắc")
                            .with_rates(30000, 800, 500)
                            .with_delivery_days(4),
                    )
                    .with_service_area(ServiceArea::province("ghn-79", "south", "79"))
                    .with_service_area(
                        ServiceArea::province("ghn-79-760", "hcm-inner", "79").with_district("760"),
                    )
                    .with_service_area(
                        ServiceArea::province("ghn-79-769", "hcm-inner", "79").with_district("769"),
                    )
                    .with_service_area(
                        ServiceArea::province("ghn-79-760-26740", "ben-nghe", "79")
                            .with_district("760")
                            .with_ward("26740"),
                    )
                    .with_service_area(ServiceArea::province("ghn-01", "north", "01"))
                    .with_delivery_type(
                        DeliveryTypeConfig::new(DeliveryType::Standard)
                            .available_in(["south", "hcm-inner", "ben-nghe", "north"]),
                    )
                    .with_delivery_type(
                        DeliveryTypeConfig::new(DeliveryType::Express)
                            .with_multiplier(1.5)
                            .with_time_reduction(1)
                            .with_surcharge(Money::from_minor(5000))
                            .available_in(["south", "hcm-inner", "ben-nghe", "north"]),
                    )
                    .with_delivery_type(
                        DeliveryTypeConfig::new(DeliveryType::SameDay)
                            .with_multiplier(2.0)
                            .with_time_reduction(1)
                            .with_surcharge(Money::from_minor(10000))
                            .available_in(["hcm-inner", "ben-nghe"]),
                    )
                    .with_delivery_type(
                        DeliveryTypeConfig::new(DeliveryType::Weekend)
                            .with_multiplier(1.2)
                            .with_surcharge(Money::from_minor(8000))
                            .available_in(["south", "hcm-inner"]),
                    ),
            ],
        }
    }
}

fn duplicate(kind: &str, id: &str) -> ConfigError {
    ConfigError::DuplicateId {
        kind: kind.to_string(),
        id: id.to_string(),
    }
}

fn province(code: &str, name: &str, districts: Vec<District>) -> Province {
    Province {
        code: code.to_string(),
        name: name.to_string(),
        districts,
    }
}

fn district(code: &str, name: &str, wards: &[(&str, &str)]) -> District {
    District {
        code: code.to_string(),
        name: name.to_string(),
        wards: wards
            .iter()
            .map(|(code, name)| Ward {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}
