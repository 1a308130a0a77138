//! Delivery types and their per-provider configuration

use crate::core::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipping speed tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    Standard,
    Express,
    SameDay,
    Weekend,
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 4] = [
        DeliveryType::Standard,
        DeliveryType::Express,
        DeliveryType::SameDay,
        DeliveryType::Weekend,
    ];

    /// Floor applied after subtracting the time reduction
    pub fn minimum_delivery_days(self) -> u32 {
        match self {
            DeliveryType::SameDay => 0,
            _ => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryType::Standard => "STANDARD",
            DeliveryType::Express => "EXPRESS",
            DeliveryType::SameDay => "SAME_DAY",
            DeliveryType::Weekend => "WEEKEND",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_multiplier() -> f64 {
    1.0
}

/// How a provider prices and schedules one delivery type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTypeConfig {
    pub delivery_type: DeliveryType,

    /// Applied to the zone subtotal
    #[serde(default = "default_multiplier")]
    pub cost_multiplier: f64,

    /// Days subtracted from the zone's standard delivery days
    #[serde(default)]
    pub time_reduction: u32,

    /// Flat amount added after the multiplier
    #[serde(default)]
    pub surcharge: Money,

    /// Zone ids where this delivery type is offered
    #[serde(default)]
    pub available_areas: Vec<String>,
}

impl DeliveryTypeConfig {
    pub fn new(delivery_type: DeliveryType) -> Self {
        Self {
            delivery_type,
            cost_multiplier: 1.0,
            time_reduction: 0,
            surcharge: Money::ZERO,
            available_areas: Vec::new(),
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.cost_multiplier = multiplier;
        self
    }

    pub fn with_time_reduction(mut self, days: u32) -> Self {
        self.time_reduction = days;
        self
    }

    pub fn with_surcharge(mut self, surcharge: Money) -> Self {
        self.surcharge = surcharge;
        self
    }

    pub fn available_in<I, S>(mut self, zone_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_areas = zone_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_offered_in(&self, zone_id: &str) -> bool {
        self.available_areas.iter().any(|id| id == zone_id)
    }

    /// `subtotal * cost_multiplier + surcharge`
    pub fn apply_to(&self, subtotal: Money) -> Money {
        subtotal.scale(self.cost_multiplier) + self.surcharge
    }

    /// Zone delivery days after the reduction, floored per delivery type
    pub fn delivery_days(&self, zone_delivery_days: u32) -> u32 {
        zone_delivery_days
            .saturating_sub(self.time_reduction)
            .max(self.delivery_type.minimum_delivery_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DeliveryType::SameDay).unwrap();
        assert_eq!(json, "\"SAME_DAY\"");
        let parsed: DeliveryType = serde_json::from_str("\"WEEKEND\"").unwrap();
        assert_eq!(parsed, DeliveryType::Weekend);
        assert_eq!(DeliveryType::Express.to_string(), "EXPRESS");
    }

    #[test]
    fn test_express_pricing() {
        let express = DeliveryTypeConfig::new(DeliveryType::Express)
            .with_multiplier(1.5)
            .with_surcharge(Money::from_minor(5000))
            .with_time_reduction(1);
        assert_eq!(
            express.apply_to(Money::from_minor(32500)),
            Money::from_minor(53750)
        );
        assert_eq!(express.delivery_days(3), 2);
    }

    #[test]
    fn test_delivery_days_floor() {
        let express = DeliveryTypeConfig::new(DeliveryType::Express).with_time_reduction(5);
        assert_eq!(express.delivery_days(2), 1);

        let same_day = DeliveryTypeConfig::new(DeliveryType::SameDay).with_time_reduction(5);
        assert_eq!(same_day.delivery_days(2), 0);
    }

    #[test]
    fn test_config_defaults_from_yaml() {
        let config: DeliveryTypeConfig = serde_yaml::from_str("delivery_type: STANDARD").unwrap();
        assert_eq!(config.cost_multiplier, 1.0);
        assert_eq!(config.surcharge, Money::ZERO);
        assert!(!config.is_offered_in("anywhere"));
    }
}
