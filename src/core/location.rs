//! Administrative locations and address resolution
//!
//! Addresses arrive from clients as a set of administrative codes
//! ([`AddressInput`]). They are resolved against a [`LocationDirectory`]
//! (province -> district -> ward) into a fully named [`Address`]. Because the
//! directory is a tree, a resolved address always satisfies "ward belongs to
//! district, district belongs to province".

use crate::core::validation::validators::{validate_code, validate_coordinates};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Level in the administrative hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrativeLevel {
    Province,
    District,
    Ward,
}

impl fmt::Display for AdministrativeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdministrativeLevel::Province => write!(f, "province"),
            AdministrativeLevel::District => write!(f, "district"),
            AdministrativeLevel::Ward => write!(f, "ward"),
        }
    }
}

/// A named administrative unit with a stable code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdministrativeUnit {
    pub code: String,
    pub name: String,
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Unresolved address as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AddressInput {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub street: String,

    #[validate(custom(function = "validate_code"))]
    pub province_code: String,

    #[validate(custom(function = "validate_code"))]
    pub district_code: String,

    #[serde(default)]
    #[validate(custom(function = "validate_code"))]
    pub ward_code: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_coordinates"))]
    pub coordinates: Option<Coordinates>,
}

impl AddressInput {
    pub fn new(province_code: impl Into<String>, district_code: impl Into<String>) -> Self {
        Self {
            street: String::new(),
            province_code: province_code.into(),
            district_code: district_code.into(),
            ward_code: None,
            coordinates: None,
        }
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    pub fn with_ward(mut self, ward_code: impl Into<String>) -> Self {
        self.ward_code = Some(ward_code.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates::new(latitude, longitude));
        self
    }
}

/// Fully resolved address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub province: AdministrativeUnit,
    pub district: AdministrativeUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward: Option<AdministrativeUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Address {
    pub fn ward_code(&self) -> Option<&str> {
        self.ward.as_ref().map(|w| w.code.as_str())
    }
}

/// A code that could not be found in the directory
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {level} code '{code}'")]
pub struct UnresolvedLocation {
    pub level: AdministrativeLevel,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub wards: Vec<Ward>,
}

impl District {
    pub fn ward(&self, code: &str) -> Option<&Ward> {
        self.wards.iter().find(|w| w.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub districts: Vec<District>,
}

impl Province {
    pub fn district(&self, code: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.code == code)
    }
}

/// Read-only administrative reference data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDirectory {
    pub provinces: Vec<Province>,
}

impl LocationDirectory {
    pub fn new(provinces: Vec<Province>) -> Self {
        Self { provinces }
    }

    pub fn province(&self, code: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    /// Resolve an address input into named administrative units
    ///
    /// Province and district are mandatory. A ward code is optional, but when
    /// present it must belong to the resolved district.
    pub fn resolve(&self, input: &AddressInput) -> Result<Address, UnresolvedLocation> {
        let province = self
            .province(&input.province_code)
            .ok_or_else(|| UnresolvedLocation {
                level: AdministrativeLevel::Province,
                code: input.province_code.clone(),
            })?;

        let district = province
            .district(&input.district_code)
            .ok_or_else(|| UnresolvedLocation {
                level: AdministrativeLevel::District,
                code: input.district_code.clone(),
            })?;

        let ward = match &input.ward_code {
            Some(code) => {
                let ward = district.ward(code).ok_or_else(|| UnresolvedLocation {
                    level: AdministrativeLevel::Ward,
                    code: code.clone(),
                })?;
                Some(AdministrativeUnit {
                    code: ward.code.clone(),
                    name: ward.name.clone(),
                })
            }
            None => None,
        };

        Ok(Address {
            street: input.street.clone(),
            province: AdministrativeUnit {
                code: province.code.clone(),
                name: province.name.clone(),
            },
            district: AdministrativeUnit {
                code: district.code.clone(),
                name: district.name.clone(),
            },
            ward,
            coordinates: input.coordinates,
        })
    }
}
