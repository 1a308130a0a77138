//! Distance between two resolved addresses

use crate::core::location::{Address, Coordinates};
use serde::{Deserialize, Serialize};

/// Mean earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Proxy distances used when coordinates are missing, indexed by how far
/// apart the two addresses are in the administrative tree
pub const SAME_WARD_UNITS: f64 = 0.0;
pub const SAME_DISTRICT_UNITS: f64 = 1.0;
pub const SAME_PROVINCE_UNITS: f64 = 2.0;
pub const CROSS_PROVINCE_UNITS: f64 = 3.0;

/// How a distance was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// Great-circle distance between coordinates
    Geodesic,
    /// Fixed units derived from the administrative hierarchy
    AdministrativeProxy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub kilometers: f64,
    pub source: DistanceSource,
}

/// Great-circle distance in kilometers
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal points
    let a = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Deterministic fallback: same ward 0, same district 1, same province 2,
/// otherwise 3
///
/// Two addresses only count as "same ward" when both carry the same ward.
pub fn administrative_proxy(from: &Address, to: &Address) -> f64 {
    if from.province.code != to.province.code {
        return CROSS_PROVINCE_UNITS;
    }
    if from.district.code != to.district.code {
        return SAME_PROVINCE_UNITS;
    }
    match (from.ward_code(), to.ward_code()) {
        (Some(a), Some(b)) if a == b => SAME_WARD_UNITS,
        _ => SAME_DISTRICT_UNITS,
    }
}

/// Haversine when both sides have coordinates, administrative proxy otherwise
pub fn measure(from: &Address, to: &Address) -> Distance {
    match (from.coordinates, to.coordinates) {
        (Some(a), Some(b)) => Distance {
            kilometers: haversine_km(a, b),
            source: DistanceSource::Geodesic,
        },
        _ => Distance {
            kilometers: administrative_proxy(from, to),
            source: DistanceSource::AdministrativeProxy,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::AdministrativeUnit;

    fn address(province: &str, district: &str, ward: Option<&str>) -> Address {
        let unit = |code: &str| AdministrativeUnit {
            code: code.to_string(),
            name: code.to_string(),
        };
        Address {
            street: String::new(),
            province: unit(province),
            district: unit(district),
            ward: ward.map(unit),
            coordinates: None,
        }
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let p = Coordinates::new(10.7769, 106.7009);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_hanoi_to_saigon() {
        let hanoi = Coordinates::new(21.0285, 105.8542);
        let saigon = Coordinates::new(10.8231, 106.6297);
        let d = haversine_km(hanoi, saigon);
        assert!((1130.0..1150.0).contains(&d), "got {}", d);
    }

    #[test]
    fn test_haversine_antipodal_points_stay_finite() {
        let pairs = [
            (Coordinates::new(-87.843, -179.0), Coordinates::new(87.843, 1.0)),
            (Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0)),
            (Coordinates::new(90.0, 0.0), Coordinates::new(-90.0, 0.0)),
        ];
        let half_circumference = EARTH_RADIUS_KM * std::f64::consts::PI;

        for (a, b) in pairs {
            let d = haversine_km(a, b);
            assert!(d.is_finite(), "{:?} -> {:?} gave {}", a, b, d);
            assert!((d - half_circumference).abs() < 1.0, "got {}", d);
        }
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = Coordinates::new(16.0544, 108.2022);
        let b = Coordinates::new(12.2388, 109.1967);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_administrative_proxy_levels() {
        let a = address("79", "760", Some("26734"));
        assert_eq!(administrative_proxy(&a, &a), SAME_WARD_UNITS);
        assert_eq!(
            administrative_proxy(&a, &address("79", "760", Some("26737"))),
            SAME_DISTRICT_UNITS
        );
        assert_eq!(
            administrative_proxy(&a, &address("79", "760", None)),
            SAME_DISTRICT_UNITS
        );
        assert_eq!(
            administrative_proxy(&a, &address("79", "769", None)),
            SAME_PROVINCE_UNITS
        );
        assert_eq!(
            administrative_proxy(&a, &address("01", "001", None)),
            CROSS_PROVINCE_UNITS
        );
    }

    #[test]
    fn test_measure_falls_back_without_coordinates() {
        let mut from = address("79", "760", None);
        let to = address("01", "001", None);
        from.coordinates = Some(Coordinates::new(10.77, 106.70));

        let d = measure(&from, &to);
        assert_eq!(d.source, DistanceSource::AdministrativeProxy);
        assert_eq!(d.kilometers, CROSS_PROVINCE_UNITS);
    }
}
