//! Service area matching
//!
//! Finds every zone whose active service areas cover a destination and ranks
//! them: finer locality first, then the cheaper base rate, then zone id so
//! the order never depends on input order.

use crate::core::location::Address;
use crate::shipping::zone::{ServiceArea, ShippingZone, SpecificityRank};
use std::collections::HashMap;

/// A zone that serves the destination, with the best rank it matched at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneMatch<'a> {
    pub zone: &'a ShippingZone,
    pub rank: SpecificityRank,
}

/// Match `destination` against `service_areas`, most specific first
///
/// Areas pointing at a zone id absent from `zones` are skipped.
pub fn match_zones<'a>(
    destination: &Address,
    service_areas: &[ServiceArea],
    zones: &'a [ShippingZone],
) -> Vec<ZoneMatch<'a>> {
    let mut best: HashMap<&str, ZoneMatch<'a>> = HashMap::new();

    for area in service_areas
        .iter()
        .filter(|area| area.is_active && area.covers(destination))
    {
        let Some(zone) = zones.iter().find(|z| z.id == area.zone_id) else {
            tracing::warn!(
                service_area = %area.id,
                zone_id = %area.zone_id,
                "service area references an unknown zone, skipping"
            );
            continue;
        };

        let candidate = ZoneMatch {
            zone,
            rank: area.specificity(),
        };
        best.entry(zone.id.as_str())
            .and_modify(|existing| {
                if candidate.rank > existing.rank {
                    *existing = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut matches: Vec<ZoneMatch<'a>> = best.into_values().collect();
    matches.sort_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then(a.zone.base_rate.cmp(&b.zone.base_rate))
            .then_with(|| a.zone.id.cmp(&b.zone.id))
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::AdministrativeUnit;

    fn destination() -> Address {
        let unit = |code: &str| AdministrativeUnit {
            code: code.to_string(),
            name: code.to_string(),
        };
        Address {
            street: String::new(),
            province: unit("79"),
            district: unit("760"),
            ward: Some(unit("26734")),
            coordinates: None,
        }
    }

    fn zones() -> Vec<ShippingZone> {
        vec![
            ShippingZone::new("south", "South").with_rates(10000, 0, 0),
            ShippingZone::new("inner", "Inner city").with_rates(18000, 0, 0),
            ShippingZone::new("tan-dinh", "Tân Định").with_rates(25000, 0, 0),
            ShippingZone::new("south-promo", "South promo").with_rates(9000, 0, 0),
        ]
    }

    #[test]
    fn test_ward_match_beats_cheaper_province_match() {
        let zones = zones();
        let areas = vec![
            ServiceArea::province("a1", "south", "79"),
            ServiceArea::province("a2", "tan-dinh", "79")
                .with_district("760")
                .with_ward("26734"),
            ServiceArea::province("a3", "inner", "79").with_district("760"),
        ];

        let matches = match_zones(&destination(), &areas, &zones);
        let ids: Vec<&str> = matches.iter().map(|m| m.zone.id.as_str()).collect();
        assert_eq!(ids, vec!["tan-dinh", "inner", "south"]);
        assert_eq!(matches[0].rank, SpecificityRank::Ward);
        assert_eq!(matches[2].rank, SpecificityRank::Province);
    }

    #[test]
    fn test_tie_breaks_on_base_rate() {
        let zones = zones();
        let areas = vec![
            ServiceArea::province("a1", "south", "79"),
            ServiceArea::province("a2", "south-promo", "79"),
        ];

        let matches = match_zones(&destination(), &areas, &zones);
        assert_eq!(matches[0].zone.id, "south-promo");
        assert_eq!(matches[1].zone.id, "south");
    }

    #[test]
    fn test_inactive_areas_are_ignored() {
        let zones = zones();
        let areas = vec![
            ServiceArea::province("a1", "south", "79"),
            ServiceArea::province("a2", "tan-dinh", "79")
                .with_district("760")
                .with_ward("26734")
                .inactive(),
        ];

        let matches = match_zones(&destination(), &areas, &zones);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].zone.id, "south");
    }

    #[test]
    fn test_zone_listed_once_at_best_rank() {
        let zones = zones();
        let areas = vec![
            ServiceArea::province("a1", "inner", "79"),
            ServiceArea::province("a2", "inner", "79").with_district("760"),
        ];

        let matches = match_zones(&destination(), &areas, &zones);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rank, SpecificityRank::District);
    }

    #[test]
    fn test_no_match_and_unknown_zone() {
        let zones = zones();
        let areas = vec![
            ServiceArea::province("a1", "north", "01"),
            ServiceArea::province("a2", "ghost", "79"),
        ];
        assert!(match_zones(&destination(), &areas, &zones).is_empty());
    }
}
