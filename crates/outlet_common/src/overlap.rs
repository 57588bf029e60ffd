//! Service-area overlap detection
//!
//! Every outlet covers a fixed 5 km catchment. Two outlets overlap when the
//! great-circle distance between them is within that radius. Catalogs are
//! small (tens of outlets), so the scan is a plain O(n²) pass over ordered
//! pairs with no spatial index.

use std::collections::HashSet;

use crate::outlet::{Outlet, Position};

/// Catchment radius in kilometres
pub const SERVICE_RADIUS_KM: f64 = 5.0;

/// Catchment radius in metres, as drawn on the map
pub const SERVICE_RADIUS_M: f64 = SERVICE_RADIUS_KM * 1000.0;

/// Two outlets whose catchments intersect, by index into the input list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapPair {
    pub first: usize,
    pub second: usize,
    pub distance_km: f64,
}

pub fn is_within_radius(a: &Position, b: &Position, radius_km: f64) -> bool {
    a.distance_km(b) <= radius_km
}

/// Positions to highlight, using the standard 5 km radius
pub fn overlapping_positions(outlets: &[Outlet]) -> Vec<Position> {
    overlapping_positions_within(outlets, SERVICE_RADIUS_KM)
}

/// Positions of outlets that have at least one other outlet within `radius_km`.
///
/// Both directions of each pair are visited, so if A is flagged because of B
/// then B is flagged because of A. Positions come back deduplicated in
/// first-seen order; outlets without valid coordinates are skipped.
pub fn overlapping_positions_within(outlets: &[Outlet], radius_km: f64) -> Vec<Position> {
    let located: Vec<(usize, Position)> = located(outlets);

    let mut seen = HashSet::new();
    let mut flagged = Vec::new();

    for (i, a) in &located {
        for (j, b) in &located {
            if i != j && is_within_radius(a, b, radius_km) {
                if seen.insert(a.key()) {
                    flagged.push(*a);
                }
                break;
            }
        }
    }

    flagged
}

/// Unordered overlapping pairs (first < second) with their distance
pub fn overlap_pairs(outlets: &[Outlet], radius_km: f64) -> Vec<OverlapPair> {
    let located = located(outlets);
    let mut pairs = Vec::new();

    for (n, (i, a)) in located.iter().enumerate() {
        for (j, b) in &located[n + 1..] {
            let distance_km = a.distance_km(b);
            if distance_km <= radius_km {
                pairs.push(OverlapPair {
                    first: *i,
                    second: *j,
                    distance_km,
                });
            }
        }
    }

    pairs
}

fn located(outlets: &[Outlet]) -> Vec<(usize, Position)> {
    outlets
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.position().map(|p| (i, p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~0.027 degrees of latitude is ~3 km, ~0.09 is ~10 km
    fn klcc() -> Outlet {
        Outlet::at("Subway KLCC", "Suria KLCC", 3.1390, 101.6869)
    }

    #[test]
    fn test_three_km_apart_both_flagged() {
        let outlets = vec![klcc(), Outlet::at("Subway Titiwangsa", "Jalan Pahang", 3.1660, 101.6869)];
        let flagged = overlapping_positions(&outlets);
        assert_eq!(flagged.len(), 2);
    }

    #[test]
    fn test_ten_km_apart_neither_flagged() {
        let outlets = vec![klcc(), Outlet::at("Subway Selayang", "Jalan Ipoh", 3.2290, 101.6869)];
        assert!(overlapping_positions(&outlets).is_empty());
        assert!(overlap_pairs(&outlets, SERVICE_RADIUS_KM).is_empty());
    }

    #[test]
    fn test_single_outlet_never_overlaps_itself() {
        assert!(overlapping_positions(&[klcc()]).is_empty());
    }

    #[test]
    fn test_duplicate_coordinates_collapse() {
        let outlets = vec![klcc(), klcc(), klcc()];
        let flagged = overlapping_positions(&outlets);
        assert_eq!(flagged.len(), 1);
        assert_eq!(overlap_pairs(&outlets, SERVICE_RADIUS_KM).len(), 3);
    }

    #[test]
    fn test_outlets_without_coordinates_skipped() {
        let mut missing = klcc();
        missing.latitude = None;
        let outlets = vec![klcc(), missing];
        assert!(overlapping_positions(&outlets).is_empty());
    }

    #[test]
    fn test_pairs_report_distance() {
        let outlets = vec![klcc(), Outlet::at("Subway Titiwangsa", "Jalan Pahang", 3.1660, 101.6869)];
        let pairs = overlap_pairs(&outlets, SERVICE_RADIUS_KM);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
        assert!((pairs[0].distance_km - 3.0).abs() < 0.05);
    }
}
