//! Expanding-radius proximity search.
//!
//! The dataset is a few thousand static points, so a linear scan beats
//! building a spatial index. The first pass uses the inner radius; if it
//! finds fewer than [`SearchConfig::min_results`] facilities, a second
//! pass with the outer radius tops the result up.

use std::collections::HashSet;

use crate::config::SearchConfig;
use crate::error::{ParkingError, Result};
use crate::types::facility::ParkingFacility;
use crate::types::location::Coordinate;
use crate::utils::dataset::Dataset;
use crate::utils::haversine::{axis_aligned_within_radius, distance};

/// A facility found by a search, with its distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby<'a> {
    pub facility: &'a ParkingFacility,
    pub distance_metres: f64,
}

/// Ordered search hits. A facility id never appears twice.
pub type ProximityResult<'a> = Vec<Nearby<'a>>;

/// Finds facilities near `origin`.
///
/// # Arguments
/// * `dataset` - The facilities to scan.
/// * `origin` - The resolved search location.
/// * `config` - Radii, widening threshold and ordering.
///
/// # Returns
/// Hits in dataset order (or by distance if
/// [`SearchConfig::sort_by_distance`] is set), or
/// [`ParkingError::NoResultsFound`] if neither pass matched anything.
///
/// # Time Complexity
/// *O*(*n*) per pass, at most two passes.
pub fn search<'a>(
    dataset: &'a Dataset,
    origin: &Coordinate,
    config: &SearchConfig,
) -> Result<ProximityResult<'a>> {
    info!("[1/2] Scanning within {}m of {:?}", config.inner_radius_metres, origin);
    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    scan(dataset, origin, config.inner_radius_metres, &mut seen, &mut hits);
    debug!("phase 1 found {} facilities", hits.len());

    if hits.len() < config.min_results {
        info!(
            "[2/2] Only {} found, widening to {}m",
            hits.len(),
            config.outer_radius_metres
        );
        scan(dataset, origin, config.outer_radius_metres, &mut seen, &mut hits);
        debug!("phase 2 total {} facilities", hits.len());
    }

    if hits.is_empty() {
        warn!("No facilities near {:?}", origin);
        return Err(ParkingError::NoResultsFound);
    }

    if config.sort_by_distance {
        hits.sort_by(|a, b| a.distance_metres.total_cmp(&b.distance_metres));
    }
    Ok(hits)
}

/// One pass over the dataset, appending facilities not yet in `seen`.
fn scan<'a>(
    dataset: &'a Dataset,
    origin: &Coordinate,
    radius_metres: f64,
    seen: &mut HashSet<&'a str>,
    hits: &mut Vec<Nearby<'a>>,
) {
    for facility in dataset.iter() {
        if axis_aligned_within_radius(origin, &facility.location, radius_metres)
            && seen.insert(facility.uid.as_str())
        {
            hits.push(Nearby {
                facility,
                distance_metres: distance(origin, &facility.location),
            });
        }
    }
}

#[cfg(test)]
mod search_tests {
    use super::*;
    use crate::types::facility::FacilityAttributes;
    use crate::utils::generator::generate_facilities_near;
    use crate::utils::haversine::degrees_for_radius;

    const ORIGIN: Coordinate = Coordinate::new_unchecked(51.5074, -0.1278);

    fn facility(uid: &str, lat: f64, lon: f64) -> ParkingFacility {
        ParkingFacility {
            uid: uid.to_string(),
            location: Coordinate::new_unchecked(lat, lon),
            attributes: FacilityAttributes::default(),
        }
    }

    /// A facility offset from [`ORIGIN`] by `metres` along latitude.
    fn north_of_origin(uid: &str, metres: f64) -> ParkingFacility {
        facility(uid, ORIGIN.lat() + degrees_for_radius(metres), ORIGIN.lon())
    }

    fn ids(hits: &ProximityResult) -> Vec<String> {
        hits.iter().map(|n| n.facility.uid.clone()).collect()
    }

    #[test]
    fn test_phase_one_only_returns_inner_facilities() {
        let mut facilities = generate_facilities_near("IN", &ORIGIN, 250.0, 6, 3);
        facilities.push(north_of_origin("MID", 300.0));
        facilities.push(north_of_origin("FAR", 2000.0));
        let dataset = Dataset::new(facilities).unwrap();

        let hits = search(&dataset, &ORIGIN, &SearchConfig::default()).unwrap();
        let mut got = ids(&hits);
        got.sort();
        let expected: Vec<String> = (0..6).map(|i| format!("IN{i:06}")).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_phase_two_skipped_when_enough_results() {
        let mut facilities = generate_facilities_near("IN", &ORIGIN, 250.0, 5, 9);
        facilities.push(north_of_origin("MID", 300.0));
        let dataset = Dataset::new(facilities).unwrap();

        let narrow = search(&dataset, &ORIGIN, &SearchConfig::default()).unwrap();
        let wide = search(
            &dataset,
            &ORIGIN,
            &SearchConfig {
                outer_radius_metres: 5000.0,
                ..SearchConfig::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&narrow), ids(&wide));
        assert_eq!(narrow.len(), 5);
    }

    #[test]
    fn test_phase_two_widens_without_duplicates() {
        let dataset = Dataset::new(vec![
            north_of_origin("A", 10.0),
            north_of_origin("B", 100.0),
            north_of_origin("C", 300.0),
            north_of_origin("D", 349.0),
            north_of_origin("E", 400.0),
        ])
        .unwrap();

        let hits = search(&dataset, &ORIGIN, &SearchConfig::default()).unwrap();
        assert_eq!(ids(&hits), vec!["A", "B", "C", "D"]);
        let unique: HashSet<_> = hits.iter().map(|n| n.facility.uid.as_str()).collect();
        assert_eq!(unique.len(), hits.len());
    }

    #[test]
    fn test_no_results() {
        let dataset = Dataset::new(vec![
            north_of_origin("FAR", 351.0),
            north_of_origin("FARTHER", 5000.0),
        ])
        .unwrap();
        assert!(matches!(
            search(&dataset, &ORIGIN, &SearchConfig::default()),
            Err(ParkingError::NoResultsFound)
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        assert!(matches!(
            search(&dataset, &ORIGIN, &SearchConfig::default()),
            Err(ParkingError::NoResultsFound)
        ));
    }

    #[test]
    fn test_dataset_order_preserved_by_default() {
        let dataset = Dataset::new(vec![
            north_of_origin("FAR", 200.0),
            north_of_origin("NEAR", 20.0),
            north_of_origin("MIDDLE", 100.0),
        ])
        .unwrap();
        let hits = search(&dataset, &ORIGIN, &SearchConfig::default()).unwrap();
        assert_eq!(ids(&hits), vec!["FAR", "NEAR", "MIDDLE"]);
    }

    #[test]
    fn test_sort_by_distance() {
        let dataset = Dataset::new(vec![
            north_of_origin("FAR", 200.0),
            north_of_origin("NEAR", 20.0),
            north_of_origin("MIDDLE", 100.0),
        ])
        .unwrap();
        let config = SearchConfig {
            sort_by_distance: true,
            ..SearchConfig::default()
        };
        let hits = search(&dataset, &ORIGIN, &config).unwrap();
        assert_eq!(ids(&hits), vec!["NEAR", "MIDDLE", "FAR"]);
        assert!(hits[0].distance_metres < hits[1].distance_metres);
    }

    #[test]
    fn test_distances_attached() {
        let dataset = Dataset::new(vec![facility("SELF", ORIGIN.lat(), ORIGIN.lon())]).unwrap();
        let hits = search(&dataset, &ORIGIN, &SearchConfig::default()).unwrap();
        assert_eq!(hits[0].distance_metres, 0.0);
    }
}
