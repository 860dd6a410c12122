//! Synthetic facility generation for fixtures and load testing.
//!
//! All generators take a seed so the same call always yields the same
//! facilities.

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::haversine::degrees_for_radius;
use crate::types::facility::{
    AttributeValue, FacilityAttributes, ParkingFacility, STAND_TYPE_PRIORITY,
};
use crate::types::location::Coordinate;

/// Generates `count` facilities whose coordinates fall strictly inside
/// the axis-aligned box of `radius_metres` around `center`.
///
/// Ids are `{prefix}{index}` zero-padded to six digits. Each facility
/// gets a random capacity and exactly one stand-type flag set.
pub fn generate_facilities_near(
    prefix: &str,
    center: &Coordinate,
    radius_metres: f64,
    count: usize,
    seed: u64,
) -> Vec<ParkingFacility> {
    let mut rng = StdRng::seed_from_u64(seed);
    // stay just inside the box so strict comparisons hold
    let half_width = degrees_for_radius(radius_metres) * 0.99;

    (0..count)
        .map(|index| {
            let latitude = center.lat() + rng.gen_range(-half_width..half_width);
            let longitude = center.lon() + rng.gen_range(-half_width..half_width);
            let stand = STAND_TYPE_PRIORITY[rng.gen_range(0..STAND_TYPE_PRIORITY.len())];
            ParkingFacility {
                uid: format!("{prefix}{index:06}"),
                location: Coordinate::new_unchecked(latitude, longitude),
                attributes: FacilityAttributes::from([
                    ("PRK_CPT", AttributeValue::Int(rng.gen_range(2..40))),
                    (stand.code(), AttributeValue::Bool(true)),
                ]),
            }
        })
        .collect()
}

/// Generates `count` coordinates uniformly over the valid ranges.
pub fn random_coordinates(count: usize, seed: u64) -> Vec<Coordinate> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Coordinate::new_unchecked(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0))
        })
        .collect()
}
