//! Distance and radius helpers.
//!
//! [`distance`] is a true great-circle distance. The radius helpers are
//! a linear degrees-per-metre approximation used as a cheap box
//! pre-filter; they are accurate enough near mid-latitudes only.

use crate::types::location::Coordinate;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Degrees per metre used by [`degrees_for_radius`].
pub const DEGREES_PER_METRE: f64 = 0.000008988122901;

/// Great-circle distance in metres between two coordinates.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_METRES * c
}

/// Converts a radius in metres into a degree offset.
pub fn degrees_for_radius(radius_metres: f64) -> f64 {
    radius_metres * DEGREES_PER_METRE
}

/// Whether `point` lies strictly inside the square of half-width
/// [`degrees_for_radius`] centred on `origin`. A box test, not a circle.
pub fn axis_aligned_within_radius(
    origin: &Coordinate,
    point: &Coordinate,
    radius_metres: f64,
) -> bool {
    let radius = degrees_for_radius(radius_metres);
    let within_lat = (origin.lat() - radius) < point.lat() && point.lat() < (origin.lat() + radius);
    let within_lon = (origin.lon() - radius) < point.lon() && point.lon() < (origin.lon() + radius);
    within_lat && within_lon
}
