//! Struct definitions and implementations for [`Coordinate`].
//!
//! A coordinate is the only geographic primitive of the library: every
//! facility, search origin and map feature is positioned by one.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ParkingError, Result};

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A [`Coordinate`] represents a geographic position in degrees.
///
/// Values are wrapped in [`OrderedFloat`] so coordinates can be
/// compared and hashed, which a plain `f64` does not allow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: OrderedFloat<f64>,
    pub longitude: OrderedFloat<f64>,
}

impl Coordinate {
    /// Creates a coordinate, rejecting values outside
    /// [`LATITUDE_RANGE`] and [`LONGITUDE_RANGE`] as well as NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = (LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude);
        let lon_ok = (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(ParkingError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self::new_unchecked(latitude, longitude))
    }

    /// Creates a coordinate without range validation.
    ///
    /// Only for values that are already known to be valid, such as
    /// compile-time constants.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: OrderedFloat(latitude),
            longitude: OrderedFloat(longitude),
        }
    }

    pub fn lat(&self) -> f64 {
        self.latitude.into_inner()
    }

    pub fn lon(&self) -> f64 {
        self.longitude.into_inner()
    }

    /// GeoJSON position order, `[lon, lat]`.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.lon(), self.lat()]
    }

    /// Display order used by the details endpoint, `[lat, lon]`.
    pub fn to_lat_lon(&self) -> [f64; 2] {
        [self.lat(), self.lon()]
    }
}
