//! Bicycle Parking Finder Library.
//! Locates parking facilities near a place and renders them as map
//! features.
//!
//! A request either names a facility id ([`lookup_details`]) or a
//! location, which goes through [`CoordinateResolver`], [`search`] and
//! [`aggregate`] in that order.

#[macro_use]
extern crate log;

pub mod config;
pub mod error;

pub mod types {
    pub mod facility;
    pub mod feature;
    pub mod location;
    pub mod query;
}

pub mod utils {
    pub mod dataset;
    pub mod generator;
    pub mod geocoder;
    pub mod haversine;
    pub mod resolver;
}

pub mod algorithms {
    pub mod aggregate;
    pub mod details;
    pub mod search;
}

pub mod server {
    pub mod api;
}

pub use algorithms::aggregate::aggregate;
pub use algorithms::details::lookup_details;
pub use algorithms::search::search;
pub use error::{ParkingError, Result};
pub use types::location::Coordinate;
pub use utils::resolver::CoordinateResolver;
