//! Runtime configuration.
//!
//! [`Config`] is parsed from the command line with environment
//! fallbacks; the narrower [`SearchConfig`] and [`GeocoderConfig`] are
//! derived from it and handed to the components that need them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Half-width of the first search pass.
pub const INNER_RADIUS_METRES: f64 = 250.0;
/// Half-width of the widened second pass.
pub const OUTER_RADIUS_METRES: f64 = 350.0;
/// Below this many first-pass results the search widens.
pub const MIN_RESULTS: usize = 5;
/// Default geocoder timeout.
pub const GEOCODER_TIMEOUT_SECS: u64 = 10;
/// Identifying client tag sent to the geocoder.
pub const USER_AGENT: &str = "parkmybike-app/1.0";
/// Public Nominatim instance.
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Command line and environment configuration of the server.
#[derive(Debug, Clone, Parser)]
#[command(name = "parkmybike-server", version, about = "Bicycle parking search API")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "PARKMYBIKE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// GeoJSON file with the parking facilities
    #[arg(long, env = "PARKMYBIKE_DATASET", default_value = "cycle_parking.json")]
    pub dataset: PathBuf,

    /// Base URL of the Nominatim-compatible geocoder
    #[arg(long, env = "PARKMYBIKE_GEOCODER_URL", default_value = NOMINATIM_URL)]
    pub geocoder_url: String,

    /// User agent sent to the geocoder
    #[arg(long, env = "PARKMYBIKE_USER_AGENT", default_value = USER_AGENT)]
    pub user_agent: String,

    /// Geocoder timeout in seconds
    #[arg(long, env = "PARKMYBIKE_GEOCODER_TIMEOUT_SECS", default_value_t = GEOCODER_TIMEOUT_SECS)]
    pub geocoder_timeout_secs: u64,

    /// Sort search results by distance instead of dataset order
    #[arg(long, env = "PARKMYBIKE_SORT_BY_DISTANCE")]
    pub sort_by_distance: bool,
}

impl Config {
    pub fn geocoder(&self) -> GeocoderConfig {
        GeocoderConfig {
            base_url: self.geocoder_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.geocoder_timeout_secs),
        }
    }

    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            sort_by_distance: self.sort_by_distance,
            ..SearchConfig::default()
        }
    }
}

/// Settings of the external geocoder client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: NOMINATIM_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(GEOCODER_TIMEOUT_SECS),
        }
    }
}

/// Parameters of the two-phase proximity search.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SearchConfig {
    pub inner_radius_metres: f64,
    pub outer_radius_metres: f64,
    pub min_results: usize,
    pub sort_by_distance: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            inner_radius_metres: INNER_RADIUS_METRES,
            outer_radius_metres: OUTER_RADIUS_METRES,
            min_results: MIN_RESULTS,
            sort_by_distance: false,
        }
    }
}
