//! External geocoding.
//!
//! [`Geocoder`] is the narrow seam the resolver depends on;
//! [`NominatimGeocoder`] implements it against an OpenStreetMap
//! Nominatim-compatible search endpoint.

use std::future::Future;

use reqwest::Client;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::error::{ParkingError, Result};
use crate::types::location::Coordinate;
use crate::types::query::parse_finite;

/// Translates free text into a coordinate.
pub trait Geocoder: Send + Sync {
    /// Looks up `text`.
    ///
    /// # Returns
    /// `Ok(None)` when the service answered with no results, an
    /// [`ParkingError::UpstreamUnavailable`] when it could not be
    /// reached or answered garbage.
    fn geocode(&self, text: &str) -> impl Future<Output = Result<Option<Coordinate>>> + Send;
}

/// One entry of a Nominatim search response. Coordinates are strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// HTTP client for Nominatim `/search`.
#[derive(Clone, Debug)]
pub struct NominatimGeocoder {
    client: Client,
    search_url: String,
}

impl NominatimGeocoder {
    /// Creates a client tagged with the configured user agent and
    /// bounded by the configured timeout.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ParkingError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, text: &str) -> Result<Option<Coordinate>> {
        debug!("geocoding {:?}", text);
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", text), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                warn!("geocoder request failed: {}", e);
                ParkingError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("geocoder answered HTTP {}", status);
            return Err(ParkingError::UpstreamUnavailable(format!(
                "HTTP {} from geocoder",
                status
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| ParkingError::UpstreamUnavailable(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            debug!("no geocoder results for {:?}", text);
            return Ok(None);
        };

        let (lat, lon) = match (parse_finite(&place.lat), parse_finite(&place.lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(ParkingError::UpstreamUnavailable(format!(
                    "unparseable coordinates {:?}, {:?}",
                    place.lat, place.lon
                )))
            }
        };
        let coordinate = Coordinate::new(lat, lon)
            .map_err(|e| ParkingError::UpstreamUnavailable(e.to_string()))?;
        debug!("geocoded {:?} to {:?}", text, coordinate);
        Ok(Some(coordinate))
    }
}
