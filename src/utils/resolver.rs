//! Resolves a [`LocationQuery`] to a single [`Coordinate`].
//!
//! Resolution order, first match wins:
//! 1. explicit latitude and longitude,
//! 2. a literal `"lat,lon"` string,
//! 3. free text sent to the geocoder,
//! 4. nothing, which fails with [`ParkingError::MissingQuery`].
//!
//! Only step 3 touches the network.

use std::time::Duration;

use super::geocoder::Geocoder;
use crate::error::{ParkingError, Result};
use crate::types::location::Coordinate;
use crate::types::query::{LocationQuery, SearchOrigin};

/// Turns location input into a search origin.
#[derive(Debug, Clone)]
pub struct CoordinateResolver<G> {
    geocoder: G,
    timeout: Duration,
}

impl<G: Geocoder> CoordinateResolver<G> {
    /// `timeout` bounds every geocoder call, independently of any
    /// timeout the geocoder applies itself.
    pub fn new(geocoder: G, timeout: Duration) -> Self {
        Self { geocoder, timeout }
    }

    /// Resolves `query`, keeping it alongside the coordinate.
    pub async fn resolve(&self, query: LocationQuery) -> Result<SearchOrigin> {
        let coordinate = match &query {
            LocationQuery::ExplicitCoordinates {
                latitude,
                longitude,
            }
            | LocationQuery::CoordinateString {
                latitude,
                longitude,
                ..
            } => Coordinate::new(*latitude, *longitude)?,
            LocationQuery::FreeText { text } => self.geocode(text).await?,
            LocationQuery::Empty => return Err(ParkingError::MissingQuery),
        };
        debug!("resolved {:?} to {:?}", query, coordinate);
        Ok(SearchOrigin { coordinate, query })
    }

    async fn geocode(&self, text: &str) -> Result<Coordinate> {
        match tokio::time::timeout(self.timeout, self.geocoder.geocode(text)).await {
            Ok(Ok(Some(coordinate))) => Ok(coordinate),
            Ok(Ok(None)) => Err(ParkingError::LocationNotFound(text.to_string())),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!("geocoder timed out after {:?} for {:?}", self.timeout, text);
                Err(ParkingError::UpstreamUnavailable(format!(
                    "geocoder timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}

#[cfg(test)]
mod resolver_tests {
    use super::*;
    use crate::utils::geocoder::mock::TableGeocoder;

    fn resolver(geocoder: TableGeocoder) -> CoordinateResolver<TableGeocoder> {
        CoordinateResolver::new(geocoder, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_coordinate_string_skips_geocoder() {
        let geocoder = TableGeocoder::default();
        let r = resolver(geocoder.clone());
        let origin = r.resolve(LocationQuery::from_text("51.5,-0.12")).await.unwrap();
        assert_eq!(origin.coordinate, Coordinate::new_unchecked(51.5, -0.12));
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_fields_win_over_text() {
        let geocoder =
            TableGeocoder::default().with_place("Camden", Coordinate::new_unchecked(51.54, -0.14));
        let r = resolver(geocoder.clone());
        let query = LocationQuery::from_parts(Some("Camden"), Some(51.5), Some(-0.12));
        let origin = r.resolve(query).await.unwrap();
        assert_eq!(origin.coordinate, Coordinate::new_unchecked(51.5, -0.12));
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_free_text_is_geocoded() {
        let camden = Coordinate::new_unchecked(51.54, -0.14);
        let geocoder = TableGeocoder::default().with_place("Camden", camden);
        let r = resolver(geocoder.clone());
        let origin = r.resolve(LocationQuery::from_text(" Camden ")).await.unwrap();
        assert_eq!(origin.coordinate, camden);
        assert_eq!(
            origin.query,
            LocationQuery::FreeText {
                text: "Camden".to_string()
            }
        );
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_place() {
        let r = resolver(TableGeocoder::default());
        assert!(matches!(
            r.resolve(LocationQuery::from_text("Atlantis")).await,
            Err(ParkingError::LocationNotFound(t)) if t == "Atlantis"
        ));
    }

    #[tokio::test]
    async fn test_missing_query() {
        let geocoder = TableGeocoder::default();
        let r = resolver(geocoder.clone());
        assert!(matches!(
            r.resolve(LocationQuery::from_parts(Some(""), None, None)).await,
            Err(ParkingError::MissingQuery)
        ));
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates() {
        let r = resolver(TableGeocoder::default());
        assert!(matches!(
            r.resolve(LocationQuery::from_text("123.0, 0.0")).await,
            Err(ParkingError::InvalidCoordinate { .. })
        ));
    }

    #[tokio::test]
    async fn test_geocoder_failure_propagates() {
        let geocoder = TableGeocoder {
            fail: true,
            ..TableGeocoder::default()
        };
        let r = resolver(geocoder);
        assert!(matches!(
            r.resolve(LocationQuery::from_text("London")).await,
            Err(ParkingError::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_geocoder_is_cut_off() {
        let geocoder = TableGeocoder {
            delay: Some(Duration::from_secs(5)),
            ..TableGeocoder::default()
        }
        .with_place("London", Coordinate::new_unchecked(51.5, -0.12));
        let r = resolver(geocoder);
        let started = std::time::Instant::now();
        assert!(matches!(
            r.resolve(LocationQuery::from_text("London")).await,
            Err(ParkingError::UpstreamUnavailable(_))
        ));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
