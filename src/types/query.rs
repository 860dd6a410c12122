//! Location input variants and the resolved search origin.

use serde::Serialize;

use super::location::Coordinate;

/// Raw location input, classified before resolution.
///
/// Request parameters can carry explicit numeric fields, a `"lat,lon"`
/// string, or a free-text place name. Classification happens once, here,
/// so the resolver only matches on variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LocationQuery {
    /// Both `lat` and `lon` were supplied as numbers.
    ExplicitCoordinates { latitude: f64, longitude: f64 },
    /// The location string was a literal coordinate pair.
    CoordinateString {
        raw: String,
        latitude: f64,
        longitude: f64,
    },
    /// A place description to be geocoded.
    FreeText { text: String },
    /// Nothing usable was supplied.
    Empty,
}

impl LocationQuery {
    /// Classifies raw input. Explicit coordinates take precedence over
    /// the location string; a lone `lat` or `lon` is ignored.
    pub fn from_parts(text: Option<&str>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            return LocationQuery::ExplicitCoordinates {
                latitude,
                longitude,
            };
        }

        let text = match text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return LocationQuery::Empty,
        };

        match parse_coordinate_pair(text) {
            Some((latitude, longitude)) => LocationQuery::CoordinateString {
                raw: text.to_string(),
                latitude,
                longitude,
            },
            None => LocationQuery::FreeText {
                text: text.to_string(),
            },
        }
    }

    /// Shorthand for a text-only query, as used by the legacy path route.
    pub fn from_text(text: &str) -> Self {
        Self::from_parts(Some(text), None, None)
    }
}

/// Parses one finite number. `inf` and `NaN` are not numbers here.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses `"number, number"` with optional whitespace around each part.
pub fn parse_coordinate_pair(text: &str) -> Option<(f64, f64)> {
    let (lat, lon) = text.split_once(',')?;
    Some((parse_finite(lat)?, parse_finite(lon)?))
}

/// A resolved coordinate plus the query it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOrigin {
    pub coordinate: Coordinate,
    pub query: LocationQuery,
}
