//! GeoJSON-shaped map output.
//!
//! A [`MapFeatureCollection`] is created fresh per search request and
//! serialized straight into the response body.

use serde::{Serialize, Serializer};

use super::location::Coordinate;
use super::query::LocationQuery;

/// Default zoom level suggested to the map client.
pub const DEFAULT_ZOOM: u8 = 16;

/// How a feature should be styled by the consumer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    /// The searched location.
    Origin,
    /// A bicycle-parking facility.
    Parking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum FeatureTag {
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum CollectionTag {
    FeatureCollection,
}

/// Point geometry in GeoJSON `[lon, lat]` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

impl From<Coordinate> for Geometry {
    fn from(c: Coordinate) -> Self {
        Geometry::Point {
            coordinates: c.to_lon_lat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub marker_type: MarkerType,
    pub id: Option<String>,
    /// Distance from the origin, rounded to one decimal metre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_metres: Option<f64>,
}

/// A single map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    tag: FeatureTag,
    pub id: String,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(id: String, location: Coordinate, properties: FeatureProperties) -> Self {
        Self {
            tag: FeatureTag::Feature,
            id,
            geometry: location.into(),
            properties,
        }
    }
}

/// A `{lat, lon}` pair as the map client expects it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for LatLon {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.lat(),
            lon: c.lon(),
        }
    }
}

/// Minimal axis-aligned rectangle covering a set of coordinates.
///
/// Serialized as `[[min_lat, min_lon], [max_lat, max_lon]]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]].serialize(serializer)
    }
}

/// Top-level metadata of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProperties {
    /// Where the map should be centred: the facility centroid, or the
    /// origin when there is no centroid.
    pub center: LatLon,
    pub centroid: Option<LatLon>,
    pub zoom: u8,
    pub result_count: usize,
    pub bounds: Option<BoundingBox>,
    pub origin: LatLon,
    pub query: LocationQuery,
}

/// Facilities plus the origin, ready for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeatureCollection {
    #[serde(rename = "type")]
    tag: CollectionTag,
    pub features: Vec<Feature>,
    pub properties: CollectionProperties,
}

impl MapFeatureCollection {
    pub fn new(features: Vec<Feature>, properties: CollectionProperties) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            features,
            properties,
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.properties.bounds
    }

    pub fn centroid(&self) -> Option<LatLon> {
        self.properties.centroid
    }

    /// Features tagged with the given marker type.
    pub fn features_of(&self, marker: MarkerType) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |f| f.properties.marker_type == marker)
    }
}
