//! Builds the map feature collection of a search.
//!
//! Bounds and centroid only ever cover facility features. The origin is
//! still emitted as a feature so a client can draw it, but it does not
//! move the map frame.

use crate::algorithms::search::Nearby;
use crate::types::feature::{
    BoundingBox, CollectionProperties, Feature, FeatureProperties, LatLon, MapFeatureCollection,
    MarkerType, DEFAULT_ZOOM,
};
use crate::types::location::Coordinate;
use crate::types::query::SearchOrigin;

/// Rounds to one decimal place.
fn round_to_decimetre(metres: f64) -> f64 {
    (metres * 10.0).round() / 10.0
}

/// Minimal box around `points`; [`None`] when empty.
pub fn bounding_box<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<BoundingBox> {
    points.into_iter().fold(None, |acc, c| {
        let (lat, lon) = (c.lat(), c.lon());
        Some(match acc {
            None => BoundingBox {
                min_lat: lat,
                min_lon: lon,
                max_lat: lat,
                max_lon: lon,
            },
            Some(b) => BoundingBox {
                min_lat: b.min_lat.min(lat),
                min_lon: b.min_lon.min(lon),
                max_lat: b.max_lat.max(lat),
                max_lon: b.max_lon.max(lon),
            },
        })
    })
}

/// Arithmetic mean of `points`; [`None`] when empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<LatLon> {
    let (count, lat_sum, lon_sum) = points
        .into_iter()
        .fold((0usize, 0.0, 0.0), |(n, lat, lon), c| (n + 1, lat + c.lat(), lon + c.lon()));
    (count > 0).then(|| LatLon {
        lat: lat_sum / count as f64,
        lon: lon_sum / count as f64,
    })
}

/// Converts search hits plus their origin into a feature collection.
///
/// Facility features come first, in result order, followed by the single
/// origin feature.
pub fn aggregate(origin: &SearchOrigin, results: &[Nearby<'_>]) -> MapFeatureCollection {
    let mut features: Vec<Feature> = results
        .iter()
        .map(|hit| {
            Feature::new(
                hit.facility.uid.clone(),
                hit.facility.location,
                FeatureProperties {
                    marker_type: MarkerType::Parking,
                    id: Some(hit.facility.uid.clone()),
                    distance_metres: Some(round_to_decimetre(hit.distance_metres)),
                },
            )
        })
        .collect();

    let locations = || results.iter().map(|hit| &hit.facility.location);
    let bounds = bounding_box(locations());
    let centroid = centroid(locations());

    features.push(Feature::new(
        format!("point-{}", features.len()),
        origin.coordinate,
        FeatureProperties {
            marker_type: MarkerType::Origin,
            id: None,
            distance_metres: None,
        },
    ));

    debug!(
        "aggregated {} facilities, bounds {:?}, centroid {:?}",
        results.len(),
        bounds,
        centroid
    );

    MapFeatureCollection::new(
        features,
        CollectionProperties {
            center: centroid.unwrap_or_else(|| origin.coordinate.into()),
            centroid,
            zoom: DEFAULT_ZOOM,
            result_count: results.len(),
            bounds,
            origin: origin.coordinate.into(),
            query: origin.query.clone(),
        },
    )
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;
    use crate::types::facility::{FacilityAttributes, ParkingFacility};
    use crate::types::query::LocationQuery;
    use crate::utils::haversine::distance;
    use serde_json::json;

    fn facility(uid: &str, lat: f64, lon: f64) -> ParkingFacility {
        ParkingFacility {
            uid: uid.to_string(),
            location: Coordinate::new_unchecked(lat, lon),
            attributes: FacilityAttributes::default(),
        }
    }

    fn origin_at(lat: f64, lon: f64) -> SearchOrigin {
        SearchOrigin {
            coordinate: Coordinate::new_unchecked(lat, lon),
            query: LocationQuery::ExplicitCoordinates {
                latitude: lat,
                longitude: lon,
            },
        }
    }

    fn hits<'a>(origin: &SearchOrigin, facilities: &'a [ParkingFacility]) -> Vec<Nearby<'a>> {
        facilities
            .iter()
            .map(|facility| Nearby {
                facility,
                distance_metres: distance(&origin.coordinate, &facility.location),
            })
            .collect()
    }

    #[test]
    fn test_bounds_exclude_far_origin() {
        let facilities = vec![
            facility("A", 51.50, -0.13),
            facility("B", 51.52, -0.10),
            facility("C", 51.51, -0.12),
        ];
        let origin = origin_at(40.0, 10.0);
        let collection = aggregate(&origin, &hits(&origin, &facilities));

        assert_eq!(
            collection.bounds(),
            Some(BoundingBox {
                min_lat: 51.50,
                min_lon: -0.13,
                max_lat: 51.52,
                max_lon: -0.10,
            })
        );
        let centroid = collection.centroid().unwrap();
        assert!((centroid.lat - 51.51).abs() < 1e-9);
        assert!((centroid.lon - (-0.1166666666)).abs() < 1e-6);
        assert_eq!(collection.properties.center, centroid);
    }

    #[test]
    fn test_one_feature_per_facility_plus_origin() {
        let facilities = vec![facility("A", 51.50, -0.13), facility("B", 51.52, -0.10)];
        let origin = origin_at(51.51, -0.12);
        let collection = aggregate(&origin, &hits(&origin, &facilities));

        assert_eq!(collection.features.len(), 3);
        assert_eq!(collection.features_of(MarkerType::Parking).count(), 2);
        let origins: Vec<_> = collection.features_of(MarkerType::Origin).collect();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].id, "point-2");
        assert_eq!(collection.properties.result_count, 2);
    }

    #[test]
    fn test_distance_rounded_to_one_decimal() {
        assert_eq!(round_to_decimetre(123.456), 123.5);
        assert_eq!(round_to_decimetre(0.04), 0.0);

        let facilities = vec![facility("A", 51.501, -0.13)];
        let origin = origin_at(51.50, -0.13);
        let collection = aggregate(&origin, &hits(&origin, &facilities));
        let d = collection.features[0].properties.distance_metres.unwrap();
        let exact = distance(&origin.coordinate, &facilities[0].location);
        assert_eq!(d, (exact * 10.0).round() / 10.0);
    }

    #[test]
    fn test_empty_results_have_no_bounds() {
        let origin = origin_at(51.5, -0.12);
        let collection = aggregate(&origin, &[]);
        assert_eq!(collection.bounds(), None);
        assert_eq!(collection.centroid(), None);
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.properties.center, LatLon { lat: 51.5, lon: -0.12 });
    }

    #[test]
    fn test_serialized_collection() {
        let facilities = vec![facility("A", 51.50, -0.13)];
        let origin = SearchOrigin {
            coordinate: Coordinate::new_unchecked(51.5, -0.13),
            query: LocationQuery::FreeText {
                text: "Somewhere".to_string(),
            },
        };
        let value = serde_json::to_value(aggregate(&origin, &hits(&origin, &facilities))).unwrap();
        assert_eq!(value["type"], json!("FeatureCollection"));
        assert_eq!(value["properties"]["zoom"], json!(16));
        assert_eq!(value["properties"]["resultCount"], json!(1));
        assert_eq!(value["properties"]["bounds"], json!([[51.5, -0.13], [51.5, -0.13]]));
        assert_eq!(value["properties"]["origin"], json!({"lat": 51.5, "lon": -0.13}));
        assert_eq!(
            value["properties"]["query"],
            json!({"kind": "freeText", "text": "Somewhere"})
        );
        assert_eq!(value["features"][1]["properties"]["markerType"], json!("origin"));
    }
}
