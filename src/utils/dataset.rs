//! Loads the facility dataset and stores the process-wide snapshot.
//!
//! The source is a GeoJSON feature collection whose point coordinates are
//! in `[lon, lat]` order and whose properties carry a unique
//! `FEATURE_ID`. It is read once at startup; afterwards the snapshot is
//! only ever read, so it is shared without locking.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DatasetError;
use crate::types::facility::{FacilityAttributes, ParkingFacility, FEATURE_ID};
use crate::types::location::Coordinate;

/// The loaded facility set.
pub static DATASET: OnceCell<Dataset> = OnceCell::new();

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// Immutable set of facilities indexed by identifier.
#[derive(Debug, Default)]
pub struct Dataset {
    facilities: Vec<ParkingFacility>,
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Builds a dataset, rejecting duplicate identifiers.
    pub fn new(facilities: Vec<ParkingFacility>) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(facilities.len());
        for (i, facility) in facilities.iter().enumerate() {
            if index.insert(facility.uid.clone(), i).is_some() {
                return Err(DatasetError::DuplicateId(facility.uid.clone()));
            }
        }
        Ok(Self { facilities, index })
    }

    /// Parses a GeoJSON feature collection.
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let raw: RawCollection = serde_json::from_reader(reader)?;
        let facilities = raw
            .features
            .into_iter()
            .enumerate()
            .map(|(i, feature)| parse_feature(i, feature))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(facilities)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self, DatasetError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        info!("Loading facilities from {}", path.display());
        let file = File::open(path)?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} facilities", dataset.len());
        Ok(dataset)
    }

    /// Facility with the given identifier.
    pub fn get(&self, uid: &str) -> Option<&ParkingFacility> {
        self.index.get(uid).map(|&i| &self.facilities[i])
    }

    /// Facilities in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, ParkingFacility> {
        self.facilities.iter()
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

fn parse_feature(position: usize, feature: RawFeature) -> Result<ParkingFacility, DatasetError> {
    let uid = match feature.properties.get(FEATURE_ID) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(DatasetError::MissingId(position)),
    };

    let location = feature
        .geometry
        .as_ref()
        .filter(|g| g.kind == "Point")
        .and_then(|g| g.coordinates.as_array())
        .and_then(|c| match c.as_slice() {
            [lon, lat, ..] => Some((lat.as_f64()?, lon.as_f64()?)),
            _ => None,
        })
        .and_then(|(lat, lon)| Coordinate::new(lat, lon).ok())
        .ok_or_else(|| DatasetError::InvalidGeometry(uid.clone()))?;

    Ok(ParkingFacility {
        attributes: FacilityAttributes::from_properties(&feature.properties),
        uid,
        location,
    })
}

/// Installs `dataset` as the process-wide snapshot.
pub fn init_dataset(dataset: Dataset) -> Result<&'static Dataset, DatasetError> {
    DATASET
        .set(dataset)
        .map_err(|_| DatasetError::AlreadyInitialized)?;
    DATASET.get().ok_or(DatasetError::AlreadyInitialized)
}

#[cfg(test)]
mod dataset_tests {
    use super::*;
    use crate::types::facility::StandType;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-0.1234, 51.5012]},
                "properties": {"FEATURE_ID": "RWG057821", "PRK_CPT": 10, "PRK_SHEFF": "TRUE", "PRK_COVER": "FALSE"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-0.1301, 51.5101]},
                "properties": {"FEATURE_ID": "RWG000002", "PRK_HOOP": true}
            }
        ]
    }"#;

    #[test]
    fn test_load_reverses_coordinates() {
        let dataset = Dataset::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 2);
        let f = dataset.get("RWG057821").unwrap();
        assert_eq!(f.location, Coordinate::new_unchecked(51.5012, -0.1234));
        assert_eq!(f.attributes.stand_type(), Some(StandType::Sheffield));
        assert_eq!(f.attributes.under_cover(), Some(false));
        assert_eq!(dataset.iter().nth(1).unwrap().uid, "RWG000002");
    }

    #[test]
    fn test_unknown_id() {
        let dataset = Dataset::from_geojson_str(SAMPLE).unwrap();
        assert!(dataset.get("nope").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let text = SAMPLE.replace("RWG000002", "RWG057821");
        assert!(matches!(
            Dataset::from_geojson_str(&text),
            Err(DatasetError::DuplicateId(id)) if id == "RWG057821"
        ));
    }

    #[test]
    fn test_missing_id_rejected() {
        let text = SAMPLE.replace("\"FEATURE_ID\": \"RWG000002\", ", "");
        assert!(matches!(
            Dataset::from_geojson_str(&text),
            Err(DatasetError::MissingId(1))
        ));
    }

    #[test]
    fn test_out_of_range_geometry_rejected() {
        let text = SAMPLE.replace("51.5101", "95.0");
        assert!(matches!(
            Dataset::from_geojson_str(&text),
            Err(DatasetError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Dataset::from_geojson_str("{"),
            Err(DatasetError::Parse(_))
        ));
    }
}
