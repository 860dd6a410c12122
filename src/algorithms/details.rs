//! Facility detail lookup.
//!
//! Translates attribute codes into human-readable descriptions and
//! derives the stand type of a facility.

use serde::Serialize;

use crate::error::{ParkingError, Result};
use crate::types::facility::{AttributeValue, ParkingFacility, StandType};
use crate::utils::dataset::Dataset;

/// Known attribute codes and their descriptions.
pub const DESCRIPTIONS: [(&str, &str); 16] = [
    ("PRK_CARR", "On carriageway"),
    ("PRK_COVER", "Under cover"),
    ("PRK_SECURE", "Secure area"),
    ("PRK_LOCKER", "Individual lockers"),
    ("PRK_SHEFF", "Sheffield stand"),
    ("PRK_MSTAND", "M stand"),
    ("PRK_PSTAND", "P stand"),
    ("PRK_HOOP", "Cyclehoop stand"),
    ("PRK_POST", "Post stand"),
    ("PRK_BUTERF", "Butterfly stand"),
    ("PRK_WHEEL", "Wheel rack"),
    ("PRK_HANGAR", "Bike hangar"),
    ("PRK_TIER", "Two tier stand"),
    ("PRK_OTHER", "Unknown stand type"),
    ("PRK_PROVIS", "Number of stands"),
    ("PRK_CPT", "Bike capacity"),
];

/// Description of an attribute code; [`None`] for unknown codes.
pub fn describe(code: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
}

/// Display name of a stand type.
pub fn stand_type_description(stand: StandType) -> &'static str {
    // every stand-type code is in DESCRIPTIONS
    describe(stand.code()).unwrap_or("Unknown stand type")
}

/// One attribute with its translated name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribedAttribute<'a> {
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub value: &'a AttributeValue,
}

/// The details response of a facility.
///
/// Field names match what existing clients read. `Stand type` is
/// omitted when no stand-type flag is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityDetails<'a> {
    pub id: &'a str,
    #[serde(rename = "Bike capacity")]
    pub capacity: Option<i64>,
    #[serde(rename = "Number of stands")]
    pub stand_count: Option<i64>,
    #[serde(rename = "Stand type", skip_serializing_if = "Option::is_none")]
    pub stand_type: Option<&'static str>,
    #[serde(rename = "On carriageway")]
    pub on_carriageway: Option<bool>,
    #[serde(rename = "Under cover")]
    pub under_cover: Option<bool>,
    #[serde(rename = "Secure area")]
    pub secure: Option<bool>,
    #[serde(rename = "Photo 1")]
    pub photo_1: Option<&'a str>,
    #[serde(rename = "Photo 2")]
    pub photo_2: Option<&'a str>,
    /// `[lat, lon]`
    #[serde(rename = "Coordinates")]
    pub coordinates: [f64; 2],
    #[serde(rename = "Attributes")]
    pub attributes: Vec<DescribedAttribute<'a>>,
}

impl<'a> From<&'a ParkingFacility> for FacilityDetails<'a> {
    fn from(facility: &'a ParkingFacility) -> Self {
        let attrs = &facility.attributes;
        let [photo_1, photo_2] = attrs.photo_urls();
        Self {
            id: &facility.uid,
            capacity: attrs.capacity(),
            stand_count: attrs.stand_count(),
            stand_type: attrs.stand_type().map(stand_type_description),
            on_carriageway: attrs.on_carriageway(),
            under_cover: attrs.under_cover(),
            secure: attrs.secure(),
            photo_1,
            photo_2,
            coordinates: facility.location.to_lat_lon(),
            attributes: attrs
                .iter()
                .map(|(code, value)| DescribedAttribute {
                    code,
                    description: describe(code),
                    value,
                })
                .collect(),
        }
    }
}

/// Looks up a facility by identifier.
pub fn lookup_details<'a>(dataset: &'a Dataset, uid: &str) -> Result<FacilityDetails<'a>> {
    debug!("details for {:?}", uid);
    dataset
        .get(uid)
        .map(FacilityDetails::from)
        .ok_or_else(|| ParkingError::FacilityNotFound(uid.to_string()))
}
