//! Struct definitions and implementations for [`ParkingFacility`] and
//! its typed attribute schema.
//!
//! The raw dataset stores flags inconsistently: some as JSON booleans,
//! some as `"TRUE"`/`"FALSE"` strings. Everything is decoded once into
//! [`AttributeValue`] when the dataset is loaded, so request handlers
//! never deal with string coercion.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::location::Coordinate;

/// Capacity attribute code.
pub const PRK_CPT: &str = "PRK_CPT";
/// Number of stands attribute code.
pub const PRK_PROVIS: &str = "PRK_PROVIS";
/// On carriageway attribute code.
pub const PRK_CARR: &str = "PRK_CARR";
/// Under cover attribute code.
pub const PRK_COVER: &str = "PRK_COVER";
/// Secure area attribute code.
pub const PRK_SECURE: &str = "PRK_SECURE";
/// First photo attribute code.
pub const PHOTO1_URL: &str = "PHOTO1_URL";
/// Second photo attribute code.
pub const PHOTO2_URL: &str = "PHOTO2_URL";
/// Identifier property in the source dataset.
pub const FEATURE_ID: &str = "FEATURE_ID";

//------------------------------------------------------------------
// Attribute values
//------------------------------------------------------------------

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl AttributeValue {
    /// Decodes a raw JSON property. `null`, arrays and objects carry no
    /// attribute information and yield [`None`].
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Text(n.to_string()),
            }),
            Value::String(s) => Some(match s.to_ascii_uppercase().as_str() {
                "TRUE" => Self::Bool(true),
                "FALSE" => Self::Bool(false),
                _ => Self::Text(s.clone()),
            }),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integers, and text holding an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Only `Bool(true)` is truthy.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

//------------------------------------------------------------------
// Stand types
//------------------------------------------------------------------

/// Mutually exclusive stand-type flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StandType {
    Sheffield,
    MStand,
    PStand,
    Hoop,
    Post,
    Butterfly,
    Wheel,
    Hangar,
    Tier,
    Locker,
    Other,
}

/// Order in which stand-type flags are inspected. The first truthy one
/// wins.
pub const STAND_TYPE_PRIORITY: [StandType; 11] = [
    StandType::Sheffield,
    StandType::MStand,
    StandType::PStand,
    StandType::Hoop,
    StandType::Post,
    StandType::Butterfly,
    StandType::Wheel,
    StandType::Hangar,
    StandType::Tier,
    StandType::Locker,
    StandType::Other,
];

impl StandType {
    /// The dataset attribute code of this flag.
    pub fn code(&self) -> &'static str {
        match self {
            StandType::Sheffield => "PRK_SHEFF",
            StandType::MStand => "PRK_MSTAND",
            StandType::PStand => "PRK_PSTAND",
            StandType::Hoop => "PRK_HOOP",
            StandType::Post => "PRK_POST",
            StandType::Butterfly => "PRK_BUTERF",
            StandType::Wheel => "PRK_WHEEL",
            StandType::Hangar => "PRK_HANGAR",
            StandType::Tier => "PRK_TIER",
            StandType::Locker => "PRK_LOCKER",
            StandType::Other => "PRK_OTHER",
        }
    }
}

//------------------------------------------------------------------
// Attributes
//------------------------------------------------------------------

/// The attribute mapping of a facility, keyed by attribute code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityAttributes {
    values: BTreeMap<String, AttributeValue>,
}

impl FacilityAttributes {
    /// Decodes a flat GeoJSON property map. The identifier property is
    /// not an attribute and is skipped.
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        let values = properties
            .iter()
            .filter(|(code, _)| code.as_str() != FEATURE_ID)
            .filter_map(|(code, value)| {
                AttributeValue::from_json(value).map(|v| (code.clone(), v))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, code: &str) -> Option<&AttributeValue> {
        self.values.get(code)
    }

    /// Iterates attributes in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> Option<i64> {
        self.get(PRK_CPT).and_then(AttributeValue::as_int)
    }

    pub fn stand_count(&self) -> Option<i64> {
        self.get(PRK_PROVIS).and_then(AttributeValue::as_int)
    }

    pub fn on_carriageway(&self) -> Option<bool> {
        self.get(PRK_CARR).and_then(AttributeValue::as_bool)
    }

    pub fn under_cover(&self) -> Option<bool> {
        self.get(PRK_COVER).and_then(AttributeValue::as_bool)
    }

    pub fn secure(&self) -> Option<bool> {
        self.get(PRK_SECURE).and_then(AttributeValue::as_bool)
    }

    pub fn photo_urls(&self) -> [Option<&str>; 2] {
        [
            self.get(PHOTO1_URL).and_then(AttributeValue::as_text),
            self.get(PHOTO2_URL).and_then(AttributeValue::as_text),
        ]
    }

    /// First truthy flag in [`STAND_TYPE_PRIORITY`], if any.
    pub fn stand_type(&self) -> Option<StandType> {
        STAND_TYPE_PRIORITY
            .into_iter()
            .find(|stand| self.get(stand.code()).is_some_and(AttributeValue::is_truthy))
    }
}

impl<const N: usize> From<[(&str, AttributeValue); N]> for FacilityAttributes {
    fn from(pairs: [(&str, AttributeValue); N]) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(code, value)| (code.to_string(), value))
                .collect(),
        }
    }
}

//------------------------------------------------------------------
// Facility
//------------------------------------------------------------------

/// A single bicycle-parking location. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingFacility {
    /// The dataset `FEATURE_ID`, unique across the dataset.
    pub uid: String,

    /// Position of the facility.
    ///
    /// See also [`Coordinate`].
    pub location: Coordinate,

    pub attributes: FacilityAttributes,
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
