//! Error types shared by every layer of the library.
//!
//! Lower layers return a typed [`ParkingError`]; only the HTTP layer
//! translates it into a transport response.

use thiserror::Error;

/// Failure kinds surfaced by resolution, search and lookup.
#[derive(Error, Debug)]
pub enum ParkingError {
    /// No location input was supplied at all.
    #[error("No location query was supplied")]
    MissingQuery,

    /// The geocoder or the coordinate parser yielded nothing.
    #[error("Could not find location: {0}")]
    LocationNotFound(String),

    /// Search completed but nothing was within either radius.
    #[error("No bike parks found near location")]
    NoResultsFound,

    /// Unknown facility identifier.
    #[error("Could not find bike park with given ID: {0}")]
    FacilityNotFound(String),

    /// Geocoder network failure or timeout.
    #[error("Geocoding service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Request parameters could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Latitude or longitude outside the valid degree ranges.
    #[error("Invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// The rejected latitude
        latitude: f64,
        /// The rejected longitude
        longitude: f64,
    },

    /// The facility dataset could not be loaded.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Errors raised while loading the facility dataset at startup.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Failed to read dataset")]
    Io(#[from] std::io::Error),

    /// The document is not a valid feature collection.
    #[error("Failed to parse dataset")]
    Parse(#[from] serde_json::Error),

    /// A feature has no `FEATURE_ID` property.
    #[error("Feature at index {0} has no FEATURE_ID")]
    MissingId(usize),

    /// Two features share an identifier.
    #[error("Duplicate FEATURE_ID: {0}")]
    DuplicateId(String),

    /// A feature geometry is not a `[lon, lat]` point.
    #[error("Feature {0} does not have a point geometry")]
    InvalidGeometry(String),

    /// The dataset has already been loaded into the process-wide snapshot.
    #[error("Dataset already initialized")]
    AlreadyInitialized,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ParkingError>;
