//! HTTP routes: details, search, legacy path search and health.
//!
//! This is the only layer that turns a [`ParkingError`] into a transport
//! response.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::algorithms::{aggregate::aggregate, details::lookup_details, search::search};
use crate::config::SearchConfig;
use crate::error::ParkingError;
use crate::types::feature::MapFeatureCollection;
use crate::types::query::{parse_finite, LocationQuery};
use crate::utils::dataset::Dataset;
use crate::utils::geocoder::Geocoder;
use crate::utils::resolver::CoordinateResolver;

/// Shared, read-only state of every handler.
pub struct ApiState<G> {
    pub dataset: &'static Dataset,
    pub resolver: Arc<CoordinateResolver<G>>,
    pub search: SearchConfig,
}

impl<G> Clone for ApiState<G> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset,
            resolver: Arc::clone(&self.resolver),
            search: self.search,
        }
    }
}

pub fn router<G: Geocoder + 'static>(state: ApiState<G>) -> Router {
    Router::new()
        .route("/health", get(health::<G>))
        .route("/api/v1.0/parking/details/:parking_id", get(parking_details::<G>))
        .route("/api/v1.0/parking/search", get(search_by_query::<G>))
        .route("/api/v1.0/parking/search/:location", get(search_by_path::<G>))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// A [`ParkingError`] on its way out as JSON.
#[derive(Debug)]
pub struct ApiError(pub ParkingError);

impl From<ParkingError> for ApiError {
    fn from(e: ParkingError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ParkingError::MissingQuery
            | ParkingError::InvalidRequest(_)
            | ParkingError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
            ParkingError::LocationNotFound(_)
            | ParkingError::NoResultsFound
            | ParkingError::FacilityNotFound(_) => StatusCode::NOT_FOUND,
            ParkingError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ParkingError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self.0);
        } else {
            warn!("request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl SearchParams {
    /// Non-numeric or non-finite `lat`/`lon` count as absent.
    pub fn into_query(self) -> LocationQuery {
        let number = |v: Option<String>| v.as_deref().and_then(parse_finite);
        LocationQuery::from_parts(self.query.as_deref(), number(self.lat), number(self.lon))
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    facilities: usize,
}

async fn health<G: Geocoder>(State(state): State<ApiState<G>>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        facilities: state.dataset.len(),
    })
}

async fn parking_details<G: Geocoder>(
    State(state): State<ApiState<G>>,
    Path(parking_id): Path<String>,
) -> Result<Response, ApiError> {
    let details = lookup_details(state.dataset, &parking_id)?;
    Ok(Json(details).into_response())
}

async fn search_by_query<G: Geocoder>(
    State(state): State<ApiState<G>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<MapFeatureCollection>, ApiError> {
    let Query(params) = params.map_err(|e| ParkingError::InvalidRequest(e.body_text()))?;
    run_search(&state, params.into_query()).await
}

/// Legacy route: the location travels as a path segment.
async fn search_by_path<G: Geocoder>(
    State(state): State<ApiState<G>>,
    Path(location): Path<String>,
) -> Result<Json<MapFeatureCollection>, ApiError> {
    run_search(&state, LocationQuery::from_text(&location)).await
}

async fn run_search<G: Geocoder>(
    state: &ApiState<G>,
    query: LocationQuery,
) -> Result<Json<MapFeatureCollection>, ApiError> {
    let origin = state.resolver.resolve(query).await?;
    let results = search(state.dataset, &origin.coordinate, &state.search)?;
    info!("{} facilities near {:?}", results.len(), origin.coordinate);
    Ok(Json(aggregate(&origin, &results)))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
