//! HTTP handlers and the error-to-status mapping.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use juanmap::boundary::BoundaryResolver;
use juanmap::cache::TtlCache;
use juanmap::directions::DirectionsProvider;
use juanmap::geocoding::GeocodingProvider;
use juanmap::route::{RouteDecoder, RouteRequest};
use juanmap::{BoundaryResult, Coordinate, Error, RouteResult};

pub const DEFAULT_QUERY: &str = "San Juan City";

/// Application state shared across handlers
pub struct AppState<G, D> {
    pub boundary: BoundaryResolver<G, TtlCache<BoundaryResult>>,
    pub route: RouteDecoder<D>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

/// Library error carried to the HTTP boundary
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

pub fn status_for(e: &Error) -> StatusCode {
    match e {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Upstream {
            reachable: true, ..
        } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Upstream {
            reachable: false, ..
        } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }

        let body = ErrorBody {
            success: false,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    success: bool,
    status: &'static str,
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "OK",
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct BoundaryParams {
    pub q: Option<String>,
    #[serde(rename = "hintLat")]
    pub hint_lat: Option<String>,
    #[serde(rename = "hintLng")]
    pub hint_lng: Option<String>,
}

impl BoundaryParams {
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or(DEFAULT_QUERY)
    }

    /// Both halves must parse to a valid coordinate; anything else means no hint
    pub fn hint(&self) -> Option<Coordinate> {
        let lat = self.hint_lat.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let lng = self.hint_lng.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            (None, None) => return None,
            _ => {
                debug!("Ignoring partial boundary hint");
                return None;
            }
        };

        let parsed = lat
            .parse::<f64>()
            .ok()
            .zip(lng.parse::<f64>().ok())
            .and_then(|(lat, lng)| Coordinate::new(lat, lng).ok());
        if parsed.is_none() {
            debug!("Ignoring unusable boundary hint ({}, {})", lat, lng);
        }
        parsed
    }
}

/// Place boundary lookup
pub async fn boundary_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    Query(params): Query<BoundaryParams>,
) -> Result<Json<ApiResponse<BoundaryResult>>, ApiError>
where
    G: GeocodingProvider,
    D: DirectionsProvider,
{
    let result = state
        .boundary
        .resolve(params.query(), params.hint())
        .await?;
    Ok(ApiResponse::ok(result))
}

/// Single-route directions
pub async fn route_handler<G, D>(
    State(state): State<Arc<AppState<G, D>>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RouteResult>>, ApiError>
where
    G: GeocodingProvider,
    D: DirectionsProvider,
{
    let Json(request) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let result = state.route.route_request(&request).await?;
    Ok(ApiResponse::ok(result))
}

pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError(Error::not_found(format!("Route not found: {}", uri.path())))
}
