//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::constants::api::PROXY_REVERSE_PATH;
use crate::coord::GeoPoint;
use crate::error::Error;
use crate::geo::{AddressLookup, ReverseGeocoder};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route(PROXY_REVERSE_PATH, get(reverse_geocode_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::Geocoding(_) | Error::Http(_) => (StatusCode::BAD_GATEWAY, "GEOCODING_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError::new(status, code, err.to_string())
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Whether an upstream geocoder is configured
    pub geocoder_configured: bool,
    /// When the server started
    pub started_at: DateTime<Utc>,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder_configured: state.has_geocoder(),
        started_at: state.started_at(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Reverse geocode query parameters
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeParams {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse geocoding proxy endpoint
///
/// GET /api/geocode/reverse?lat=..&lng=..
async fn reverse_geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseGeocodeParams>,
) -> Result<Json<AddressLookup>, ApiError> {
    let point = GeoPoint::new(params.lat, params.lng);
    point.validate()?;

    let geocoder = state.geocoder().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "GEOCODER_UNAVAILABLE",
            "No geocoding API key configured on the server",
        )
    })?;

    let address = geocoder.reverse_geocode(point).await.map_err(|e| {
        warn!(%point, error = %e, "Upstream reverse geocoding failed");
        ApiError::from(e)
    })?;

    Ok(Json(AddressLookup {
        latitude: point.latitude,
        longitude: point.longitude,
        address,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::GoogleGeocoder;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::with_geocoder(Config::default(), None))
    }

    /// State whose geocoder talks to a fake upstream answering with `body`
    async fn state_with_upstream(body: serde_json::Value) -> Arc<AppState> {
        let upstream = Router::new().route(
            "/geocode/json",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let geocoder = GoogleGeocoder::new(
            &format!("http://{}/geocode/json", addr),
            "server-key",
            Duration::from_secs(5),
        )
        .unwrap();
        Arc::new(AppState::with_geocoder(Config::default(), Some(geocoder)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state());

        let (status, body) = get_json(app, "/api/status").await;
        assert_eq!(status, StatusCode::OK);

        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert!(!status.geocoder_configured);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_reverse_geocode_without_key() {
        let app = create_router(create_test_state());

        let (status, body) = get_json(app, "/api/geocode/reverse?lat=51.5&lng=-0.12").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "GEOCODER_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_reverse_geocode_invalid_coordinates() {
        let app = create_router(create_test_state());

        let (status, body) = get_json(app, "/api/geocode/reverse?lat=91&lng=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_reverse_geocode_proxies_first_result() {
        let state = state_with_upstream(serde_json::json!({
            "results": [{"formatted_address": "221B Baker St"}],
            "status": "OK"
        }))
        .await;
        let app = create_router(state);

        let (status, body) = get_json(app, "/api/geocode/reverse?lat=51.5237&lng=-0.1585").await;
        assert_eq!(status, StatusCode::OK);

        let lookup: AddressLookup = serde_json::from_value(body).unwrap();
        assert_eq!(lookup.address.as_deref(), Some("221B Baker St"));
        assert_eq!(lookup.latitude, 51.5237);
    }

    #[tokio::test]
    async fn test_reverse_geocode_zero_results() {
        let state = state_with_upstream(serde_json::json!({
            "results": [],
            "status": "ZERO_RESULTS"
        }))
        .await;
        let app = create_router(state);

        let (status, body) = get_json(app, "/api/geocode/reverse?lat=0&lng=-160").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["address"].is_null());
    }

    #[tokio::test]
    async fn test_reverse_geocode_upstream_error() {
        let state = state_with_upstream(serde_json::json!({
            "results": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }))
        .await;
        let app = create_router(state);

        let (status, body) = get_json(app, "/api/geocode/reverse?lat=0&lng=0").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "GEOCODING_ERROR");
    }
}
