//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, warn};

use crate::domain::{Coordinate, Line};
use crate::lines::LineRegistry;
use crate::position::{PositionError, PositionFix, ReportedPosition};
use crate::ranking::{DiagnosticEvent, PriorityStopSelector, StopRanker};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lines", get(list_lines))
        .route("/lines/:id/stops", get(line_stops))
        .route("/lines/:id/rank", post(rank_stops))
        .route("/lines/:id/nearest-start", post(nearest_start))
        .route("/geocode/reverse", get(reverse_geocode))
        .route("/position", get(position_state).delete(reset_position))
        .route("/position/failure", post(report_failure))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List all lines.
async fn list_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    Json(LinesResponse {
        lines: state.registry.lines().iter().map(LineSummary::from).collect(),
    })
}

/// A line's stops with coordinates.
async fn line_stops(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LineStopsResponse>, AppError> {
    let line = find_line(&state, &id)?;

    Ok(Json(LineStopsResponse {
        line: LineSummary::from(line),
        stops: state.registry.stops_for(line),
    }))
}

/// Rank a line's stops by distance from the reported position.
async fn rank_stops(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let line = find_line(&state, &id)?;
    let fix = record_position(&state, &req).await?;

    let stops = state.registry.stops_for(line);
    let outcome = StopRanker::new(state.distances.as_ref(), state.ranking.as_ref())
        .rank(fix.coordinate, &stops)
        .await;
    log_diagnostics(&outcome.diagnostics);

    Ok(Json(RankResponse {
        line: line.id.clone(),
        position: fix,
        stops: outcome.stops,
        diagnostics: outcome.diagnostics,
    }))
}

/// Pick the nearest anchor stop as start and the opposite terminus as
/// destination.
async fn nearest_start(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<NearestStartResponse>, AppError> {
    let line = find_line(&state, &id)?;
    let fix = record_position(&state, &req).await?;

    let outcome = PriorityStopSelector::new(state.distances.as_ref())
        .auto_assign(fix.coordinate, line, state.registry.as_ref())
        .await;
    log_diagnostics(&outcome.diagnostics);

    let (start, destination) = match outcome.assignment {
        Some(a) => (Some(a.start), a.destination),
        None => (None, None),
    };

    Ok(Json(NearestStartResponse {
        line: line.id.clone(),
        start,
        destination,
        diagnostics: outcome.diagnostics,
    }))
}

/// Short place name for a coordinate.
async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<ReverseGeocodeQuery>,
) -> Result<Json<ReverseGeocodeResponse>, AppError> {
    let coordinate = Coordinate::validated(query.lat, query.lon).map_err(|e| {
        AppError::BadRequest {
            message: e.to_string(),
        }
    })?;

    Ok(Json(ReverseGeocodeResponse {
        label: state.geocoder.resolve(coordinate).await,
    }))
}

/// Last known position.
async fn position_state(State(state): State<AppState>) -> Json<PositionStateResponse> {
    let tracker = state.tracker.lock().await;
    Json(PositionStateResponse {
        position: tracker.last_position().cloned(),
        permission_granted: tracker.is_permission_granted(),
        options: PositionOptionsResponse::from(state.position_options.as_ref()),
    })
}

/// Record a position failure the browser hit before it had a fix.
async fn report_failure(
    State(state): State<AppState>,
    Json(req): Json<PositionFailureRequest>,
) -> Json<PositionFailureResponse> {
    let source = ReportedPosition::failed(req.to_error());
    let mut tracker = state.tracker.lock().await;
    let error = match tracker.locate(&source, &state.position_options).await {
        Ok(_) => PositionError::Unavailable,
        Err(e) => e,
    };

    Json(PositionFailureResponse {
        code: error.code(),
        message: error.user_message().to_string(),
        permission_granted: tracker.is_permission_granted(),
    })
}

/// Forget the last known position.
async fn reset_position(State(state): State<AppState>) -> StatusCode {
    state.tracker.lock().await.reset();
    StatusCode::NO_CONTENT
}

fn find_line<'a>(state: &'a AppState, id: &str) -> Result<&'a Line, AppError> {
    state.registry.line(id).ok_or_else(|| AppError::NotFound {
        message: format!("unknown line: {id}"),
    })
}

/// Run a reported position through the session tracker.
async fn record_position(
    state: &AppState,
    req: &PositionRequest,
) -> Result<PositionFix, AppError> {
    let source = ReportedPosition::new(req.to_fix());
    let mut tracker = state.tracker.lock().await;
    let fix = tracker.locate(&source, &state.position_options).await?;
    Ok(fix)
}

fn log_diagnostics(events: &[DiagnosticEvent]) {
    for event in events {
        debug!(kind = ?event.kind, title = %event.title, data = %event.data, "diagnostic");
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
}

impl From<PositionError> for AppError {
    fn from(e: PositionError) -> Self {
        AppError::Unprocessable {
            message: e.user_message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
        };

        warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::LocatorConfig;
    use crate::geocode::GeocodeConfig;
    use crate::routing::RoutingConfig;

    /// Nothing listens here; every outbound call fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn app() -> Router {
        let config = LocatorConfig::default()
            .with_routing(
                RoutingConfig::default()
                    .with_base_url(UNREACHABLE)
                    .with_max_retries(0)
                    .with_timeouts(Duration::from_secs(2), Duration::from_secs(2)),
            )
            .with_geocode(
                GeocodeConfig::default()
                    .with_base_url(UNREACHABLE)
                    .with_timeout(Duration::from_secs(2)),
            );
        create_router(AppState::from_config(&config).unwrap())
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("ok".to_string()));
    }

    #[tokio::test]
    async fn lists_builtin_line() {
        let (status, body) = send(&app(), Method::GET, "/lines", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lines"][0]["id"], "400");
        assert_eq!(body["lines"][0]["stop_count"], 16);
        assert_eq!(body["lines"][0]["auto_assign"], true);
    }

    #[tokio::test]
    async fn line_stops_in_order() {
        let (status, body) = send(&app(), Method::GET, "/lines/400/stops", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stops"][0]["name"], "Udine");
        assert_eq!(body["stops"][15]["name"], "Grado");
        assert_eq!(body["stops"][0]["coordinate"]["latitude"], 46.0625);
    }

    #[tokio::test]
    async fn unknown_line_is_404() {
        let (status, body) = send(&app(), Method::GET, "/lines/999/stops", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown line: 999");

        let (status, _) = send(
            &app(),
            Method::POST,
            "/lines/999/rank",
            Some(json!({"latitude": 46.0, "longitude": 13.0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_position_is_422() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/lines/400/rank",
            Some(json!({"latitude": 200.0, "longitude": 13.0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Posizione non disponibile");
    }

    #[tokio::test]
    async fn rank_falls_back_to_straight_line() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/lines/400/rank",
            Some(json!({"latitude": 46.0625, "longitude": 13.2354, "accuracy": 20.0})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let stops = body["stops"].as_array().unwrap();
        assert_eq!(stops.len(), 16);
        assert_eq!(stops[0]["stop_name"], "Udine");
        assert_eq!(stops[0]["source"], "approximate");
        assert_eq!(stops[15]["stop_name"], "Grado");
        assert_eq!(body["position"]["accuracy_m"], 20.0);
        assert_eq!(body["diagnostics"][0]["kind"], "ranking");

        let (_, state) = send(&app, Method::GET, "/position", None).await;
        assert_eq!(state["permission_granted"], true);
        assert_eq!(state["position"]["coordinate"]["latitude"], 46.0625);
    }

    #[tokio::test]
    async fn nearest_start_near_grado() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/lines/400/nearest-start",
            Some(json!({"latitude": 45.77, "longitude": 13.48})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["start"]["name"], "Grado");
        assert_eq!(body["start"]["index"], 15);
        assert_eq!(body["destination"]["name"], "Udine");
        assert_eq!(body["destination"]["index"], 0);
    }

    #[tokio::test]
    async fn reset_clears_position() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/lines/400/rank",
            Some(json!({"latitude": 46.0, "longitude": 13.3})),
        )
        .await;

        let (status, _) = send(&app, Method::DELETE, "/position", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, state) = send(&app, Method::GET, "/position", None).await;
        assert_eq!(state["position"], Value::Null);
        assert_eq!(state["permission_granted"], false);
    }

    #[tokio::test]
    async fn failed_position_clears_permission() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/lines/400/rank",
            Some(json!({"latitude": 46.0, "longitude": 13.3})),
        )
        .await;
        send(
            &app,
            Method::POST,
            "/lines/400/rank",
            Some(json!({"latitude": -95.0, "longitude": 13.3})),
        )
        .await;

        let (_, state) = send(&app, Method::GET, "/position", None).await;
        assert_eq!(state["permission_granted"], false);
        assert_eq!(state["position"]["coordinate"]["latitude"], 46.0);
    }

    #[tokio::test]
    async fn position_state_carries_browser_options() {
        let (status, body) = send(&app(), Method::GET, "/position", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"]["enable_high_accuracy"], true);
        assert_eq!(body["options"]["timeout_ms"], 15_000);
        assert_eq!(body["options"]["maximum_age_ms"], 300_000);
    }

    #[tokio::test]
    async fn reported_failure_is_recorded() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/lines/400/rank",
            Some(json!({"latitude": 46.0, "longitude": 13.3})),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/position/failure",
            Some(json!({"code": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 1);
        assert_eq!(body["message"], "Permesso di geolocalizzazione negato");
        assert_eq!(body["permission_granted"], false);

        let (_, state) = send(&app, Method::GET, "/position", None).await;
        assert_eq!(state["permission_granted"], false);
        assert_eq!(state["position"]["coordinate"]["latitude"], 46.0);
    }

    #[tokio::test]
    async fn geocode_rejects_invalid_coordinate() {
        let (status, body) =
            send(&app(), Method::GET, "/geocode/reverse?lat=200&lon=13", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("latitude"));
    }

    #[tokio::test]
    async fn geocode_failure_is_null_label() {
        let (status, body) =
            send(&app(), Method::GET, "/geocode/reverse?lat=46.06&lon=13.23", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], Value::Null);
    }
}
