//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::display::{BoardView, DEFAULT_ROW_CAP, DisplayDetail};
use crate::domain::StationId;
use crate::scheduler::SchedulerClosed;
use crate::source::FetchError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(search_stations))
        .route("/api/stations/reload", post(reload_stations))
        .route("/api/board", get(board))
        .route("/api/board/refresh", post(refresh_board))
        .route("/api/board/routes/:index", get(route_detail))
        .route(
            "/api/board/stations/:station_id",
            put(subscribe).delete(unsubscribe),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Result<Json<StationSearchResponse>, AppError> {
    let stations = state
        .directory
        .search(&req.q, state.result_cap)
        .await?
        .into_iter()
        .map(StationResult::from)
        .collect();

    Ok(Json(StationSearchResponse { stations }))
}

/// Re-fetch the station list.
async fn reload_stations(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let count = state.directory.reload().await?;
    Ok(Json(ReloadResponse { count }))
}

/// Watch a station's board, replacing any current subscription.
async fn subscribe(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<BoardView>, AppError> {
    let id = StationId::new(station_id);

    let name = match req.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => state
            .directory
            .find(&id)
            .await?
            .map(|s| s.name)
            .ok_or_else(|| AppError::NotFound {
                message: format!("unknown station: {id}"),
            })?,
    };

    let snapshot = state.scheduler.subscribe(id, name).await?;
    Ok(Json(state.projector.project_board(&snapshot, DEFAULT_ROW_CAP)))
}

/// Stop watching a station. A no-op for a station that is not watched.
async fn unsubscribe(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<BoardView>, AppError> {
    let snapshot = state.scheduler.unsubscribe(StationId::new(station_id)).await?;
    Ok(Json(state.projector.project_board(&snapshot, DEFAULT_ROW_CAP)))
}

/// Refresh the watched board now.
async fn refresh_board(State(state): State<AppState>) -> Result<Json<BoardView>, AppError> {
    let snapshot = state.scheduler.refresh().await?;
    Ok(Json(state.projector.project_board(&snapshot, DEFAULT_ROW_CAP)))
}

/// Current board.
async fn board(State(state): State<AppState>) -> Json<BoardView> {
    let snapshot = state.scheduler.snapshot();
    Json(state.projector.project_board(&snapshot, DEFAULT_ROW_CAP))
}

/// Expanded view of one board row.
async fn route_detail(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<DisplayDetail>, AppError> {
    let snapshot = state.scheduler.snapshot();
    let entry = snapshot
        .detail
        .as_ref()
        .and_then(|d| d.routes.iter().take(DEFAULT_ROW_CAP).nth(index))
        .ok_or_else(|| AppError::NotFound {
            message: format!("no route at row {index}"),
        })?;

    Ok(Json(state.projector.project_detail(entry)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<SchedulerClosed> for AppError {
    fn from(e: SchedulerClosed) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
