//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;
use crate::summary;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Assemble the REST routes with CORS and request tracing.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/projects/:id/events", get(get_project_events))
        .route("/projects/:id/summary", get(get_project_summary))
        .route("/holders/:address/events", get(get_holder_events))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub project_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HolderEventsResponse {
    pub address: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, e: IndexerError) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /projects/:id/events`
///
/// Returns all indexed events for the given project identifier.
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<String>,
) -> Response {
    match db::get_events_for_project(&state.pool, &project_id).await {
        Ok(events) => Json(EventsResponse {
            project_id,
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `GET /projects/:id/summary`
///
/// Minted, transferred and retired totals replayed from the project's events.
pub async fn get_project_summary(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<String>,
) -> Response {
    let events = match db::get_events_for_project(&state.pool, &project_id).await {
        Ok(events) => events,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    };
    if events.is_empty() {
        return error_response(
            StatusCode::NOT_FOUND,
            IndexerError::NotFound(format!("no events indexed for project {project_id}")),
        );
    }
    match summary::summarize(&project_id, &events) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e),
    }
}

/// `GET /holders/:address/events`
///
/// Returns every event where the address minted, sent, received or retired.
pub async fn get_holder_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Response {
    match db::get_events_for_address(&state.pool, &address).await {
        Ok(events) => Json(HolderEventsResponse {
            address,
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `GET /events`
///
/// Returns all indexed events across all projects.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool).await {
        Ok(events) => Json(AllEventsResponse {
            count: events.len(),
            events,
        })
        .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}
