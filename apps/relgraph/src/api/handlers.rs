//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Reads take the session read lock. Filter and snapshot updates take the
//! write lock, derive the next state from the current one and publish it
//! before releasing the guard.

use super::{
    AppState,
    types::{
        DetailResponse, FiltersResponse, HealthResponse, SnapshotResponse, StatusResponse,
        ViewResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use relgraph_core::{FilterOp, FilterState, GraphMetrics, RelgraphError, RenderGraph, Snapshot};

/// HTTP status for an engine error.
fn status_for(error: &RelgraphError) -> StatusCode {
    match error {
        RelgraphError::InvalidFilter(_) | RelgraphError::DeserializationError(_) => {
            StatusCode::BAD_REQUEST
        }
        RelgraphError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        RelgraphError::MemberNotFound(_) => StatusCode::NOT_FOUND,
        RelgraphError::Upstream(_) => StatusCode::BAD_GATEWAY,
        RelgraphError::SerializationError(_)
        | RelgraphError::ConfigError(_)
        | RelgraphError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get session status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(StatusResponse::from_session(&session)))
}

// =============================================================================
// GRAPH HANDLERS
// =============================================================================

/// The full, unfiltered member graph.
pub async fn graph_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let response = ViewResponse::success(
        session.revision(),
        RenderGraph::from_graph(session.graph()),
        GraphMetrics::from_graph(session.graph()),
    );
    (StatusCode::OK, Json(response))
}

/// The visible graph under the published filter state.
pub async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let visible = session.visible();
    let response = ViewResponse::success(
        session.revision(),
        RenderGraph::from_filtered(&visible),
        GraphMetrics::from_filtered(&visible),
    );
    (StatusCode::OK, Json(response))
}

/// The visible graph under an ad-hoc filter state. Nothing is published.
pub async fn preview_handler(
    State(state): State<AppState>,
    Json(filters): Json<FilterState>,
) -> impl IntoResponse {
    if let Err(e) = filters.validate() {
        return (status_for(&e), Json(ViewResponse::error(e.to_string())));
    }

    let session = state.session.read().await;
    let visible = session.visible_with(&filters);
    let response = ViewResponse::success(
        session.revision(),
        RenderGraph::from_filtered(&visible),
        GraphMetrics::from_filtered(&visible),
    );
    (StatusCode::OK, Json(response))
}

/// Facet options over the full node set.
pub async fn facets_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(session.facet_options()))
}

// =============================================================================
// FILTER HANDLERS
// =============================================================================

pub async fn get_filters_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(FiltersResponse::success(session.filters())))
}

/// Replace the whole filter state.
pub async fn put_filters_handler(
    State(state): State<AppState>,
    Json(filters): Json<FilterState>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    filters_result(session.replace_filters(filters))
}

/// Apply one filter operation to the published state.
pub async fn filter_op_handler(
    State(state): State<AppState>,
    Json(op): Json<FilterOp>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    tracing::debug!(?op, "Applying filter operation");
    filters_result(session.apply_op(&op))
}

pub async fn reset_filters_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    filters_result(session.apply_op(&FilterOp::ResetAll))
}

fn filters_result(
    result: Result<&FilterState, RelgraphError>,
) -> (StatusCode, Json<FiltersResponse>) {
    match result {
        Ok(filters) => (StatusCode::OK, Json(FiltersResponse::success(filters))),
        Err(e) => (status_for(&e), Json(FiltersResponse::error(e.to_string()))),
    }
}

// =============================================================================
// DETAIL HANDLER
// =============================================================================

/// A member's relations grouped by type.
pub async fn detail_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    let session = state.session.read().await;
    match session.detail(&email) {
        Some(detail) => (StatusCode::OK, Json(DetailResponse::found(detail))),
        None => (StatusCode::NOT_FOUND, Json(DetailResponse::not_found(&email))),
    }
}

// =============================================================================
// SNAPSHOT HANDLER
// =============================================================================

/// Publish a new snapshot. Filters are kept.
pub async fn snapshot_handler(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.refresh(snapshot);
    tracing::info!("Snapshot replaced (revision {})", session.revision());
    (StatusCode::OK, Json(SnapshotResponse::from_session(&session)))
}
