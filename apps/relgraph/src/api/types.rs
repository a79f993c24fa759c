//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Engine types
//! (`FilterState`, `FilterOp`, `RenderGraph`, `FacetOptions`, `Snapshot`)
//! are used on the wire as-is.

use relgraph_core::{
    FilterState, GraphMetrics, GraphSession, MemberDetail, RelgraphError, RenderGraph,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Session status: full-graph metrics plus the size of the current view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub revision: u64,
    pub metrics: GraphMetrics,
    pub visible_nodes: usize,
    pub visible_edges: usize,
    pub active_filters: usize,
}

impl StatusResponse {
    #[must_use]
    pub fn from_session(session: &GraphSession) -> Self {
        let visible = session.visible();
        Self {
            revision: session.revision(),
            metrics: session.metrics(),
            visible_nodes: visible.nodes.len() + visible.patron_nodes.len(),
            visible_edges: visible.edges.len() + visible.patron_edges.len(),
            active_filters: session.filters().active_filter_count(),
        }
    }
}

// =============================================================================
// VIEW RESPONSE
// =============================================================================

/// A render document with metrics for the same node/edge set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub success: bool,
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<RenderGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<GraphMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ViewResponse {
    #[must_use]
    pub fn success(revision: u64, graph: RenderGraph, metrics: GraphMetrics) -> Self {
        Self {
            success: true,
            revision,
            graph: Some(graph),
            metrics: Some(metrics),
            error: None,
        }
    }

    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            revision: 0,
            graph: None,
            metrics: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// FILTERS RESPONSE
// =============================================================================

/// The published filter state after a read or an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_filters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FiltersResponse {
    #[must_use]
    pub fn success(filters: &FilterState) -> Self {
        Self {
            success: true,
            filters: Some(filters.clone()),
            active_filters: Some(filters.active_filter_count()),
            error: None,
        }
    }

    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            filters: None,
            active_filters: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// DETAIL RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<MemberDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetailResponse {
    #[must_use]
    pub fn found(detail: MemberDetail) -> Self {
        Self {
            success: true,
            detail: Some(detail),
            error: None,
        }
    }

    #[must_use]
    pub fn not_found(email: &str) -> Self {
        Self {
            success: false,
            detail: None,
            error: Some(RelgraphError::MemberNotFound(email.to_string()).to_string()),
        }
    }
}

// =============================================================================
// SNAPSHOT RESPONSE
// =============================================================================

/// Result of publishing a new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub revision: u64,
    pub node_count: usize,
    pub edge_count: usize,
}

impl SnapshotResponse {
    #[must_use]
    pub fn from_session(session: &GraphSession) -> Self {
        Self {
            success: true,
            revision: session.revision(),
            node_count: session.graph().node_count(),
            edge_count: session.graph().edge_count(),
        }
    }
}
