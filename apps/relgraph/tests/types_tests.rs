//! Unit tests for API types and configuration serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use relgraph::api::{DetailResponse, FiltersResponse, HealthResponse, ViewResponse};
use relgraph::config::{DEFAULT_RATE_LIMIT, RelgraphConfig};
use relgraph_core::{
    Facet, FilterOp, FilterState, GraphMetrics, RelationType, RenderGraph, Snapshot, StatusFilter,
    ViewMode,
};
use std::io::Write;

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.3.0".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.3.0\""));
}

// =============================================================================
// VIEW RESPONSE TESTS
// =============================================================================

#[test]
fn test_view_response_success_serialization() {
    let response = ViewResponse::success(3, RenderGraph::default(), GraphMetrics::empty());

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":true"));
    assert!(json.contains("\"revision\":3"));
    assert!(json.contains("\"nodes\":[]"));
    assert!(!json.contains("\"error\""));
}

#[test]
fn test_view_response_error_omits_graph() {
    let response = ViewResponse::error("bad filter");

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":false"));
    assert!(json.contains("\"error\":\"bad filter\""));
    assert!(!json.contains("\"graph\""));
    assert!(!json.contains("\"metrics\""));
}

// =============================================================================
// FILTERS RESPONSE TESTS
// =============================================================================

#[test]
fn test_filters_response_counts_active_filters() {
    let filters = FilterState::default()
        .with_search_query("durand")
        .with_member_status(StatusFilter::Inactive);
    let response = FiltersResponse::success(&filters);

    assert!(response.success);
    assert_eq!(response.active_filters, Some(2));

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"searchQuery\":\"durand\""));
    assert!(json.contains("\"memberStatus\":\"inactive\""));
}

#[test]
fn test_detail_response_not_found() {
    let response = DetailResponse::not_found("ghost@cjd.fr");

    assert!(!response.success);
    assert!(response.detail.is_none());
    assert!(response.error.unwrap().contains("ghost@cjd.fr"));
}

// =============================================================================
// FILTER STATE WIRE FORMAT TESTS
// =============================================================================

#[test]
fn test_filter_state_partial_json_uses_defaults() {
    let json = r#"{"cities":["Lyon"],"showPatrons":true}"#;
    let state: FilterState = serde_json::from_str(json).unwrap();

    assert_eq!(state.relation_types.len(), 3);
    assert_eq!(state.member_status, StatusFilter::All);
    assert_eq!(state.view_mode, ViewMode::Network);
    assert!(state.cities.contains("Lyon"));
    assert!(state.show_patrons);
}

#[test]
fn test_filter_state_ego_view_round_trip() {
    let state = FilterState::default().with_ego_network("a@cjd.fr");

    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"viewMode\":\"ego-network\""));
    assert!(json.contains("\"egoNetworkCenter\":\"a@cjd.fr\""));

    let back: FilterState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn test_filter_op_facet_deserialization() {
    let json = r#"{"op":"facet","facet":"city","value":"Lyon","enabled":true}"#;
    let op: FilterOp = serde_json::from_str(json).unwrap();

    assert_eq!(
        op,
        FilterOp::Facet {
            facet: Facet::City,
            value: "Lyon".to_string(),
            enabled: true,
        }
    );
}

#[test]
fn test_filter_op_relation_type_deserialization() {
    let json = r#"{"op":"relationType","relationType":"custom","enabled":false}"#;
    let op: FilterOp = serde_json::from_str(json).unwrap();

    let state = FilterState::default().apply_op(&op);
    assert!(!state.relation_types.contains(&RelationType::Custom));
}

#[test]
fn test_filter_op_unit_variants() {
    let reset: FilterOp = serde_json::from_str(r#"{"op":"resetAll"}"#).unwrap();
    let network: FilterOp = serde_json::from_str(r#"{"op":"networkMode"}"#).unwrap();

    assert_eq!(reset, FilterOp::ResetAll);
    assert_eq!(network, FilterOp::NetworkMode);
}

#[test]
fn test_filter_op_unknown_tag_rejected() {
    let result = serde_json::from_str::<FilterOp>(r#"{"op":"explode"}"#);
    assert!(result.is_err());
}

// =============================================================================
// SNAPSHOT WIRE FORMAT TESTS
// =============================================================================

#[test]
fn test_snapshot_deserialization() {
    let json = r#"{
        "members": [
            {"email":"a@cjd.fr","firstName":"Alice","lastName":"Martin","status":"active",
             "engagementScore":70,"cjdRole":"president"}
        ],
        "relations": [
            {"id":"r1","memberEmail":"a@cjd.fr","relatedMemberEmail":"b@cjd.fr",
             "relationType":"team","createdAt":"2025-03-01T10:00:00Z"}
        ]
    }"#;
    let snapshot: Snapshot = serde_json::from_str(json).unwrap();

    assert_eq!(snapshot.members.len(), 1);
    assert_eq!(snapshot.members[0].cjd_role.as_deref(), Some("president"));
    assert_eq!(snapshot.relations[0].relation_type, RelationType::Team);
    assert!(snapshot.patrons.is_empty());
}

// =============================================================================
// CONFIGURATION TESTS
// =============================================================================

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[source]
members = "data/members.json"
relations = "data/relations.json"

[server]
port = 9090
cors_origins = ["https://admin.cjd.fr"]

[filters]
memberStatus = "active"
cities = ["Lyon"]
"#
    )
    .unwrap();

    let config = RelgraphConfig::from_file(file.path()).unwrap();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.rate_limit, DEFAULT_RATE_LIMIT);
    assert_eq!(config.server.cors_origins, vec!["https://admin.cjd.fr"]);
    assert_eq!(config.filters.member_status, StatusFilter::Active);
    assert!(config.filters.cities.contains("Lyon"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_filters_are_normalized() {
    let config = RelgraphConfig::from_toml(
        r#"
[filters]
cities = [" Lyon ", ""]
sectors = ["   "]
"#,
    )
    .unwrap();

    assert_eq!(config.filters, FilterState::default().with_city("Lyon", true));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = RelgraphConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn test_config_rejects_invalid_filters() {
    let config = RelgraphConfig::from_toml(
        r#"
[filters]
viewMode = "ego-network"
"#,
    )
    .unwrap();

    assert!(config.validate().is_err());
}
