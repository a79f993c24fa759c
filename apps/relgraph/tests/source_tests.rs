//! Integration tests for snapshot sources.
//!
//! The repository client is exercised against a throwaway axum server bound
//! to an ephemeral local port.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::{Json, Router, http::StatusCode, routing::get};
use relgraph::config::SourceConfig;
use relgraph::source::{RepositoryClient, SnapshotSource};
use serde_json::{Value, json};
use std::io::Write;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn members_body() -> Value {
    json!({
        "success": true,
        "data": [
            {"email": "a@cjd.fr", "firstName": "Alice", "lastName": "Martin",
             "status": "active", "engagementScore": 80},
            {"email": "b@cjd.fr", "firstName": "Bruno", "lastName": "Petit",
             "status": "inactive"}
        ]
    })
}

fn relations_body() -> Value {
    json!({
        "success": true,
        "data": [
            {"id": "r1", "memberEmail": "a@cjd.fr", "relatedMemberEmail": "b@cjd.fr",
             "relationType": "sponsor", "createdAt": "2025-01-15T09:00:00Z"}
        ]
    })
}

/// Serve `router` on 127.0.0.1 and return its base URL.
async fn spawn_repository(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn core_routes() -> Router {
    Router::new()
        .route("/members", get(|| async { Json(members_body()) }))
        .route("/relations", get(|| async { Json(relations_body()) }))
}

// =============================================================================
// REPOSITORY CLIENT TESTS
// =============================================================================

#[test]
fn test_client_trims_trailing_slash() {
    let client = RepositoryClient::new("http://localhost:4000/api/");
    assert_eq!(client.base_url(), "http://localhost:4000/api");
}

#[tokio::test]
async fn test_client_fetches_snapshot_with_patrons() {
    let router = core_routes()
        .route(
            "/patrons",
            get(|| async {
                Json(json!({"success": true, "data": [
                    {"id": "p1", "firstName": "Paul", "lastName": "Mecene"}
                ]}))
            }),
        )
        .route(
            "/patron-referrals",
            get(|| async {
                Json(json!({"success": true, "data": [
                    {"id": "pr1", "patronId": "p1", "memberEmail": "a@cjd.fr"}
                ]}))
            }),
        );
    let base = spawn_repository(router).await;

    let snapshot = RepositoryClient::new(&base).snapshot().await.unwrap();

    assert_eq!(snapshot.members.len(), 2);
    assert_eq!(snapshot.relations.len(), 1);
    assert_eq!(snapshot.patrons.len(), 1);
    assert_eq!(snapshot.patron_referrals[0].member_email, "a@cjd.fr");
}

#[tokio::test]
async fn test_client_tolerates_missing_patron_endpoints() {
    let base = spawn_repository(core_routes()).await;

    let snapshot = RepositoryClient::new(&base).snapshot().await.unwrap();

    assert_eq!(snapshot.members.len(), 2);
    assert!(snapshot.patrons.is_empty());
}

#[tokio::test]
async fn test_client_reports_upstream_failure() {
    let router = Router::new()
        .route(
            "/members",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        )
        .route("/relations", get(|| async { Json(relations_body()) }));
    let base = spawn_repository(router).await;

    let err = RepositoryClient::new(&base).snapshot().await.unwrap_err();

    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_client_surfaces_envelope_error() {
    let router = Router::new()
        .route(
            "/members",
            get(|| async { Json(json!({"success": false, "error": "database offline"})) }),
        )
        .route("/relations", get(|| async { Json(relations_body()) }));
    let base = spawn_repository(router).await;

    let err = RepositoryClient::new(&base).snapshot().await.unwrap_err();

    assert!(err.to_string().contains("database offline"));
}

// =============================================================================
// SNAPSHOT SOURCE TESTS
// =============================================================================

#[tokio::test]
async fn test_source_prefers_repository() {
    let base = spawn_repository(core_routes()).await;
    let config = SourceConfig {
        members: Some("members.json".into()),
        relations: Some("relations.json".into()),
        api_url: Some(base),
        ..SourceConfig::default()
    };

    let source = SnapshotSource::from_config(&config);

    assert!(matches!(source, SnapshotSource::Repository(_)));
    assert_eq!(source.load().await.unwrap().members.len(), 2);
}

#[tokio::test]
async fn test_source_reads_bare_array_files() {
    let dir = tempfile::tempdir().unwrap();
    let members = dir.path().join("members.json");
    let relations = dir.path().join("relations.json");
    let mut file = std::fs::File::create(&members).unwrap();
    write!(file, "{}", members_body()["data"]).unwrap();
    std::fs::write(&relations, relations_body().to_string()).unwrap();

    let config = SourceConfig {
        members: Some(members),
        relations: Some(relations),
        ..SourceConfig::default()
    };
    let snapshot = SnapshotSource::from_config(&config).load().await.unwrap();

    assert_eq!(snapshot.members.len(), 2);
    assert_eq!(snapshot.relations.len(), 1);
}

#[tokio::test]
async fn test_empty_source_yields_empty_snapshot() {
    let source = SnapshotSource::from_config(&SourceConfig::default());

    assert_eq!(source.describe(), "none");
    assert!(source.load().await.unwrap().is_empty());
}
