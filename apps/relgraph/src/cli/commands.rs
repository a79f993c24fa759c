//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::FilterArgs;
use relgraph::api::{self, AppState};
use relgraph::config::RelgraphConfig;
use relgraph::source::{SnapshotSource, spawn_refresh};
use relgraph_core::{
    Facet, FilterState, GraphMetrics, GraphSession, RelationType, RelgraphError, RenderGraph,
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// HELPERS
// =============================================================================

/// Load the configured snapshot into a session.
async fn load_session(
    config: &RelgraphConfig,
    filters: FilterState,
) -> Result<(GraphSession, SnapshotSource), RelgraphError> {
    let source = SnapshotSource::from_config(&config.source);
    tracing::info!("Loading snapshot from {}", source.describe());
    let snapshot = source.load().await?;
    Ok((GraphSession::new(snapshot, filters), source))
}

/// Pretty-print `value` as JSON to `output`, or to stdout.
fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), RelgraphError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| RelgraphError::SerializationError(e.to_string()))?;

    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(|e| {
                RelgraphError::IoError(format!("Write '{}': {}", path.display(), e))
            })?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Resolve CLI filter flags on top of the configured filter state.
pub fn resolve_filters(
    args: &FilterArgs,
    configured: &FilterState,
) -> Result<FilterState, RelgraphError> {
    let mut state = match &args.filters {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                RelgraphError::IoError(format!("Read '{}': {}", path.display(), e))
            })?;
            serde_json::from_slice::<FilterState>(&bytes)
                .map_err(|e| RelgraphError::DeserializationError(format!("filters: {}", e)))?
        }
        None => configured.clone(),
    };

    if let Some(status) = args.status {
        state = state.with_member_status(status);
    }
    if let Some(score) = args.min_score {
        state = state.with_min_engagement_score(score);
    }
    if let Some(query) = &args.search {
        state = state.with_search_query(query.clone());
    }
    for relation_type in &args.hide {
        state = state.with_relation_type(*relation_type, false);
    }
    for raw in &args.facet {
        let (facet, value) = raw.split_once('=').ok_or_else(|| {
            RelgraphError::InvalidFilter(format!("expected facet=value, got '{}'", raw))
        })?;
        state = state.with_facet_value(facet.parse::<Facet>()?, value, true);
    }
    if let Some(center) = &args.ego {
        state = state.with_ego_network(center.clone());
    }
    if args.show_patrons {
        state = state.with_show_patrons(true);
    }

    state.validate()?;
    Ok(state)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(
    mut config: RelgraphConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), RelgraphError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let (session, source) = load_session(&config, config.filters.clone()).await?;
    tracing::info!(
        nodes = session.graph().node_count(),
        edges = session.graph().edge_count(),
        "Initial snapshot loaded"
    );

    let state = AppState::new(session);

    if let Some(secs) = config.source.refresh_secs {
        tracing::info!("Refreshing snapshot every {}s", secs);
        spawn_refresh(state.session.clone(), source, Duration::from_secs(secs));
    }

    api::run_server(state, &config.server).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show graph metrics.
pub async fn cmd_status(config: &RelgraphConfig, json_mode: bool) -> Result<(), RelgraphError> {
    let (session, source) = load_session(config, config.filters.clone()).await?;
    let metrics = session.metrics();

    if json_mode {
        return write_json(&metrics, None);
    }

    print_metrics(&source.describe(), &metrics);
    Ok(())
}

fn print_metrics(source: &str, metrics: &GraphMetrics) {
    println!("relgraph Status");
    println!("===============");
    println!("Source:   {}", source);
    println!();
    println!("Members:  {}", metrics.node_count);
    println!("  Active:   {}", metrics.active_members);
    println!("  Inactive: {}", metrics.inactive_members);
    println!("  Isolated: {}", metrics.isolated_nodes);
    println!("Relations: {}", metrics.edge_count);
    for relation_type in RelationType::ALL {
        println!(
            "  {:<8} {}",
            format!("{}:", relation_type),
            metrics.edges_of(relation_type)
        );
    }
    println!("Patrons:  {}", metrics.patron_count);
    println!();
    println!("Max Degree:       {}", metrics.max_degree);
    println!(
        "Mean Connections: {} per thousand",
        metrics.mean_connections_per_thousand()
    );
}

// =============================================================================
// BUILD / VIEW COMMANDS
// =============================================================================

/// Write the full render document.
pub async fn cmd_build(
    config: &RelgraphConfig,
    output: Option<&Path>,
) -> Result<(), RelgraphError> {
    let (session, _) = load_session(config, FilterState::default()).await?;
    write_json(&RenderGraph::from_graph(session.graph()), output)
}

/// Write the render document under the resolved filter state.
pub async fn cmd_view(
    config: &RelgraphConfig,
    args: &FilterArgs,
    output: Option<&Path>,
) -> Result<(), RelgraphError> {
    let filters = resolve_filters(args, &config.filters)?;
    let (session, _) = load_session(config, filters).await?;

    let visible = session.visible();
    tracing::info!(
        nodes = visible.nodes.len(),
        edges = visible.edges.len(),
        patrons = visible.patron_nodes.len(),
        "View computed"
    );
    write_json(&RenderGraph::from_filtered(&visible), output)
}

// =============================================================================
// FACETS COMMAND
// =============================================================================

/// List facet options.
pub async fn cmd_facets(config: &RelgraphConfig, json_mode: bool) -> Result<(), RelgraphError> {
    let (session, _) = load_session(config, FilterState::default()).await?;
    let options = session.facet_options();

    if json_mode {
        return write_json(&options, None);
    }

    for facet in Facet::ALL {
        let values = options.get(facet);
        println!("{} ({}):", facet, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
    Ok(())
}

// =============================================================================
// DETAIL COMMAND
// =============================================================================

/// Show a member's relations grouped by type.
pub async fn cmd_detail(
    config: &RelgraphConfig,
    email: &str,
    json_mode: bool,
) -> Result<(), RelgraphError> {
    let (session, _) = load_session(config, FilterState::default()).await?;
    let detail = session
        .detail(email)
        .ok_or_else(|| RelgraphError::MemberNotFound(email.to_string()))?;

    if json_mode {
        return write_json(&detail, None);
    }

    println!("{} <{}>", detail.member.full_name(), detail.member.email);
    println!("Relations: {}", detail.total_relations);
    for relation_type in RelationType::ALL {
        let entries = detail.of_type(relation_type);
        if entries.is_empty() {
            continue;
        }
        println!();
        println!("{} ({}):", relation_type, entries.len());
        for entry in entries {
            let name = entry
                .counterpart
                .as_ref()
                .map(|m| m.full_name())
                .unwrap_or_else(|| "(unknown member)".to_string());
            println!("  {} <{}>", name, entry.counterpart_email);
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
