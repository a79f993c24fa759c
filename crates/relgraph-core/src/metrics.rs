//! # Graph Metrics
//!
//! Summary counts over a member graph or a visible subgraph, for status
//! displays. Integer arithmetic only.

use crate::filter::FilteredGraph;
use crate::graph::{GraphEdge, GraphNode, MemberGraph};
use crate::{MemberStatus, RelationType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Metrics extracted from a set of nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edge count per relation type; every type is present, possibly at 0.
    pub edges_by_type: BTreeMap<RelationType, usize>,
    pub active_members: usize,
    pub inactive_members: usize,
    /// Nodes with no incident edge in this edge set.
    pub isolated_nodes: usize,
    /// Highest number of incident edges on a single node.
    pub max_degree: usize,
    /// Sum of incident edge counts over all nodes; a self-loop counts once.
    #[serde(default)]
    pub connection_total: usize,
    /// Edge/node ratio stored as fixed-point: ratio * 1_000_000.
    pub density_millionths: u64,
    #[serde(default)]
    pub patron_count: usize,
}

impl GraphMetrics {
    /// Create new metrics with all zeros.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_parts(&[], &[])
    }

    /// Compute metrics from nodes and edges.
    #[must_use]
    pub fn from_parts(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let node_count = nodes.len();
        let edge_count = edges.len();

        let mut edges_by_type: BTreeMap<RelationType, usize> =
            RelationType::ALL.into_iter().map(|t| (t, 0)).collect();
        let mut degree: BTreeMap<&str, usize> = BTreeMap::new();
        for edge in edges {
            *edges_by_type.entry(edge.label).or_default() += 1;
            *degree.entry(edge.source.as_str()).or_default() += 1;
            if edge.target != edge.source {
                *degree.entry(edge.target.as_str()).or_default() += 1;
            }
        }

        let active_members = nodes
            .iter()
            .filter(|n| n.member.status == MemberStatus::Active)
            .count();

        let connected: BTreeSet<&str> = degree.keys().copied().collect();
        let isolated_nodes = nodes
            .iter()
            .filter(|n| !connected.contains(n.id.as_str()))
            .count();

        let density_millionths = if node_count > 0 {
            (edge_count as u64).saturating_mul(1_000_000) / (node_count as u64)
        } else {
            0
        };

        Self {
            node_count,
            edge_count,
            edges_by_type,
            active_members,
            inactive_members: node_count - active_members,
            isolated_nodes,
            max_degree: degree.values().copied().max().unwrap_or(0),
            connection_total: degree.values().sum(),
            density_millionths,
            patron_count: 0,
        }
    }

    /// Compute metrics for a full member graph.
    #[must_use]
    pub fn from_graph(graph: &MemberGraph) -> Self {
        Self::from_parts(&graph.nodes, &graph.edges)
    }

    /// Compute metrics for a visible subgraph, counting merged patrons.
    #[must_use]
    pub fn from_filtered(filtered: &FilteredGraph) -> Self {
        Self {
            patron_count: filtered.patron_nodes.len(),
            ..Self::from_parts(&filtered.nodes, &filtered.edges)
        }
    }

    /// Get density as parts per thousand (integer only, no floats).
    #[must_use]
    pub fn density_per_thousand(&self) -> u64 {
        self.density_millionths / 1000
    }

    /// Mean connections per node, in thousandths.
    #[must_use]
    pub fn mean_connections_per_thousand(&self) -> u64 {
        if self.node_count == 0 {
            return 0;
        }
        (self.connection_total as u64).saturating_mul(1000) / (self.node_count as u64)
    }

    /// Edge count for one relation type.
    #[must_use]
    pub fn edges_of(&self, relation_type: RelationType) -> usize {
        self.edges_by_type.get(&relation_type).copied().unwrap_or(0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
