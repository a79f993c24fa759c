//! # Filter Engine
//!
//! Computes the visible subgraph of a [`MemberGraph`] under a [`FilterState`].
//!
//! ## Pipeline (order is load-bearing)
//!
//! 1. Member status (skipped for `All`)
//! 2. Engagement score `>= min_engagement_score`
//! 3. Search query substring match (skipped when empty; not trimmed)
//! 4. Every non-empty facet set
//! 5. Ego view: intersect with `{center} ∪ neighbors(center)`, neighbors taken
//!    from the full, unfiltered edge list
//! 6. Recompute the visible id set
//! 7. Edges: both endpoints visible and relation type enabled
//!
//! The center of an ego view is not exempt from steps 1–4.

use super::{Facet, FilterState, StatusFilter};
use crate::ego::ego_members;
use crate::graph::{GraphEdge, GraphNode, MemberGraph};
use crate::patron::{PatronEdge, PatronNode, PatronOverlay};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// FILTERED GRAPH
// =============================================================================

/// The visible set for one filter state.
///
/// No edge references an id outside `nodes` (member edges) or outside
/// `nodes ∪ patron_nodes` (patron edges).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patron_nodes: Vec<PatronNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patron_edges: Vec<PatronEdge>,
}

impl FilteredGraph {
    /// Ids of the visible member nodes.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

// =============================================================================
// FILTER ENGINE
// =============================================================================

/// The Filter Engine. Stateless: the filter state is passed in on every call.
pub struct FilterEngine;

impl FilterEngine {
    /// Apply the filter pipeline to the member graph.
    ///
    /// The patron overlay is not consulted; see [`Self::apply_with_patrons`].
    #[must_use]
    pub fn apply(graph: &MemberGraph, filters: &FilterState) -> FilteredGraph {
        let nodes = Self::visible_nodes(graph, filters);
        let visible_ids: BTreeSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let edges = graph
            .edges
            .iter()
            .filter(|e| {
                visible_ids.contains(e.source.as_str())
                    && visible_ids.contains(e.target.as_str())
                    && filters.relation_types.contains(&e.label)
            })
            .cloned()
            .collect();

        FilteredGraph {
            nodes: nodes.into_iter().cloned().collect(),
            edges,
            patron_nodes: Vec::new(),
            patron_edges: Vec::new(),
        }
    }

    /// Apply the pipeline, then merge the patron overlay if `show_patrons`.
    #[must_use]
    pub fn apply_with_patrons(
        graph: &MemberGraph,
        overlay: &PatronOverlay,
        filters: &FilterState,
    ) -> FilteredGraph {
        let mut filtered = Self::apply(graph, filters);
        if filters.show_patrons && !overlay.is_empty() {
            let (patron_nodes, patron_edges) = overlay.attach(&filtered.node_ids());
            filtered.patron_nodes = patron_nodes;
            filtered.patron_edges = patron_edges;
        }
        filtered
    }

    /// Steps 1–5: the surviving member nodes, in graph order.
    fn visible_nodes<'g>(graph: &'g MemberGraph, filters: &FilterState) -> Vec<&'g GraphNode> {
        let mut nodes: Vec<&GraphNode> = graph.nodes.iter().collect();

        // 1. Status
        if filters.member_status != StatusFilter::All {
            nodes.retain(|n| filters.member_status.admits(n.member.status));
        }

        // 2. Engagement
        if filters.min_engagement_score > 0 {
            nodes.retain(|n| n.member.clamped_score() >= filters.min_engagement_score);
        }

        // 3. Search
        if !filters.search_query.is_empty() {
            let needle = filters.search_query.to_lowercase();
            nodes.retain(|n| matches_search(n, &needle));
        }

        // 4. Facets (empty set = unrestricted)
        for facet in Facet::ALL {
            let selected = filters.facet_values(facet);
            if selected.is_empty() {
                continue;
            }
            nodes.retain(|n| {
                facet
                    .value_of(&n.member)
                    .is_some_and(|value| selected.contains(value))
            });
        }

        // 5. Ego network, against the unfiltered edge list
        if let Some(center) = filters.active_ego_center() {
            let ego = ego_members(center, &graph.edges);
            nodes.retain(|n| ego.contains(n.id.as_str()));
        }

        nodes
    }
}

/// Case-insensitive substring match on full name or email.
fn matches_search(node: &GraphNode, needle: &str) -> bool {
    node.member.full_name().to_lowercase().contains(needle)
        || node.member.email.to_lowercase().contains(needle)
}

// =============================================================================
// TESTS
// =============================================================================
