//! # Derived Graph Types
//!
//! Renderer-facing node and edge structures derived from a member snapshot.
//!
//! A [`MemberGraph`] is always the output of one builder pass; it is never
//! patched incrementally. Node ids are member emails.

use crate::primitives::{MIN_NODE_SIZE, NODE_SIZE_DIVISOR};
use crate::{Member, MemberRelation, RelationType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// GRAPH NODE
// =============================================================================

/// A member rendered as a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Node id: the member's email.
    pub id: String,
    /// `"first_name last_name"`.
    pub label: String,
    /// Monotonic in the member's engagement score.
    pub size: u32,
    /// Derived from the member's status.
    pub color: String,
    pub member: Member,
    /// Number of relations naming this member as either endpoint.
    pub connection_count: usize,
    /// Distinct relation types this member takes part in.
    pub relation_types: BTreeSet<RelationType>,
}

impl GraphNode {
    /// Derive a node from a member and its precomputed relation metrics.
    #[must_use]
    pub fn from_member(
        member: &Member,
        connection_count: usize,
        relation_types: BTreeSet<RelationType>,
    ) -> Self {
        Self {
            id: member.email.clone(),
            label: member.full_name(),
            size: node_size(member.clamped_score()),
            color: member.status.color().to_string(),
            member: member.clone(),
            connection_count,
            relation_types,
        }
    }
}

/// Node size for a given engagement score.
#[must_use]
pub fn node_size(engagement_score: u8) -> u32 {
    MIN_NODE_SIZE + u32::from(engagement_score) / NODE_SIZE_DIVISOR
}

// =============================================================================
// GRAPH EDGE
// =============================================================================

/// A member relation rendered as a graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// `"{member_email}-{related_member_email}"`.
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: RelationType,
    pub color: String,
    pub size: u32,
    pub relation: MemberRelation,
}

impl GraphEdge {
    /// Derive an edge from a relation record.
    #[must_use]
    pub fn from_relation(relation: &MemberRelation) -> Self {
        Self {
            id: format!("{}-{}", relation.member_email, relation.related_member_email),
            source: relation.member_email.clone(),
            target: relation.related_member_email.clone(),
            label: relation.relation_type,
            color: relation.relation_type.color().to_string(),
            size: relation.relation_type.edge_size(),
            relation: relation.clone(),
        }
    }

    /// Returns true if `id` is either endpoint of this edge.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

// =============================================================================
// MEMBER GRAPH
// =============================================================================

/// The full, unfiltered graph derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl MemberGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every node, in deterministic order.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Lookup a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
