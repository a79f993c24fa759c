//! # Graph Builder
//!
//! Pure transform from a member/relation snapshot to a [`MemberGraph`].
//!
//! - Three linear passes: O(members + relations)
//! - Relations naming an unknown member are dropped, never reported as errors
//! - Swapped-direction duplicate relations are kept as separate edges

use crate::graph::{GraphEdge, GraphNode, MemberGraph};
use crate::{Member, MemberRelation, RelationType};
use std::collections::{BTreeMap, BTreeSet};

/// Per-member metrics accumulated from the relation list.
#[derive(Debug, Default)]
struct EndpointStats {
    connection_count: usize,
    relation_types: BTreeSet<RelationType>,
}

/// The Graph Builder.
///
/// Holds no state between calls: every call recomputes the graph wholesale
/// from the snapshot it is given.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the full member graph.
    ///
    /// Every returned edge references two node ids present in the returned
    /// node list. A member email appearing twice keeps its first entry.
    #[must_use]
    pub fn build(members: &[Member], relations: &[MemberRelation]) -> MemberGraph {
        let stats = Self::endpoint_stats(relations);

        // Pass 2: one node per member
        let mut nodes = Vec::with_capacity(members.len());
        let mut node_ids: BTreeSet<&str> = BTreeSet::new();
        for member in members {
            if !node_ids.insert(member.email.as_str()) {
                tracing::debug!(email = %member.email, "skipping duplicate member entry");
                continue;
            }
            let node = match stats.get(member.email.as_str()) {
                Some(s) => {
                    GraphNode::from_member(member, s.connection_count, s.relation_types.clone())
                }
                None => GraphNode::from_member(member, 0, BTreeSet::new()),
            };
            nodes.push(node);
        }

        // Pass 3: keep relations whose both endpoints exist
        let edges: Vec<GraphEdge> = relations
            .iter()
            .filter(|r| {
                node_ids.contains(r.member_email.as_str())
                    && node_ids.contains(r.related_member_email.as_str())
            })
            .map(GraphEdge::from_relation)
            .collect();

        let dropped = relations.len() - edges.len();
        if dropped > 0 {
            tracing::debug!(dropped, "dropped dangling relations");
        }

        MemberGraph { nodes, edges }
    }

    /// Pass 1: connection counts and relation types for both endpoints.
    ///
    /// A self-relation counts once for its single endpoint.
    fn endpoint_stats(relations: &[MemberRelation]) -> BTreeMap<&str, EndpointStats> {
        let mut stats: BTreeMap<&str, EndpointStats> = BTreeMap::new();

        for relation in relations {
            let from = relation.member_email.as_str();
            let to = relation.related_member_email.as_str();

            Self::record(&mut stats, from, relation.relation_type);
            if to != from {
                Self::record(&mut stats, to, relation.relation_type);
            }
        }

        stats
    }

    fn record<'a>(
        stats: &mut BTreeMap<&'a str, EndpointStats>,
        endpoint: &'a str,
        relation_type: RelationType,
    ) {
        let entry = stats.entry(endpoint).or_default();
        entry.connection_count = entry.connection_count.saturating_add(1);
        entry.relation_types.insert(relation_type);
    }
}

// =============================================================================
// TESTS
// =============================================================================
