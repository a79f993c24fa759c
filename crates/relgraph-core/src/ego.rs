//! # Ego-Network Extraction
//!
//! One-hop neighborhoods over the undirected view of the edge list.
//!
//! Callers pass the full, unfiltered edge list: which relation types are
//! currently displayed has no influence on who counts as a neighbor.

use crate::graph::GraphEdge;
use std::collections::BTreeSet;

/// Ids directly adjacent to `center`, checking both endpoint fields.
///
/// A self-relation makes `center` its own neighbor.
#[must_use]
pub fn neighbors<'a>(center: &str, edges: &'a [GraphEdge]) -> BTreeSet<&'a str> {
    let mut result = BTreeSet::new();
    for edge in edges {
        if edge.source == center {
            result.insert(edge.target.as_str());
        }
        if edge.target == center {
            result.insert(edge.source.as_str());
        }
    }
    result
}

/// `{center} ∪ neighbors(center)`.
#[must_use]
pub fn ego_members<'a>(center: &'a str, edges: &'a [GraphEdge]) -> BTreeSet<&'a str> {
    let mut members = neighbors(center, edges);
    members.insert(center);
    members
}

// =============================================================================
// TESTS
// =============================================================================
