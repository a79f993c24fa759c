//! # Render Document
//!
//! Flattens a visible subgraph into the `{ nodes, links }` document a
//! force-directed renderer consumes. Member and patron nodes are merged into
//! one list and told apart by `kind`.

use crate::filter::FilteredGraph;
use crate::graph::{GraphEdge, GraphNode, MemberGraph};
use crate::patron::{PatronEdge, PatronNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Member,
    Patron,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub size: u32,
    pub color: String,
    pub kind: NodeKind,
}

impl From<&GraphNode> for RenderNode {
    fn from(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            size: node.size,
            color: node.color.clone(),
            kind: NodeKind::Member,
        }
    }
}

impl From<&PatronNode> for RenderNode {
    fn from(node: &PatronNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            size: node.size,
            color: node.color.clone(),
            kind: NodeKind::Patron,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderLink {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub color: String,
    pub size: u32,
}

impl From<&GraphEdge> for RenderLink {
    fn from(edge: &GraphEdge) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            label: edge.label.as_str().to_string(),
            color: edge.color.clone(),
            size: edge.size,
        }
    }
}

impl From<&PatronEdge> for RenderLink {
    fn from(edge: &PatronEdge) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            label: edge.label.clone(),
            color: edge.color.clone(),
            size: edge.size,
        }
    }
}

/// Renderer input. Every link endpoint is a node id in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub links: Vec<RenderLink>,
}

impl RenderGraph {
    /// Member nodes first, then patron nodes; same for links.
    #[must_use]
    pub fn from_filtered(filtered: &FilteredGraph) -> Self {
        let nodes = filtered
            .nodes
            .iter()
            .map(RenderNode::from)
            .chain(filtered.patron_nodes.iter().map(RenderNode::from))
            .collect();
        let links = filtered
            .edges
            .iter()
            .map(RenderLink::from)
            .chain(filtered.patron_edges.iter().map(RenderLink::from))
            .collect();
        Self { nodes, links }
    }

    /// The unfiltered member graph.
    #[must_use]
    pub fn from_graph(graph: &MemberGraph) -> Self {
        Self {
            nodes: graph.nodes.iter().map(RenderNode::from).collect(),
            links: graph.edges.iter().map(RenderLink::from).collect(),
        }
    }
}
