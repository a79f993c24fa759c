//! # Session Module
//!
//! A graph session combines the latest snapshot with the current filter state.
//!
//! - The member graph and patron overlay are derived from the snapshot and
//!   rebuilt wholesale on every [`GraphSession::refresh`]
//! - The filter state survives refreshes
//! - Filter updates replace the whole state; a state that fails validation is
//!   never published
//!
//! The session holds no locks. Hosts that share it across tasks wrap it in
//! their own lock and perform read-derive-publish under the write guard.

use crate::builder::GraphBuilder;
use crate::detail::MemberDetail;
use crate::filter::{FacetOptions, FilterEngine, FilterOp, FilterState, FilteredGraph};
use crate::formats::Snapshot;
use crate::graph::MemberGraph;
use crate::metrics::GraphMetrics;
use crate::patron::PatronOverlay;
use crate::render::RenderGraph;
use crate::RelgraphError;

#[derive(Debug, Clone, Default)]
pub struct GraphSession {
    snapshot: Snapshot,
    graph: MemberGraph,
    overlay: PatronOverlay,
    filters: FilterState,
    /// Bumped on every snapshot refresh.
    revision: u64,
}

impl GraphSession {
    /// Create a session over a snapshot with an initial filter state.
    #[must_use]
    pub fn new(snapshot: Snapshot, filters: FilterState) -> Self {
        let graph = GraphBuilder::build(&snapshot.members, &snapshot.relations);
        let overlay = PatronOverlay::build(&snapshot.patrons, &snapshot.patron_referrals);
        Self {
            snapshot,
            graph,
            overlay,
            filters,
            revision: 0,
        }
    }

    /// Replace the snapshot and rebuild derived graphs. Filters are kept.
    pub fn refresh(&mut self, snapshot: Snapshot) {
        self.graph = GraphBuilder::build(&snapshot.members, &snapshot.relations);
        self.overlay = PatronOverlay::build(&snapshot.patrons, &snapshot.patron_referrals);
        self.snapshot = snapshot;
        self.revision = self.revision.wrapping_add(1);
        tracing::debug!(
            revision = self.revision,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "snapshot refreshed"
        );
    }

    /// Derive the next filter state from the current one and publish it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilter` if the derived state fails validation; the
    /// current state is left in place.
    pub fn update_filters<F>(&mut self, derive: F) -> Result<&FilterState, RelgraphError>
    where
        F: FnOnce(&FilterState) -> FilterState,
    {
        let next = derive(&self.filters);
        next.validate()?;
        self.filters = next;
        Ok(&self.filters)
    }

    /// Apply one named mutator.
    pub fn apply_op(&mut self, op: &FilterOp) -> Result<&FilterState, RelgraphError> {
        self.update_filters(|current| current.apply_op(op))
    }

    /// Publish a complete filter state.
    pub fn replace_filters(&mut self, filters: FilterState) -> Result<&FilterState, RelgraphError> {
        self.update_filters(|_| filters)
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn graph(&self) -> &MemberGraph {
        &self.graph
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The visible subgraph under the current filters.
    #[must_use]
    pub fn visible(&self) -> FilteredGraph {
        self.visible_with(&self.filters)
    }

    /// The visible subgraph under an ad-hoc filter state, without publishing it.
    #[must_use]
    pub fn visible_with(&self, filters: &FilterState) -> FilteredGraph {
        FilterEngine::apply_with_patrons(&self.graph, &self.overlay, filters)
    }

    #[must_use]
    pub fn render(&self) -> RenderGraph {
        RenderGraph::from_filtered(&self.visible())
    }

    /// Facet options over the full node set, independent of the filters.
    #[must_use]
    pub fn facet_options(&self) -> FacetOptions {
        FacetOptions::from_nodes(&self.graph.nodes)
    }

    #[must_use]
    pub fn detail(&self, email: &str) -> Option<MemberDetail> {
        MemberDetail::for_member(email, &self.snapshot.members, &self.snapshot.relations)
    }

    #[must_use]
    pub fn metrics(&self) -> GraphMetrics {
        GraphMetrics {
            patron_count: self.overlay.nodes.len(),
            ..GraphMetrics::from_graph(&self.graph)
        }
    }

    #[must_use]
    pub fn visible_metrics(&self) -> GraphMetrics {
        GraphMetrics::from_filtered(&self.visible())
    }
}

// =============================================================================
// TESTS
// =============================================================================
