//! # relgraph-core
//!
//! The deterministic relationship graph engine for relgraph.
//!
//! This crate turns a snapshot of members and their pairwise relations into a
//! renderable graph, then narrows that graph with an independently togglable
//! set of filters.
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot -> GraphBuilder -> MemberGraph -> FilterEngine -> FilteredGraph -> RenderGraph
//!                                               ^
//!                                          FilterState
//! ```
//!
//! ## Architectural Constraints
//!
//! - Graph building and filtering are total: malformed or dangling data is
//!   dropped, never reported as an error
//! - Ordered collections only (`BTreeMap`/`BTreeSet`); output order follows
//!   input order
//! - Integer arithmetic only
//! - NO async, NO network dependencies; fetching snapshots is the host's job

// =============================================================================
// MODULES
// =============================================================================

pub mod builder;
pub mod detail;
pub mod ego;
pub mod filter;
pub mod formats;
pub mod graph;
pub mod metrics;
pub mod patron;
pub mod primitives;
pub mod render;
pub mod session;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Member, MemberRelation, MemberStatus, RelationType, RelgraphError};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use builder::GraphBuilder;
pub use detail::{MemberDetail, RelatedEntry};
pub use ego::{ego_members, neighbors};
pub use filter::{
    Facet, FacetOptions, FilterEngine, FilterOp, FilterState, FilteredGraph, StatusFilter,
    ViewMode, facet_options,
};
pub use graph::{GraphEdge, GraphNode, MemberGraph, node_size};
pub use metrics::GraphMetrics;
pub use patron::{Patron, PatronEdge, PatronNode, PatronOverlay, PatronReferral};
pub use render::{NodeKind, RenderGraph, RenderLink, RenderNode};
pub use session::GraphSession;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{ApiEnvelope, Snapshot, check_payload_size, parse_list};
