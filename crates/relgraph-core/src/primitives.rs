//! # Rendering & Limit Primitives
//!
//! Hardcoded constants for graph derivation and input validation.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Node sizes and edge sizes are integers; the renderer scales them.

// =============================================================================
// NODE DERIVATION
// =============================================================================

/// Upper bound of a member's engagement score.
pub const MAX_ENGAGEMENT_SCORE: u8 = 100;

/// Size of a node whose member has an engagement score of 0.
pub const MIN_NODE_SIZE: u32 = 5;

/// Engagement points per extra unit of node size.
///
/// `size = MIN_NODE_SIZE + score / NODE_SIZE_DIVISOR`, so sizes span `5..=15`.
pub const NODE_SIZE_DIVISOR: u32 = 10;

/// Node color for active members.
pub const ACTIVE_NODE_COLOR: &str = "#10b981";

/// Node color for inactive members.
pub const INACTIVE_NODE_COLOR: &str = "#9ca3af";

// =============================================================================
// EDGE DERIVATION
// =============================================================================

/// Edge size for sponsor relations.
pub const SPONSOR_EDGE_SIZE: u32 = 2;

/// Edge size for every other relation type.
pub const DEFAULT_EDGE_SIZE: u32 = 1;

pub const SPONSOR_EDGE_COLOR: &str = "#3b82f6";
pub const TEAM_EDGE_COLOR: &str = "#10b981";
pub const CUSTOM_EDGE_COLOR: &str = "#8b5cf6";

// =============================================================================
// PATRON OVERLAY
// =============================================================================

/// Prefix that keeps patron node ids disjoint from member emails.
pub const PATRON_NODE_PREFIX: &str = "patron:";

/// Edge label of the patron referral category.
pub const PATRON_REFERRAL_LABEL: &str = "patron_referral";

pub const PATRON_NODE_SIZE: u32 = 8;
pub const PATRON_NODE_COLOR: &str = "#f59e0b";
pub const PATRON_EDGE_COLOR: &str = "#f59e0b";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of a search query, in bytes.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

/// Maximum number of selected values in a single facet set.
pub const MAX_FACET_VALUES: usize = 512;

/// Maximum size of a single snapshot payload (64 MB).
///
/// Checked before deserialization so oversized payloads are never parsed.
pub const MAX_SNAPSHOT_BYTES: usize = 64 * 1024 * 1024;
