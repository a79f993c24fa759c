//! # Core Type Definitions
//!
//! This module contains the snapshot types the engine consumes:
//! - Member roster entries (`Member`, `MemberStatus`)
//! - Pairwise relationship records (`MemberRelation`, `RelationType`)
//! - Error types (`RelgraphError`)
//!
//! ## Snapshot Semantics
//!
//! All types in this module are immutable snapshots produced by the member
//! repository. The engine never mutates them; it only derives graphs from them.
//! JSON field names follow the repository's camelCase convention.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::primitives::{
    ACTIVE_NODE_COLOR, CUSTOM_EDGE_COLOR, DEFAULT_EDGE_SIZE, INACTIVE_NODE_COLOR,
    MAX_ENGAGEMENT_SCORE, SPONSOR_EDGE_COLOR, SPONSOR_EDGE_SIZE, TEAM_EDGE_COLOR,
};

// =============================================================================
// RELATION TYPE
// =============================================================================

/// The three canonical relationship categories between members.
///
/// Patron referrals are deliberately not part of this enum; they come from a
/// separate source and are layered on by [`crate::patron::PatronOverlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// One member sponsored (brought in) the other.
    Sponsor,
    /// Both members work in the same team.
    Team,
    /// Free-form relationship described by the record's description.
    Custom,
}

impl RelationType {
    /// All canonical relation types, in display order.
    pub const ALL: [RelationType; 3] = [Self::Sponsor, Self::Team, Self::Custom];

    /// Wire name of the relation type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sponsor => "sponsor",
            Self::Team => "team",
            Self::Custom => "custom",
        }
    }

    /// Edge color used by the renderer for this relation type.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Sponsor => SPONSOR_EDGE_COLOR,
            Self::Team => TEAM_EDGE_COLOR,
            Self::Custom => CUSTOM_EDGE_COLOR,
        }
    }

    /// Edge thickness: sponsor links are drawn heavier than the rest.
    #[must_use]
    pub const fn edge_size(self) -> u32 {
        match self {
            Self::Sponsor => SPONSOR_EDGE_SIZE,
            Self::Team | Self::Custom => DEFAULT_EDGE_SIZE,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = RelgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sponsor" => Ok(Self::Sponsor),
            "team" => Ok(Self::Team),
            "custom" => Ok(Self::Custom),
            other => Err(RelgraphError::InvalidFilter(format!(
                "unknown relation type '{}' (expected sponsor, team or custom)",
                other
            ))),
        }
    }
}

// =============================================================================
// MEMBER
// =============================================================================

/// Membership status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    /// Node color used by the renderer for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Active => ACTIVE_NODE_COLOR,
            Self::Inactive => INACTIVE_NODE_COLOR,
        }
    }
}

/// A member of the association, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique email address; doubles as the graph node id.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Role held inside the association (board, committee, ...).
    #[serde(default)]
    pub cjd_role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    pub status: MemberStatus,
    /// Engagement score in `0..=100`. Out-of-range or malformed input is
    /// clamped on read so one bad row cannot reject the roster.
    #[serde(default, deserialize_with = "lenient_score")]
    pub engagement_score: u8,
    #[serde(default)]
    pub activity_count: u32,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// Read an engagement score from any JSON shape, clamped into `0..=100`.
///
/// Fractions are rounded, negatives become 0, numeric strings are parsed,
/// anything else (null, bool, garbage text) reads as 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Unsigned(u64),
        Signed(#[allow(dead_code)] i64),
        Fraction(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let max = u64::from(MAX_ENGAGEMENT_SCORE);
    let from_fraction = |f: f64| (f.round() as u64).min(max);

    let score = match RawScore::deserialize(deserializer)? {
        RawScore::Unsigned(n) => n.min(max),
        RawScore::Signed(_) | RawScore::Other(_) => 0,
        RawScore::Fraction(f) => from_fraction(f),
        RawScore::Text(text) => text.trim().parse::<f64>().map(from_fraction).unwrap_or(0),
    };
    Ok(u8::try_from(score).unwrap_or(MAX_ENGAGEMENT_SCORE))
}

impl Member {
    /// Create an active member with only the required fields set.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            company: None,
            role: None,
            cjd_role: None,
            department: None,
            city: None,
            postal_code: None,
            sector: None,
            status: MemberStatus::Active,
            engagement_score: 0,
            activity_count: 0,
            last_activity_at: None,
        }
    }

    /// Builder-style status setter.
    #[must_use]
    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style engagement score setter.
    #[must_use]
    pub fn with_engagement_score(mut self, score: u8) -> Self {
        self.engagement_score = score;
        self
    }

    /// Display name: `"first_name last_name"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Engagement score clamped to `0..=100`.
    #[must_use]
    pub fn clamped_score(&self) -> u8 {
        self.engagement_score.min(MAX_ENGAGEMENT_SCORE)
    }
}

// =============================================================================
// MEMBER RELATION
// =============================================================================

/// A relationship record between two members.
///
/// The pair is unordered in meaning but stored with two directed endpoint
/// fields; the engine treats it as undirected wherever adjacency matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRelation {
    pub id: String,
    pub member_email: String,
    pub related_member_email: String,
    pub relation_type: RelationType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MemberRelation {
    /// Create a relation record stamped with the current time.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        member_email: impl Into<String>,
        related_member_email: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            id: id.into(),
            member_email: member_email.into(),
            related_member_email: related_member_email.into(),
            relation_type,
            description: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    /// Returns true if `email` is either endpoint of this relation.
    #[must_use]
    pub fn involves(&self, email: &str) -> bool {
        self.member_email == email || self.related_member_email == email
    }

    /// The endpoint opposite to `email`, if `email` is an endpoint.
    ///
    /// For a self-relation the same email is returned.
    #[must_use]
    pub fn counterpart(&self, email: &str) -> Option<&str> {
        if self.member_email == email {
            Some(&self.related_member_email)
        } else if self.related_member_email == email {
            Some(&self.member_email)
        } else {
            None
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur at the edges of the engine.
///
/// Graph building and filtering are total and never produce these; only
/// snapshot parsing, filter validation and the hosting layers do.
#[derive(Debug, Error)]
pub enum RelgraphError {
    /// The member repository reported a failure (`success: false`).
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A snapshot payload could not be parsed.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// A value could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A payload exceeded its size limit.
    #[error("Payload too large: {size} bytes exceeds {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// A filter state or filter operation was rejected.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// No member with this email in the current snapshot.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
