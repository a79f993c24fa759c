//! # Patron Referral Overlay
//!
//! Patrons and their member referrals come from a separate source than the
//! member roster. They are never produced by the Graph Builder; the filter
//! engine layers them on top of the visible member graph when the
//! `show_patrons` toggle is on.
//!
//! Overlay node ids carry the `patron:` prefix so they can never collide with
//! member emails.

use crate::primitives::{
    PATRON_EDGE_COLOR, PATRON_NODE_COLOR, PATRON_NODE_PREFIX, PATRON_NODE_SIZE,
    PATRON_REFERRAL_LABEL,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// SOURCE RECORDS
// =============================================================================

/// An external patron (sponsor company or individual donor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patron {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// A patron's referral of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronReferral {
    pub id: String,
    pub patron_id: String,
    pub member_email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// OVERLAY NODES & EDGES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronNode {
    /// `"patron:{patron.id}"`.
    pub id: String,
    pub label: String,
    pub size: u32,
    pub color: String,
    pub patron: Patron,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronEdge {
    pub id: String,
    /// The patron node id.
    pub source: String,
    /// The referred member's email.
    pub target: String,
    /// Always `"patron_referral"`.
    pub label: String,
    pub color: String,
    pub size: u32,
    pub referral: PatronReferral,
}

/// Patron node id for a patron record id.
#[must_use]
pub fn patron_node_id(patron_id: &str) -> String {
    format!("{}{}", PATRON_NODE_PREFIX, patron_id)
}

// =============================================================================
// OVERLAY
// =============================================================================

/// The full patron overlay derived from one patron snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatronOverlay {
    pub nodes: Vec<PatronNode>,
    pub edges: Vec<PatronEdge>,
}

impl PatronOverlay {
    /// Build the overlay. Referrals naming an unknown patron are dropped.
    #[must_use]
    pub fn build(patrons: &[Patron], referrals: &[PatronReferral]) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let nodes: Vec<PatronNode> = patrons
            .iter()
            .filter(|p| seen.insert(p.id.as_str()))
            .map(|p| PatronNode {
                id: patron_node_id(&p.id),
                label: format!("{} {}", p.first_name, p.last_name),
                size: PATRON_NODE_SIZE,
                color: PATRON_NODE_COLOR.to_string(),
                patron: p.clone(),
            })
            .collect();

        let edges = referrals
            .iter()
            .filter(|r| seen.contains(r.patron_id.as_str()))
            .map(|r| {
                let source = patron_node_id(&r.patron_id);
                PatronEdge {
                    id: format!("{}-{}", source, r.member_email),
                    source,
                    target: r.member_email.clone(),
                    label: PATRON_REFERRAL_LABEL.to_string(),
                    color: PATRON_EDGE_COLOR.to_string(),
                    size: 1,
                    referral: r.clone(),
                }
            })
            .collect();

        Self { nodes, edges }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The part of the overlay attached to the visible member set.
    ///
    /// An edge survives iff its member endpoint is visible; a patron node
    /// survives iff at least one of its edges does.
    #[must_use]
    pub fn attach(&self, visible_members: &BTreeSet<&str>) -> (Vec<PatronNode>, Vec<PatronEdge>) {
        let edges: Vec<PatronEdge> = self
            .edges
            .iter()
            .filter(|e| visible_members.contains(e.target.as_str()))
            .cloned()
            .collect();

        let anchored: BTreeSet<&str> = edges.iter().map(|e| e.source.as_str()).collect();
        let nodes = self
            .nodes
            .iter()
            .filter(|n| anchored.contains(n.id.as_str()))
            .cloned()
            .collect();

        (nodes, edges)
    }
}

// =============================================================================
// TESTS
// =============================================================================
