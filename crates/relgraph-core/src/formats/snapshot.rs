//! # Snapshot
//!
//! One consistent set of inputs for a graph recomputation.

use super::envelope::parse_list;
use crate::patron::{Patron, PatronReferral};
use crate::{Member, MemberRelation, RelgraphError};
use serde::{Deserialize, Serialize};

/// Members, relations and the optional patron source, as fetched together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub relations: Vec<MemberRelation>,
    pub patrons: Vec<Patron>,
    pub patron_referrals: Vec<PatronReferral>,
}

impl Snapshot {
    /// Create a snapshot without patron data.
    #[must_use]
    pub fn new(members: Vec<Member>, relations: Vec<MemberRelation>) -> Self {
        Self {
            members,
            relations,
            ..Self::default()
        }
    }

    /// Builder-style patron source setter.
    #[must_use]
    pub fn with_patrons(mut self, patrons: Vec<Patron>, referrals: Vec<PatronReferral>) -> Self {
        self.patrons = patrons;
        self.patron_referrals = referrals;
        self
    }

    /// Parse a snapshot from raw member and relation envelopes.
    pub fn from_envelopes(members: &[u8], relations: &[u8]) -> Result<Self, RelgraphError> {
        Ok(Self::new(
            parse_list(members, "members")?,
            parse_list(relations, "relations")?,
        ))
    }

    /// Parse and attach raw patron and referral payloads.
    pub fn with_patron_payloads(
        self,
        patrons: &[u8],
        referrals: &[u8],
    ) -> Result<Self, RelgraphError> {
        Ok(self.with_patrons(
            parse_list(patrons, "patrons")?,
            parse_list(referrals, "patron referrals")?,
        ))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.relations.is_empty()
    }
}
