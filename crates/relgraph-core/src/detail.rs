//! # Member Detail
//!
//! Groups a selected member's relations by type for a detail panel.
//!
//! Works on the raw snapshot, not on a filtered graph: the panel shows every
//! relation on record, including ones whose counterpart is no longer in the
//! roster.

use crate::{Member, MemberRelation, RelationType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One relation as seen from the selected member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntry {
    pub relation: MemberRelation,
    pub counterpart_email: String,
    /// `None` when the counterpart is not in the member snapshot.
    pub counterpart: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    pub member: Member,
    pub relations: BTreeMap<RelationType, Vec<RelatedEntry>>,
    pub total_relations: usize,
}

impl MemberDetail {
    /// Build the detail view for `email`. Returns `None` for unknown members.
    #[must_use]
    pub fn for_member(
        email: &str,
        members: &[Member],
        relations: &[MemberRelation],
    ) -> Option<Self> {
        let member = members.iter().find(|m| m.email == email)?;

        let mut grouped: BTreeMap<RelationType, Vec<RelatedEntry>> = BTreeMap::new();
        for relation in relations {
            let Some(other) = relation.counterpart(email) else {
                continue;
            };
            grouped
                .entry(relation.relation_type)
                .or_default()
                .push(RelatedEntry {
                    relation: relation.clone(),
                    counterpart_email: other.to_string(),
                    counterpart: members.iter().find(|m| m.email == other).cloned(),
                });
        }

        let total_relations = grouped.values().map(Vec::len).sum();
        Some(Self {
            member: member.clone(),
            relations: grouped,
            total_relations,
        })
    }

    /// Entries of one relation type (empty if none).
    #[must_use]
    pub fn of_type(&self, relation_type: RelationType) -> &[RelatedEntry] {
        self.relations
            .get(&relation_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_relation_type() {
        let members = vec![
            Member::new("a", "Alice", "A"),
            Member::new("b", "Bob", "B"),
            Member::new("c", "Carol", "C"),
        ];
        let relations = vec![
            MemberRelation::new("1", "a", "b", RelationType::Sponsor),
            MemberRelation::new("2", "c", "a", RelationType::Team),
            MemberRelation::new("3", "a", "gone", RelationType::Team),
            MemberRelation::new("4", "b", "c", RelationType::Custom),
        ];

        let detail = MemberDetail::for_member("a", &members, &relations).expect("detail");

        assert_eq!(detail.total_relations, 3);
        assert_eq!(detail.of_type(RelationType::Sponsor).len(), 1);
        assert_eq!(detail.of_type(RelationType::Sponsor)[0].counterpart_email, "b");

        let team = detail.of_type(RelationType::Team);
        assert_eq!(team.len(), 2);
        assert_eq!(team[0].counterpart_email, "c");
        assert!(team[0].counterpart.is_some());
        assert!(team[1].counterpart.is_none());

        assert!(detail.of_type(RelationType::Custom).is_empty());
    }

    #[test]
    fn unknown_member_has_no_detail() {
        assert!(MemberDetail::for_member("nobody", &[], &[]).is_none());
    }
}
