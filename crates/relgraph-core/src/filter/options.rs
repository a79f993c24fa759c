//! Facet option derivation for filter UIs.
//!
//! Options are always derived from the full, unfiltered node set so a UI
//! keeps offering every value regardless of the current selection.

use super::Facet;
use crate::graph::GraphNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct non-blank values of `facet` across `nodes`, lexically ordered.
#[must_use]
pub fn facet_options(nodes: &[GraphNode], facet: Facet) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| facet.value_of(&n.member))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Options for every facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetOptions {
    pub companies: Vec<String>,
    pub roles: Vec<String>,
    pub cjd_roles: Vec<String>,
    pub departments: Vec<String>,
    pub cities: Vec<String>,
    pub postal_codes: Vec<String>,
    pub sectors: Vec<String>,
}

impl FacetOptions {
    /// Derive all facet options from the full node set.
    #[must_use]
    pub fn from_nodes(nodes: &[GraphNode]) -> Self {
        Self {
            companies: facet_options(nodes, Facet::Company),
            roles: facet_options(nodes, Facet::Role),
            cjd_roles: facet_options(nodes, Facet::CjdRole),
            departments: facet_options(nodes, Facet::Department),
            cities: facet_options(nodes, Facet::City),
            postal_codes: facet_options(nodes, Facet::PostalCode),
            sectors: facet_options(nodes, Facet::Sector),
        }
    }

    /// Options of one facet.
    #[must_use]
    pub fn get(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Company => &self.companies,
            Facet::Role => &self.roles,
            Facet::CjdRole => &self.cjd_roles,
            Facet::Department => &self.departments,
            Facet::City => &self.cities,
            Facet::PostalCode => &self.postal_codes,
            Facet::Sector => &self.sectors,
        }
    }
}
