//! # Filter Module
//!
//! Filter state, filter operations and the visible-subgraph pipeline.
//!
//! Filter state is a value: every mutator returns a new [`FilterState`] and
//! leaves the receiver untouched, so a host can read the current state,
//! derive the next one and publish it as a single replacement.
//!
//! The state is independent of the member snapshot. It is never reset when
//! the underlying data refreshes.

mod engine;
mod options;

pub use engine::{FilterEngine, FilteredGraph};
pub use options::{FacetOptions, facet_options};

use crate::primitives::{MAX_ENGAGEMENT_SCORE, MAX_FACET_VALUES, MAX_SEARCH_QUERY_LENGTH};
use crate::{Member, MemberStatus, RelationType, RelgraphError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// FILTER ENUMS
// =============================================================================

/// Status restriction applied to member nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Returns true if a member with `status` passes this filter.
    #[must_use]
    pub fn admits(self, status: MemberStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == MemberStatus::Active,
            Self::Inactive => status == MemberStatus::Inactive,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = RelgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(RelgraphError::InvalidFilter(format!(
                "unknown member status '{}' (expected all, active or inactive)",
                other
            ))),
        }
    }
}

/// Graph view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// The whole (filtered) network.
    #[default]
    Network,
    /// A single member and its direct neighbors.
    EgoNetwork,
}

/// A set-membership facet over one member attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    Company,
    Role,
    CjdRole,
    Department,
    City,
    PostalCode,
    Sector,
}

impl Facet {
    /// Every facet, in display order.
    pub const ALL: [Facet; 7] = [
        Self::Company,
        Self::Role,
        Self::CjdRole,
        Self::Department,
        Self::City,
        Self::PostalCode,
        Self::Sector,
    ];

    /// Wire name of the facet.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Role => "role",
            Self::CjdRole => "cjdRole",
            Self::Department => "department",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Sector => "sector",
        }
    }

    /// The member's value for this facet, trimmed; `None` when absent or blank.
    #[must_use]
    pub fn value_of(self, member: &Member) -> Option<&str> {
        let raw = match self {
            Self::Company => member.company.as_deref(),
            Self::Role => member.role.as_deref(),
            Self::CjdRole => member.cjd_role.as_deref(),
            Self::Department => member.department.as_deref(),
            Self::City => member.city.as_deref(),
            Self::PostalCode => member.postal_code.as_deref(),
            Self::Sector => member.sector.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the wire name as well as snake_case and kebab-case spellings.
impl FromStr for Facet {
    type Err = RelgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| RelgraphError::InvalidFilter(format!("unknown facet '{}'", s.trim())))
    }
}

// =============================================================================
// FILTER STATE
// =============================================================================

/// The complete, independently togglable filter state.
///
/// Empty facet sets mean "no restriction from this facet", not "match
/// nothing". The default state is an identity transform on any graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub relation_types: BTreeSet<RelationType>,
    pub member_status: StatusFilter,
    /// Inclusive lower bound on the engagement score.
    pub min_engagement_score: u8,
    /// Case-insensitive substring matched against full name or email.
    pub search_query: String,
    pub view_mode: ViewMode,
    pub ego_network_center: Option<String>,
    #[serde(deserialize_with = "facet_set")]
    pub companies: BTreeSet<String>,
    #[serde(deserialize_with = "facet_set")]
    pub roles: BTreeSet<String>,
    #[serde(deserialize_with = "facet_set")]
    pub cjd_roles: BTreeSet<String>,
    #[serde(deserialize_with = "facet_set")]
    pub departments: BTreeSet<String>,
    #[serde(deserialize_with = "facet_set")]
    pub cities: BTreeSet<String>,
    #[serde(deserialize_with = "facet_set")]
    pub postal_codes: BTreeSet<String>,
    #[serde(deserialize_with = "facet_set")]
    pub sectors: BTreeSet<String>,
    /// Merge the patron referral overlay into the visible graph.
    pub show_patrons: bool,
}

/// Facet sets read from the wire get the same normalization as
/// [`FilterState::with_facet_value`]: values trimmed, blanks dropped.
fn facet_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect())
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            relation_types: RelationType::ALL.into_iter().collect(),
            member_status: StatusFilter::All,
            min_engagement_score: 0,
            search_query: String::new(),
            view_mode: ViewMode::Network,
            ego_network_center: None,
            companies: BTreeSet::new(),
            roles: BTreeSet::new(),
            cjd_roles: BTreeSet::new(),
            departments: BTreeSet::new(),
            cities: BTreeSet::new(),
            postal_codes: BTreeSet::new(),
            sectors: BTreeSet::new(),
            show_patrons: false,
        }
    }
}

impl FilterState {
    /// Create the default (identity) filter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected values of a facet.
    #[must_use]
    pub fn facet_values(&self, facet: Facet) -> &BTreeSet<String> {
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

    fn facet_values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Company => &mut self.companies,
            Facet::Role => &mut self.roles,
            Facet::CjdRole => &mut self.cjd_roles,
            Facet::Department => &mut self.departments,
            Facet::City => &mut self.cities,
            Facet::PostalCode => &mut self.postal_codes,
            Facet::Sector => &mut self.sectors,
        }
    }

    /// The ego-network center, if the ego view is active.
    #[must_use]
    pub fn active_ego_center(&self) -> Option<&str> {
        match self.view_mode {
            ViewMode::EgoNetwork => self.ego_network_center.as_deref(),
            ViewMode::Network => None,
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Number of filters deviating from their default.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        let defaults = Self::default();
        let scalar = [
            self.relation_types != defaults.relation_types,
            self.member_status != StatusFilter::All,
            self.min_engagement_score > 0,
            !self.search_query.is_empty(),
            self.active_ego_center().is_some(),
            self.show_patrons,
        ];
        let facets = Facet::ALL
            .iter()
            .filter(|f| !self.facet_values(**f).is_empty())
            .count();
        scalar.iter().filter(|b| **b).count() + facets
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Enable or disable display of one relation type.
    #[must_use]
    pub fn with_relation_type(&self, relation_type: RelationType, enabled: bool) -> Self {
        let mut next = self.clone();
        if enabled {
            next.relation_types.insert(relation_type);
        } else {
            next.relation_types.remove(&relation_type);
        }
        next
    }

    /// Add or remove a value from a facet set. Blank values are ignored.
    #[must_use]
    pub fn with_facet_value(&self, facet: Facet, value: &str, enabled: bool) -> Self {
        let mut next = self.clone();
        let value = value.trim();
        if value.is_empty() {
            return next;
        }
        let set = next.facet_values_mut(facet);
        if enabled {
            set.insert(value.to_string());
        } else {
            set.remove(value);
        }
        next
    }

    #[must_use]
    pub fn with_company(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::Company, value, enabled)
    }

    #[must_use]
    pub fn with_role(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::Role, value, enabled)
    }

    #[must_use]
    pub fn with_cjd_role(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::CjdRole, value, enabled)
    }

    #[must_use]
    pub fn with_department(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::Department, value, enabled)
    }

    #[must_use]
    pub fn with_city(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::City, value, enabled)
    }

    #[must_use]
    pub fn with_postal_code(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::PostalCode, value, enabled)
    }

    #[must_use]
    pub fn with_sector(&self, value: &str, enabled: bool) -> Self {
        self.with_facet_value(Facet::Sector, value, enabled)
    }

    #[must_use]
    pub fn with_search_query(&self, query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..self.clone()
        }
    }

    /// Set the engagement lower bound, clamped to `0..=100`.
    #[must_use]
    pub fn with_min_engagement_score(&self, score: u8) -> Self {
        Self {
            min_engagement_score: score.min(MAX_ENGAGEMENT_SCORE),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_member_status(&self, status: StatusFilter) -> Self {
        Self {
            member_status: status,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_show_patrons(&self, enabled: bool) -> Self {
        Self {
            show_patrons: enabled,
            ..self.clone()
        }
    }

    /// Switch to the ego view centered on `center`; other filters are kept.
    #[must_use]
    pub fn with_ego_network(&self, center: impl Into<String>) -> Self {
        Self {
            view_mode: ViewMode::EgoNetwork,
            ego_network_center: Some(center.into()),
            ..self.clone()
        }
    }

    /// Back to the full network view. Clears only the view mode and center.
    #[must_use]
    pub fn with_network_mode(&self) -> Self {
        Self {
            view_mode: ViewMode::Network,
            ego_network_center: None,
            ..self.clone()
        }
    }

    /// Restore every field to its default.
    #[must_use]
    pub fn reset_all(&self) -> Self {
        Self::default()
    }

    /// Apply a serialized filter operation.
    #[must_use]
    pub fn apply_op(&self, op: &FilterOp) -> Self {
        match op {
            FilterOp::RelationType {
                relation_type,
                enabled,
            } => self.with_relation_type(*relation_type, *enabled),
            FilterOp::Facet {
                facet,
                value,
                enabled,
            } => self.with_facet_value(*facet, value, *enabled),
            FilterOp::Search { query } => self.with_search_query(query.clone()),
            FilterOp::MinEngagementScore { score } => self.with_min_engagement_score(*score),
            FilterOp::MemberStatus { status } => self.with_member_status(*status),
            FilterOp::ShowPatrons { enabled } => self.with_show_patrons(*enabled),
            FilterOp::EgoNetwork { center } => self.with_ego_network(center.clone()),
            FilterOp::NetworkMode => self.with_network_mode(),
            FilterOp::ResetAll => self.reset_all(),
        }
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Validate a filter state received from outside the process.
    ///
    /// The engine itself accepts any state; this guards the API boundary.
    pub fn validate(&self) -> Result<(), RelgraphError> {
        if self.min_engagement_score > MAX_ENGAGEMENT_SCORE {
            return Err(RelgraphError::InvalidFilter(format!(
                "minEngagementScore {} exceeds {}",
                self.min_engagement_score, MAX_ENGAGEMENT_SCORE
            )));
        }

        if self.search_query.len() > MAX_SEARCH_QUERY_LENGTH {
            return Err(RelgraphError::InvalidFilter(format!(
                "searchQuery length {} exceeds maximum {} bytes",
                self.search_query.len(),
                MAX_SEARCH_QUERY_LENGTH
            )));
        }

        for facet in Facet::ALL {
            let values = self.facet_values(facet);
            if values.len() > MAX_FACET_VALUES {
                return Err(RelgraphError::InvalidFilter(format!(
                    "facet '{}' has {} values, maximum is {}",
                    facet,
                    values.len(),
                    MAX_FACET_VALUES
                )));
            }
            // A blank entry would make the facet exclude every member.
            if let Some(bad) = values.iter().find(|v| v.is_empty() || v.trim() != v.as_str()) {
                return Err(RelgraphError::InvalidFilter(format!(
                    "facet '{}' value '{}' is blank or padded",
                    facet, bad
                )));
            }
        }

        if self.view_mode == ViewMode::EgoNetwork
            && self
                .ego_network_center
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
        {
            return Err(RelgraphError::InvalidFilter(
                "ego-network view requires egoNetworkCenter".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// FILTER OPERATIONS
// =============================================================================

/// A single filter mutation, as sent by a client (tagged union).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FilterOp {
    RelationType {
        relation_type: RelationType,
        enabled: bool,
    },
    Facet {
        facet: Facet,
        value: String,
        enabled: bool,
    },
    Search {
        query: String,
    },
    MinEngagementScore {
        score: u8,
    },
    MemberStatus {
        status: StatusFilter,
    },
    ShowPatrons {
        enabled: bool,
    },
    EgoNetwork {
        center: String,
    },
    NetworkMode,
    ResetAll,
}

// =============================================================================
// TESTS
// =============================================================================
