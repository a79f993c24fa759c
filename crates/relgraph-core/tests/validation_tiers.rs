//! # Validation Tier Tests (T0-T4)
//!
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - T0: Snapshot Integrity
//! - T1: Deterministic Graph Building
//! - T2: Filter Pipeline
//! - T3: Ego Network Ordering
//! - T4: Overlay & Session

use relgraph_core::{
    FilterEngine, FilterOp, FilterState, GraphBuilder, Member, MemberGraph, MemberRelation,
    MemberStatus, RelationType, RelgraphError, Snapshot, StatusFilter,
};

/// `M = [a(active,80), b(active,10), c(inactive,50)]`,
/// `R = [(a,b,sponsor), (b,c,team)]`.
fn pinned_members() -> Vec<Member> {
    vec![
        Member::new("a", "Alice", "Martin").with_engagement_score(80),
        Member::new("b", "Bruno", "Petit").with_engagement_score(10),
        Member::new("c", "Chloe", "Durand")
            .with_status(MemberStatus::Inactive)
            .with_engagement_score(50),
    ]
}

fn pinned_relations() -> Vec<MemberRelation> {
    vec![
        MemberRelation::new("r1", "a", "b", RelationType::Sponsor),
        MemberRelation::new("r2", "b", "c", RelationType::Team),
    ]
}

fn pinned_graph() -> MemberGraph {
    GraphBuilder::build(&pinned_members(), &pinned_relations())
}

fn node_ids(nodes: &[relgraph_core::GraphNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

// =============================================================================
// TIER T0: SNAPSHOT INTEGRITY
// =============================================================================

mod t0_snapshot_integrity {
    use super::*;

    /// T0.1: Repository envelopes parse into a snapshot.
    #[test]
    fn envelope_snapshot_parses() {
        let members = br#"{"success":true,"data":[
            {"email":"a@cjd.fr","firstName":"Alice","lastName":"Martin",
             "status":"active","engagementScore":80,"city":"Lyon"}
        ]}"#;
        let relations = br#"{"success":true,"data":[]}"#;

        let snapshot = Snapshot::from_envelopes(members, relations).expect("parse");

        assert_eq!(snapshot.members.len(), 1);
        assert_eq!(snapshot.members[0].city.as_deref(), Some("Lyon"));
    }

    /// T0.2: A failed repository response is an upstream error.
    #[test]
    fn unsuccessful_envelope_rejected() {
        let result = Snapshot::from_envelopes(br#"{"success":false}"#, b"[]");
        assert!(matches!(result, Err(RelgraphError::Upstream(_))));
    }

    /// T0.3: Unknown relation types are rejected at parse time.
    #[test]
    fn unknown_relation_type_rejected() {
        let relations = br#"[{"id":"1","memberEmail":"a","relatedMemberEmail":"b",
            "relationType":"cousin","createdAt":"2024-03-01T10:00:00Z"}]"#;

        let result = Snapshot::from_envelopes(b"[]", relations);
        assert!(matches!(result, Err(RelgraphError::DeserializationError(_))));
    }
}

// =============================================================================
// TIER T1: DETERMINISTIC GRAPH BUILDING
// =============================================================================

mod t1_graph_building {
    use super::*;

    /// T1.1: Full network of the pinned scenario.
    #[test]
    fn pinned_full_network() {
        let graph = pinned_graph();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges[0].id, "a-b");
        assert_eq!(graph.edges[1].id, "b-c");
    }

    /// T1.2: Same input produces the same graph.
    #[test]
    fn build_is_deterministic() {
        assert_eq!(pinned_graph(), pinned_graph());
    }

    /// T1.3: Connection counts cover every relation touching a member.
    #[test]
    fn connection_counts() {
        let graph = pinned_graph();

        let counts: Vec<usize> = graph.nodes.iter().map(|n| n.connection_count).collect();
        assert_eq!(counts, vec![1, 2, 1]);

        let b = graph.node("b").expect("b");
        assert!(b.relation_types.contains(&RelationType::Sponsor));
        assert!(b.relation_types.contains(&RelationType::Team));
    }

    /// T1.4: Dangling relations never become edges.
    #[test]
    fn dangling_relation_dropped() {
        let mut relations = pinned_relations();
        relations.push(MemberRelation::new("r3", "a", "ghost", RelationType::Custom));

        let graph = GraphBuilder::build(&pinned_members(), &relations);

        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edges.iter().all(|e| e.label != RelationType::Custom));
    }

    /// T1.5: Visual encoding follows score, status and relation type.
    #[test]
    fn visual_encoding() {
        let graph = pinned_graph();

        let a = graph.node("a").expect("a");
        let c = graph.node("c").expect("c");
        assert_eq!(a.size, 13);
        assert_eq!(a.color, MemberStatus::Active.color());
        assert_eq!(c.color, MemberStatus::Inactive.color());
        assert_eq!(graph.edges[0].size, 2);
        assert_eq!(graph.edges[1].size, 1);
    }
}

// =============================================================================
// TIER T2: FILTER PIPELINE
// =============================================================================

mod t2_filter_pipeline {
    use super::*;

    /// T2.1: Default filters are an identity transform.
    #[test]
    fn default_is_identity() {
        let graph = pinned_graph();

        let visible = FilterEngine::apply(&graph, &FilterState::default());

        assert_eq!(visible.nodes, graph.nodes);
        assert_eq!(visible.edges, graph.edges);
    }

    /// T2.2: Status filter drops `c` and the edge that touches it.
    #[test]
    fn active_status_scenario() {
        let filters = FilterState::default().with_member_status(StatusFilter::Active);

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(node_ids(&visible.nodes), vec!["a", "b"]);
        assert_eq!(visible.edges.len(), 1);
        assert_eq!(visible.edges[0].id, "a-b");
    }

    /// T2.3: Disabled relation types hide edges, not nodes.
    #[test]
    fn relation_toggle_hides_edges_only() {
        let filters = FilterState::default().with_relation_type(RelationType::Sponsor, false);

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(visible.nodes.len(), 3);
        assert_eq!(visible.edges.len(), 1);
        assert_eq!(visible.edges[0].label, RelationType::Team);
    }

    /// T2.4: Search matches name or email, case-insensitively.
    #[test]
    fn search_by_name() {
        let filters = FilterState::default().with_search_query("DURAND");

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(node_ids(&visible.nodes), vec!["c"]);
        assert!(visible.edges.is_empty());
    }

    /// T2.5: Engagement floor is inclusive.
    #[test]
    fn engagement_floor_inclusive() {
        let filters = FilterState::default().with_min_engagement_score(50);

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(node_ids(&visible.nodes), vec!["a", "c"]);
        assert!(visible.edges.is_empty());
    }

    /// T2.6: Facet toggled on then off restores the previous view.
    #[test]
    fn facet_round_trip() {
        let graph = pinned_graph();
        let before = FilterState::default();
        let after = before.with_company("ACME", true).with_company("ACME", false);

        assert_eq!(FilterEngine::apply(&graph, &before), FilterEngine::apply(&graph, &after));
    }

    /// T2.7: Members without a facet value fail a non-empty facet.
    #[test]
    fn missing_facet_value_excluded() {
        let mut members = pinned_members();
        members[0].sector = Some("Industrie".to_string());
        let graph = GraphBuilder::build(&members, &pinned_relations());

        let visible =
            FilterEngine::apply(&graph, &FilterState::default().with_sector("Industrie", true));

        assert_eq!(node_ids(&visible.nodes), vec!["a"]);
    }
}

// =============================================================================
// TIER T3: EGO NETWORK ORDERING
// =============================================================================

mod t3_ego_network {
    use super::*;

    /// T3.1: Ego view on `b` keeps `b` and both neighbors.
    #[test]
    fn ego_on_b() {
        let filters = FilterState::default().with_ego_network("b");

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(node_ids(&visible.nodes), vec!["a", "b", "c"]);
        assert_eq!(visible.edges.len(), 2);
    }

    /// T3.2: Status filter runs before the ego intersection.
    #[test]
    fn ego_on_b_with_active_status() {
        let filters = FilterState::default()
            .with_ego_network("b")
            .with_member_status(StatusFilter::Active);

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(node_ids(&visible.nodes), vec!["a", "b"]);
        assert_eq!(visible.edges.len(), 1);
        assert_eq!(visible.edges[0].id, "a-b");
    }

    /// T3.3: Neighbors come from the unfiltered edge list.
    #[test]
    fn ego_ignores_relation_toggles_for_membership() {
        let filters = FilterState::default()
            .with_ego_network("b")
            .with_relation_type(RelationType::Team, false);

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(visible.nodes.len(), 3);
        assert_eq!(visible.edges.len(), 1);
    }

    /// T3.4: The center is not exempt from node filters.
    #[test]
    fn center_not_exempt() {
        let filters = FilterState::default()
            .with_ego_network("c")
            .with_member_status(StatusFilter::Active);

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(node_ids(&visible.nodes), vec!["b"]);
        assert!(visible.edges.is_empty());
    }

    /// T3.5: Returning to network mode lifts the restriction.
    #[test]
    fn network_mode_restores_full_view() {
        let filters = FilterState::default().with_ego_network("a").with_network_mode();

        let visible = FilterEngine::apply(&pinned_graph(), &filters);

        assert_eq!(visible.nodes.len(), 3);
    }
}

// =============================================================================
// TIER T4: OVERLAY & SESSION
// =============================================================================

mod t4_overlay_and_session {
    use super::*;
    use relgraph_core::{GraphSession, Patron, PatronReferral, RenderGraph};

    fn snapshot_with_patrons() -> Snapshot {
        Snapshot::new(pinned_members(), pinned_relations()).with_patrons(
            vec![Patron {
                id: "p1".to_string(),
                first_name: "Paul".to_string(),
                last_name: "Mecene".to_string(),
                company: Some("Fondation".to_string()),
            }],
            vec![PatronReferral {
                id: "pr1".to_string(),
                patron_id: "p1".to_string(),
                member_email: "c".to_string(),
                created_at: None,
            }],
        )
    }

    /// T4.1: Patrons are hidden until requested.
    #[test]
    fn patrons_hidden_by_default() {
        let session = GraphSession::new(snapshot_with_patrons(), FilterState::default());

        let visible = session.visible();

        assert!(visible.patron_nodes.is_empty());
        assert!(visible.patron_edges.is_empty());
    }

    /// T4.2: A patron follows the visibility of the member it referred.
    #[test]
    fn patron_follows_referred_member() {
        let mut session = GraphSession::new(snapshot_with_patrons(), FilterState::default());
        session
            .apply_op(&FilterOp::ShowPatrons { enabled: true })
            .expect("valid");

        let render = RenderGraph::from_filtered(&session.visible());
        assert_eq!(render.nodes.len(), 4);
        assert_eq!(render.links.len(), 3);

        session
            .apply_op(&FilterOp::MemberStatus {
                status: StatusFilter::Active,
            })
            .expect("valid");

        let visible = session.visible();
        assert_eq!(visible.nodes.len(), 2);
        assert!(visible.patron_nodes.is_empty());
    }

    /// T4.3: Filters survive a snapshot refresh.
    #[test]
    fn filters_survive_refresh() {
        let mut session = GraphSession::new(snapshot_with_patrons(), FilterState::default());
        session
            .update_filters(|f| f.with_ego_network("a"))
            .expect("valid");

        session.refresh(Snapshot::new(pinned_members(), Vec::new()));

        assert_eq!(session.filters().active_ego_center(), Some("a"));
        assert_eq!(node_ids(&session.visible().nodes), vec!["a"]);
    }

    /// T4.4: Reset restores the identity view.
    #[test]
    fn reset_all() {
        let mut session = GraphSession::new(snapshot_with_patrons(), FilterState::default());
        session
            .update_filters(|f| f.with_min_engagement_score(90).with_show_patrons(true))
            .expect("valid");
        assert!(session.visible().nodes.is_empty());

        session.apply_op(&FilterOp::ResetAll).expect("valid");

        assert!(session.filters().is_default());
        assert_eq!(session.visible().nodes.len(), 3);
    }
}
