//! Rebuild semantics.

use std::sync::Arc;

use wikigraph::{BuildError, KnowledgeGraph};
use wikigraph_fetch::ScriptedApi;

use crate::test_utils::{fast_config, science_api};

#[test]
fn no_payload_before_first_build() {
    let graph = KnowledgeGraph::with_api(fast_config(&["Physics"]), science_api());
    assert!(graph.payload().is_none());
    assert!(graph.last_report().is_none());
}

#[test]
fn rebuild_reports_stats() {
    let mut graph =
        KnowledgeGraph::with_api(fast_config(&["Physics", "Mathematics"]), science_api());
    let stats = graph.rebuild().unwrap();

    // Physics, Mathematics, Energy, Matter, Logic
    assert_eq!(stats.node_count, 5);
    assert_eq!(stats.primary_nodes, 2);
    // direct: 3 + 2, cross: Physics -> {Mathematics, Energy, Matter}, Mathematics -> {Physics, Logic}
    assert_eq!(stats.link_count, 10);
    assert_eq!(graph.payload().unwrap().stats(), stats);
}

#[test]
fn missing_seed_is_isolated_primary() {
    let mut graph = KnowledgeGraph::with_api(fast_config(&["Logic", "Physics"]), science_api());
    graph.rebuild().unwrap();

    let payload = graph.payload().unwrap();
    assert!(payload.node("Logic").unwrap().is_primary);
    assert_eq!(payload.outgoing("Logic").count(), 0);
    assert_eq!(graph.last_report().unwrap().fetch.not_found, 1);
}

#[test]
fn each_rebuild_fetches_again() {
    let api = Arc::new(science_api());
    let mut graph = KnowledgeGraph::with_api(fast_config(&["Physics"]), Arc::clone(&api));

    let first = graph.rebuild().unwrap();
    let second = graph.rebuild().unwrap();

    assert_eq!(first, second);
    // Two rounds per build, no cache shared between builds.
    assert_eq!(api.calls_for("Physics"), 4);
}

#[test]
fn invalid_config_keeps_previous_graph() {
    let mut graph = KnowledgeGraph::with_api(
        fast_config(&["Physics"]).concurrency(0),
        ScriptedApi::new(),
    );
    let err = graph.rebuild().unwrap_err();
    assert!(matches!(err, BuildError::Config(_)));
    assert!(graph.payload().is_none());
}
