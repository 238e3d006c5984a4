//! Build pipeline integration tests
//!
//! These tests drive a full build over a scripted endpoint:
//! - Pagination and per-seed limits through the build
//! - Graceful degradation of failing seeds
//! - At-most-once fetching under concurrency
//! - Request spacing through the shared limiter
//! - Output written to disk and read back

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wikigraph_core::{BuildConfig, EndpointPolicy, GraphPayload, PageTitle};
use wikigraph_engine::{AdjacencyIndex, BuildSession};
use wikigraph_fetch::ScriptedApi;

fn config(seeds: &[&str]) -> BuildConfig {
    BuildConfig::new()
        .seeds(seeds.iter().copied())
        .delays(Duration::ZERO, Duration::ZERO)
}

fn titles(seeds: &[&str]) -> Vec<PageTitle> {
    seeds.iter().map(|s| s.to_string()).collect()
}

/// Test: paginated seeds are followed and truncated to the per-seed limit
#[test]
fn test_pagination_and_limit_through_build() {
    let api = Arc::new(
        ScriptedApi::new()
            .batches("A", &[&["B", "C"], &["D", "E"], &["F"]])
            .batches("G", &[&["H", "I"], &["J"]]),
    );
    let session = BuildSession::new(
        config(&["A", "G"]).page_size(2).links_per_seed(3),
        Arc::clone(&api),
    )
    .unwrap();

    let report = session.run().unwrap();

    // A stops after two rounds (4 links >= 3), G after two (exhausted).
    assert_eq!(api.calls_for("A"), 2);
    assert_eq!(api.calls_for("G"), 2);
    let a_targets: Vec<&str> = report
        .payload
        .outgoing("A")
        .map(|e| e.target.as_str())
        .collect();
    // Direct edges B, C, D then the cross-link pass repeats them.
    assert_eq!(a_targets, vec!["B", "C", "D", "B", "C", "D"]);
    assert!(report.payload.node("E").is_none());
    assert_eq!(report.stats.node_count, 8);
}

/// Test: one failing seed never affects another
#[test]
fn test_failing_seed_is_isolated() {
    let api = ScriptedApi::new()
        .failing_at("X", &[&["P"], &["Q"]], 1, "connection reset")
        .page("Y", &["Z"]);
    let session = BuildSession::new(config(&["X", "Y"]).page_size(1), api).unwrap();

    let report = session.run().unwrap();

    assert!(report.payload.node("X").unwrap().is_primary);
    assert_eq!(report.payload.outgoing("X").count(), 0);
    // Links from X's first round are discarded with the failure.
    assert!(report.payload.node("P").is_none());
    assert_eq!(report.payload.outgoing("Y").count(), 2);
    assert_eq!(report.fetch.failed, 1);
    assert_eq!(report.failures.len(), 1);
}

/// Test: every seed failing still yields a valid graph of isolated primaries
#[test]
fn test_all_seeds_failing() {
    let api = ScriptedApi::new()
        .failing("A", "timeout")
        .missing("B");
    let report = BuildSession::new(config(&["A", "B", "C"]), api)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.stats.node_count, 3);
    assert_eq!(report.stats.primary_nodes, 3);
    assert_eq!(report.stats.link_count, 0);
    // C has no script, so the endpoint reports it missing too.
    assert_eq!(report.fetch.not_found, 2);
    assert_eq!(report.fetch.failed, 1);
}

/// Test: concurrent workers fetch each distinct seed exactly once
#[test]
fn test_concurrent_build_fetches_each_seed_once() {
    let api = Arc::new(
        ScriptedApi::new()
            .page("A", &["B", "C"])
            .page("B", &["C"])
            .page("C", &["A"])
            .page("D", &["A", "E"])
            .with_latency(Duration::from_millis(5)),
    );
    let session = BuildSession::new(
        config(&["A", "B", "C", "D"]).concurrency(4),
        Arc::clone(&api),
    )
    .unwrap();

    let seeds = titles(&["A", "B", "A", "C", "D", "B"]);
    let report = session.build(&seeds, 10).unwrap();

    for seed in ["A", "B", "C", "D"] {
        assert_eq!(api.calls_for(seed), 1, "seed {} fetched more than once", seed);
    }
    assert_eq!(report.fetch.seeds, 4);
    let ids: Vec<&str> = report.payload.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D", "E"]);
}

/// Test: requests are spaced by the configured delays
#[test]
fn test_requests_respect_rate_limit() {
    let api = ScriptedApi::new()
        .batches("A", &[&["B"], &["C"]])
        .page("D", &["E"]);
    let cfg = config(&["A", "D"])
        .page_size(1)
        .delays(Duration::from_millis(20), Duration::from_millis(40));
    let report = BuildSession::new(cfg, api).unwrap().run().unwrap();

    // A first (no wait), A continuation (20ms), D first page (40ms).
    assert!(report.elapsed >= Duration::from_millis(60));
    assert_eq!(report.stats.link_count, 6);
}

/// Test: drop_unknown and auto_create agree on a normal build
#[test]
fn test_endpoint_policies_agree_on_seed_keyed_builds() {
    let make_api = || ScriptedApi::new().page("A", &["B", "A"]).page("B", &["C"]);
    let auto = BuildSession::new(config(&["A", "B"]), make_api())
        .unwrap()
        .run()
        .unwrap();
    let strict = BuildSession::new(
        config(&["A", "B"]).endpoint_policy(EndpointPolicy::DropUnknown),
        make_api(),
    )
    .unwrap()
    .run()
    .unwrap();
    assert_eq!(auto.payload, strict.payload);
}

/// Test: build → write graph-data.json → read back → indexable
#[test]
fn test_write_and_reload_payload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("graph-data.json");

    let api = ScriptedApi::new().page("A", &["B", "C"]).page("B", &["C"]);
    let report = BuildSession::new(config(&["A", "B"]), api)
        .unwrap()
        .run()
        .unwrap();
    report.payload.write_json(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["nodes"][0]["id"], "A");
    assert_eq!(raw["nodes"][0]["isPrimary"], true);
    assert_eq!(raw["links"][0]["source"], "A");

    let reloaded = GraphPayload::read_json(&path).unwrap();
    assert_eq!(reloaded, report.payload);

    let index = AdjacencyIndex::from_payload(&reloaded);
    assert_eq!(index.in_degree("C"), 4);
    assert!(index.isolated().is_empty());
}
