//! JSON output.

use tempfile::TempDir;
use wikigraph::{GraphPayload, KnowledgeGraph};

use crate::test_utils::{fast_config, science_api};

#[test]
fn written_file_matches_payload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph-data.json");

    let mut graph = KnowledgeGraph::with_api(fast_config(&["Physics"]), science_api());
    graph.rebuild().unwrap();
    graph.write_json(&path).unwrap();

    let reloaded = GraphPayload::read_json(&path).unwrap();
    assert_eq!(&reloaded, graph.payload().unwrap());
}

#[test]
fn json_shape_uses_display_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph-data.json");

    let mut graph = KnowledgeGraph::with_api(fast_config(&["Mathematics"]), science_api());
    graph.rebuild().unwrap();
    graph.write_json(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let nodes = raw["nodes"].as_array().unwrap();
    assert_eq!(nodes[0]["id"], "Mathematics");
    assert_eq!(nodes[0]["isPrimary"], true);
    assert_eq!(nodes[0]["size"], 30);
    assert_eq!(nodes[1]["isPrimary"], false);
    assert_eq!(nodes[1]["size"], 10);
    assert_eq!(raw["links"][0]["value"], 1);
}

#[test]
fn write_before_build_gives_empty_graph() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");

    let graph = KnowledgeGraph::with_api(fast_config(&["Physics"]), science_api());
    graph.write_json(&path).unwrap();

    let reloaded = GraphPayload::read_json(&path).unwrap();
    assert_eq!(reloaded.node_count(), 0);
    assert_eq!(reloaded.edge_count(), 0);
}
