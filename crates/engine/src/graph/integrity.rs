//! Structural checks on an assembled payload.
//!
//! Assembly is a pure transformation over already-validated link data, so
//! any violation found here is a defect in the assembler, reported as
//! [`BuildError::Assembly`] and fatal to the build.

use std::collections::HashSet;

use wikigraph_core::{BuildError, BuildResult, GraphPayload, PageTitle};

/// Verify that `payload` is a consistent graph for `seeds`:
/// - node ids are unique
/// - every edge endpoint is a node
/// - every seed is a primary node, and only seeds are primary
pub fn check_integrity(payload: &GraphPayload, seeds: &[PageTitle]) -> BuildResult<()> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(payload.nodes.len());
    for node in &payload.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(BuildError::assembly(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
    }

    for (i, edge) in payload.links.iter().enumerate() {
        for endpoint in [&edge.source, &edge.target] {
            if !ids.contains(endpoint.as_str()) {
                return Err(BuildError::assembly(format!(
                    "edge {} ({} -> {}) references unknown node '{}'",
                    i, edge.source, edge.target, endpoint
                )));
            }
        }
    }

    let seed_set: HashSet<&str> = seeds.iter().map(String::as_str).collect();
    for node in &payload.nodes {
        let is_seed = seed_set.contains(node.id.as_str());
        if node.is_primary != is_seed {
            return Err(BuildError::assembly(format!(
                "node '{}' has isPrimary={} but seed membership is {}",
                node.id, node.is_primary, is_seed
            )));
        }
    }
    for seed in &seed_set {
        if !ids.contains(seed) {
            return Err(BuildError::assembly(format!("seed '{}' has no node", seed)));
        }
    }

    Ok(())
}
