//! In-memory adjacency index over a finished payload.
//!
//! The payload stores edges as a flat list; this index answers neighbor and
//! degree queries in O(1) per node. Parallel duplicate edges are kept, so
//! degrees count every recorded edge.

use std::collections::{HashMap, HashSet};

use wikigraph_core::{GraphPayload, PageTitle};

/// Adjacency lists keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    /// Forward adjacency: source → [target]
    pub outgoing: HashMap<PageTitle, Vec<PageTitle>>,
    /// Reverse adjacency: target → [source]
    pub incoming: HashMap<PageTitle, Vec<PageTitle>>,
    /// Set of all node ids.
    pub nodes: HashSet<PageTitle>,
}

impl AdjacencyIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every node and edge of `payload`.
    pub fn from_payload(payload: &GraphPayload) -> Self {
        let mut idx = Self::new();
        for node in &payload.nodes {
            idx.add_node(&node.id);
        }
        for edge in &payload.links {
            idx.add_edge(&edge.source, &edge.target);
        }
        idx
    }

    /// Add a node.
    pub fn add_node(&mut self, node_id: &str) {
        self.nodes.insert(node_id.to_string());
    }

    /// Add an edge. Duplicates are appended, not merged.
    pub fn add_edge(&mut self, src: &str, dst: &str) {
        self.outgoing
            .entry(src.to_string())
            .or_default()
            .push(dst.to_string());
        self.incoming
            .entry(dst.to_string())
            .or_default()
            .push(src.to_string());
    }

    /// Targets linked from `node_id`, in edge order.
    pub fn outgoing_neighbors(&self, node_id: &str) -> &[PageTitle] {
        self.outgoing.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sources linking to `node_id`, in edge order.
    pub fn incoming_neighbors(&self, node_id: &str) -> &[PageTitle] {
        self.incoming.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edges leaving `node_id`.
    pub fn out_degree(&self, node_id: &str) -> usize {
        self.outgoing_neighbors(node_id).len()
    }

    /// Number of edges arriving at `node_id`.
    pub fn in_degree(&self, node_id: &str) -> usize {
        self.incoming_neighbors(node_id).len()
    }

    /// Nodes with no edges in either direction.
    pub fn isolated(&self) -> Vec<&PageTitle> {
        let mut out: Vec<&PageTitle> = self
            .nodes
            .iter()
            .filter(|n| self.out_degree(n) == 0 && self.in_degree(n) == 0)
            .collect();
        out.sort();
        out
    }

    /// The `n` nodes with the most incoming edges, most linked first.
    ///
    /// Ties are broken by id so the result is deterministic.
    pub fn most_linked(&self, n: usize) -> Vec<(&PageTitle, usize)> {
        let mut ranked: Vec<(&PageTitle, usize)> = self
            .nodes
            .iter()
            .map(|id| (id, self.in_degree(id)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}
