//! Graph assembly.
//!
//! Turns a [`LinkMapping`] and the seed list into a [`GraphPayload`]:
//! 1. a primary node per seed
//! 2. per queried page, a secondary node per unseen target and a direct edge
//! 3. a cross-link pass over every ordered pair of known nodes
//!
//! Edges are never deduplicated. Every direct edge between two known nodes
//! is found again by the cross-link pass, so the edge list routinely holds
//! parallel duplicates; consumers must tolerate them. Self-loops survive
//! step 2 but the cross-link pass only looks at distinct pairs.

pub mod adjacency;
pub mod integrity;

use std::collections::HashMap;

use tracing::debug;

use wikigraph_core::{
    EndpointPolicy, GraphEdge, GraphNode, GraphPayload, LinkMapping, PageTitle,
};

/// Incremental builder of one graph payload.
///
/// Nodes are unique by id and kept in creation order. What happens to an
/// edge whose endpoint is not a node yet depends on the [`EndpointPolicy`].
#[derive(Debug, Default)]
pub struct GraphAssembler {
    policy: EndpointPolicy,
    nodes: Vec<GraphNode>,
    positions: HashMap<PageTitle, usize>,
    links: Vec<GraphEdge>,
    dropped: usize,
}

impl GraphAssembler {
    /// Create an empty assembler.
    pub fn new(policy: EndpointPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Add a node unless one with this id exists. Returns true if created.
    pub fn add_node(&mut self, title: &str, is_primary: bool) -> bool {
        if self.positions.contains_key(title) {
            return false;
        }
        let node = if is_primary {
            GraphNode::primary(title)
        } else {
            GraphNode::secondary(title)
        };
        self.positions.insert(title.to_string(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Whether a node with this id exists.
    pub fn has_node(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    /// Record `source → target`. Returns false if the edge was dropped.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        match self.policy {
            EndpointPolicy::AutoCreate => {
                self.add_node(source, false);
                self.add_node(target, false);
            }
            EndpointPolicy::DropUnknown => {
                if !self.has_node(source) || !self.has_node(target) {
                    self.dropped += 1;
                    return false;
                }
            }
        }
        self.links.push(GraphEdge::new(source, target));
        true
    }

    /// Edges refused under [`EndpointPolicy::DropUnknown`].
    pub fn dropped_edges(&self) -> usize {
        self.dropped
    }

    /// Run the full assembly over `mapping` and `seeds`.
    pub fn assemble(mut self, mapping: &LinkMapping, seeds: &[PageTitle]) -> GraphPayload {
        for seed in seeds {
            self.add_node(seed, true);
        }

        for (source, links) in mapping.iter() {
            for target in links {
                self.add_node(target, false);
                self.add_edge(source, target);
            }
        }
        let direct = self.links.len();

        self.cross_link_pass(mapping);
        debug!(
            target: "wikigraph::build",
            nodes = self.nodes.len(),
            direct_edges = direct,
            cross_edges = self.links.len() - direct,
            dropped = self.dropped,
            "Assembled graph"
        );

        self.finish()
    }

    /// Record `(a, b)` for every ordered pair of distinct known nodes where
    /// `a` was queried and links to `b`.
    ///
    /// Only queried pages can be `a`, so this costs
    /// O(queried pages × nodes) link-set lookups.
    fn cross_link_pass(&mut self, mapping: &LinkMapping) {
        let ids: Vec<PageTitle> = self.nodes.iter().map(|n| n.id.clone()).collect();
        for a in &ids {
            let Some(links) = mapping.get(a) else {
                continue;
            };
            for b in &ids {
                if a != b && links.contains(b) {
                    self.add_edge(a, b);
                }
            }
        }
    }

    /// Take the accumulated nodes and edges.
    pub fn finish(self) -> GraphPayload {
        GraphPayload {
            nodes: self.nodes,
            links: self.links,
        }
    }
}

/// Assemble `mapping` and `seeds` under `policy`.
pub fn assemble(mapping: &LinkMapping, seeds: &[PageTitle], policy: EndpointPolicy) -> GraphPayload {
    GraphAssembler::new(policy).assemble(mapping, seeds)
}
