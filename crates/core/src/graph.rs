//! Assembled graph types, in the JSON shape the renderer consumes.
//!
//! ```text
//! {"nodes": [{"id", "label", "isPrimary", "size", "group"}],
//!  "links": [{"source", "target", "value"}]}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};
use crate::links::PageTitle;

/// Rendering size of a seed node.
pub const PRIMARY_SIZE: u32 = 30;
/// Rendering size of a secondary node.
pub const SECONDARY_SIZE: u32 = 10;
/// Rendering group of a seed node.
pub const PRIMARY_GROUP: u32 = 1;
/// Rendering group of a secondary node.
pub const SECONDARY_GROUP: u32 = 2;

/// A page in the graph.
///
/// Payloads written without a `group` get the group matching `isPrimary`
/// when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NodeRecord")]
pub struct GraphNode {
    /// Node identity.
    pub id: PageTitle,
    /// Display label (same as the title).
    pub label: PageTitle,
    /// True iff the page was a seed.
    pub is_primary: bool,
    /// Rendering size hint.
    pub size: u32,
    /// Rendering group hint.
    pub group: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: PageTitle,
    label: PageTitle,
    is_primary: bool,
    size: u32,
    #[serde(default)]
    group: Option<u32>,
}

impl From<NodeRecord> for GraphNode {
    fn from(r: NodeRecord) -> Self {
        let group = r.group.unwrap_or(if r.is_primary {
            PRIMARY_GROUP
        } else {
            SECONDARY_GROUP
        });
        Self {
            id: r.id,
            label: r.label,
            is_primary: r.is_primary,
            size: r.size,
            group,
        }
    }
}

impl GraphNode {
    /// Node for a seed page.
    pub fn primary(title: impl Into<PageTitle>) -> Self {
        Self::with_role(title.into(), true)
    }

    /// Node for a page reached only as a link target.
    pub fn secondary(title: impl Into<PageTitle>) -> Self {
        Self::with_role(title.into(), false)
    }

    fn with_role(title: PageTitle, is_primary: bool) -> Self {
        Self {
            label: title.clone(),
            id: title,
            is_primary,
            size: if is_primary { PRIMARY_SIZE } else { SECONDARY_SIZE },
            group: if is_primary { PRIMARY_GROUP } else { SECONDARY_GROUP },
        }
    }
}

/// A directed "source links to target" edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Linking page.
    pub source: PageTitle,
    /// Linked page.
    pub target: PageTitle,
    /// Stroke-weight hint (default 1).
    #[serde(default = "default_value")]
    pub value: u32,
}

fn default_value() -> u32 {
    1
}

impl GraphEdge {
    /// Create an edge with the default weight.
    pub fn new(source: impl Into<PageTitle>, target: impl Into<PageTitle>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: 1,
        }
    }

    /// Whether the edge points back at its own source.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Summary counts of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges, parallel duplicates included.
    pub link_count: usize,
    /// Number of seed nodes.
    pub primary_nodes: usize,
}

/// The finished graph: nodes and edges in insertion order.
///
/// Immutable once a build completes; a rebuild produces a new payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    /// All nodes, unique by id.
    pub nodes: Vec<GraphNode>,
    /// All edges. May contain parallel duplicates and self-loops.
    pub links: Vec<GraphEdge>,
}

impl GraphPayload {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.links.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges leaving `id`, in insertion order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.links.iter().filter(move |e| e.source == id)
    }

    /// Summary counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            link_count: self.links.len(),
            primary_nodes: self.nodes.iter().filter(|n| n.is_primary).count(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> BuildResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BuildError::Serialization(e.to_string()))
    }

    /// Parse a payload from JSON.
    pub fn from_json(json: &str) -> BuildResult<Self> {
        serde_json::from_str(json).map_err(|e| BuildError::Serialization(e.to_string()))
    }

    /// Write the payload as pretty-printed JSON to `path`.
    pub fn write_json(&self, path: &Path) -> BuildResult<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| BuildError::io(path, e))
    }

    /// Read a payload previously written with [`GraphPayload::write_json`].
    pub fn read_json(path: &Path) -> BuildResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::from_json(&json)
    }
}
