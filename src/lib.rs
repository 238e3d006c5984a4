//! wikigraph: build link graphs from wiki topic pages.
//!
//! [`KnowledgeGraph`] is the entry point. It owns a configuration and an
//! endpoint, and each [`KnowledgeGraph::rebuild`] runs a fresh build: new
//! page cache, new rate limiter, no state carried over from earlier runs.
//!
//! ```no_run
//! use wikigraph::{BuildConfig, KnowledgeGraph};
//!
//! let mut graph = KnowledgeGraph::new(BuildConfig::default().links_per_seed(50));
//! let stats = graph.rebuild()?;
//! println!("{} nodes, {} edges", stats.node_count, stats.link_count);
//! graph.write_json("graph-data.json".as_ref())?;
//! # Ok::<(), wikigraph::BuildError>(())
//! ```

mod types;

pub use types::*;

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use wikigraph_engine::BuildSession;

/// A link graph and the means to rebuild it.
pub struct KnowledgeGraph {
    config: BuildConfig,
    api: Arc<dyn LinkApi>,
    report: Option<BuildReport>,
}

impl KnowledgeGraph {
    /// Create a graph that fetches from the configured HTTP endpoint.
    pub fn new(config: BuildConfig) -> Self {
        let api = HttpLinkApi::from_config(&config);
        Self::with_api(config, api)
    }

    /// Create a graph over any [`LinkApi`].
    pub fn with_api(config: BuildConfig, api: impl LinkApi + 'static) -> Self {
        Self {
            config,
            api: Arc::new(api),
            report: None,
        }
    }

    /// The configuration builds run with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run a full build and replace the current graph with its result.
    ///
    /// On error the previous graph, if any, is kept.
    pub fn rebuild(&mut self) -> BuildResult<GraphStats> {
        let session = BuildSession::new(self.config.clone(), Arc::clone(&self.api))?;
        let report = session.run()?;
        info!(
            target: "wikigraph::build",
            nodes = report.stats.node_count,
            edges = report.stats.link_count,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Graph rebuilt"
        );
        let stats = report.stats;
        self.report = Some(report);
        Ok(stats)
    }

    /// The current graph, if a build has completed.
    pub fn payload(&self) -> Option<&GraphPayload> {
        self.report.as_ref().map(|r| &r.payload)
    }

    /// Full report of the last completed build.
    pub fn last_report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    /// Write the current graph as JSON. An empty graph is written if no
    /// build has completed yet.
    pub fn write_json(&self, path: &Path) -> BuildResult<()> {
        match self.payload() {
            Some(payload) => payload.write_json(path),
            None => GraphPayload::default().write_json(path),
        }
    }
}
