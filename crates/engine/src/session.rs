//! Build orchestration.
//!
//! A [`BuildSession`] is one build run. It owns the page cache, the shared
//! rate limiter and the cancellation flag, and is consumed by
//! [`BuildSession::build`]; a rebuild starts from a new session, so nothing
//! carries over between runs.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use wikigraph_core::{
    BuildConfig, BuildError, BuildResult, FetchError, FetchResult, GraphPayload, GraphStats,
    LinkMapping, LinkSet, PageTitle,
};
use wikigraph_fetch::{LinkApi, LinkSource, PageCache, RateLimiter};

use crate::graph::integrity::check_integrity;
use crate::graph::GraphAssembler;

/// Shared flag that stops a running build from issuing further requests.
///
/// Pages not yet fetched when the flag is raised degrade to empty link sets.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Per-seed fetch outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    /// Distinct seeds processed.
    pub seeds: usize,
    /// Seeds fetched successfully.
    pub fetched: usize,
    /// Seeds the endpoint reported as nonexistent.
    pub not_found: usize,
    /// Seeds whose fetch failed (transport or malformed response).
    pub failed: usize,
    /// Seeds skipped because the build was cancelled.
    pub cancelled: usize,
}

impl FetchSummary {
    fn record(&mut self, result: &FetchResult<LinkSet>) {
        match result {
            Ok(_) => self.fetched += 1,
            Err(FetchError::NotFound { .. }) => self.not_found += 1,
            Err(FetchError::Cancelled { .. }) => self.cancelled += 1,
            Err(FetchError::Transport { .. } | FetchError::Malformed { .. }) => self.failed += 1,
        }
    }

    /// Seeds that ended up with an empty link set because of an error.
    pub fn degraded(&self) -> usize {
        self.not_found + self.failed + self.cancelled
    }
}

/// Everything a finished build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The assembled graph.
    pub payload: GraphPayload,
    /// Node, edge and primary counts of `payload`.
    pub stats: GraphStats,
    /// Per-seed outcome counts.
    pub fetch: FetchSummary,
    /// The individual per-seed failures, in seed order.
    pub failures: Vec<FetchError>,
    /// Wall-clock duration of the build.
    pub elapsed: Duration,
}

/// One build run over a [`LinkApi`].
pub struct BuildSession<A> {
    config: BuildConfig,
    source: LinkSource<A>,
    cache: PageCache,
    cancel: CancelHandle,
}

impl<A: LinkApi> BuildSession<A> {
    /// Create a session; fails if `config` is invalid.
    pub fn new(config: BuildConfig, api: A) -> BuildResult<Self> {
        config.validate()?;
        let limiter = Arc::new(RateLimiter::new(config.round_delay(), config.page_delay()));
        let cancel = CancelHandle::default();
        let source = LinkSource::new(api, limiter, config.page_size)
            .with_cancel_flag(Arc::clone(&cancel.0));
        Ok(Self {
            config,
            source,
            cache: PageCache::new(),
            cancel,
        })
    }

    /// The configuration this session runs with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// A handle that can cancel this session from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// The session's page cache.
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Links of `title` through the cache, fetching on first use.
    pub fn links_for(&self, title: &str, limit: usize) -> FetchResult<LinkSet> {
        self.cache
            .get_or_fetch(title, limit, |t, l| self.source.fetch_links(t, l))
    }

    /// Build over the configured seeds and per-seed limit.
    pub fn run(self) -> BuildResult<BuildReport> {
        let seeds = self.config.seeds.clone();
        let limit = self.config.links_per_seed;
        self.build(&seeds, limit)
    }

    /// Fetch every seed, assemble the graph and check it.
    ///
    /// Per-seed failures never abort the build: the seed keeps its primary
    /// node with no outgoing edges, and the failure is counted in the report.
    /// Only an assembly defect or a worker pool failure is returned as `Err`.
    pub fn build(self, seeds: &[PageTitle], links_per_seed: usize) -> BuildResult<BuildReport> {
        let started = Instant::now();
        let seeds = unique_in_order(seeds);
        info!(
            target: "wikigraph::build",
            seeds = seeds.len(),
            links_per_seed,
            concurrency = self.config.concurrency,
            "Starting build"
        );

        let results = self.fetch_all(&seeds, links_per_seed)?;

        let mut mapping = LinkMapping::new();
        let mut fetch = FetchSummary {
            seeds: seeds.len(),
            ..FetchSummary::default()
        };
        let mut failures = Vec::new();
        for (seed, result) in seeds.iter().zip(results) {
            fetch.record(&result);
            match result {
                Ok(links) => mapping.insert(seed.as_str(), links),
                Err(e) => {
                    warn!(target: "wikigraph::build", title = %seed, error = %e, "Seed degraded to empty link set");
                    mapping.insert(seed.as_str(), LinkSet::new());
                    failures.push(e);
                }
            }
        }

        let payload = GraphAssembler::new(self.config.endpoint_policy).assemble(&mapping, &seeds);
        check_integrity(&payload, &seeds)?;
        let stats = payload.stats();

        info!(
            target: "wikigraph::build",
            nodes = stats.node_count,
            edges = stats.link_count,
            primary = stats.primary_nodes,
            failed_seeds = fetch.degraded(),
            requests = self.cache.fetch_count(),
            "Build complete"
        );

        Ok(BuildReport {
            payload,
            stats,
            fetch,
            failures,
            elapsed: started.elapsed(),
        })
    }

    fn fetch_all(
        &self,
        seeds: &[PageTitle],
        limit: usize,
    ) -> BuildResult<Vec<FetchResult<LinkSet>>> {
        let fetch_one = |seed: &PageTitle| {
            info!(target: "wikigraph::build", title = %seed, "Fetching links");
            self.links_for(seed, limit)
        };

        let workers = self.config.concurrency.min(seeds.len());
        if workers <= 1 {
            return Ok(seeds.iter().map(fetch_one).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("wikigraph-fetch-{}", i))
            .build()
            .map_err(|e| BuildError::WorkerPool(e.to_string()))?;
        Ok(pool.install(|| seeds.par_iter().map(fetch_one).collect()))
    }
}

fn unique_in_order(seeds: &[PageTitle]) -> Vec<PageTitle> {
    let mut seen = HashSet::with_capacity(seeds.len());
    seeds
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect()
}
