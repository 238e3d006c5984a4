//! Build configuration.
//!
//! [`BuildConfig`] controls which pages are fetched, how hard the endpoint is
//! pushed, and how assembly treats unknown edge endpoints. It can be built
//! in code with the setter methods or loaded from a TOML file:
//!
//! ```toml
//! seeds = ["Physics", "Mathematics"]
//! links_per_seed = 50
//! concurrency = 2
//! ```
//!
//! Fields missing from the file keep their defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult, ConfigError};
use crate::links::PageTitle;

/// Default link-listing endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Largest page size the endpoint serves per request.
pub const MAX_PAGE_SIZE: usize = 500;

/// Default seed pages.
pub const DEFAULT_SEEDS: [&str; 6] = [
    "Science",
    "Natural science",
    "Formal science",
    "Mathematics",
    "Physics",
    "Artificial intelligence",
];

/// What assembly does with an edge whose endpoint is not a node yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Create the missing endpoint as a secondary node (default).
    #[default]
    AutoCreate,
    /// Drop the edge.
    DropUnknown,
}

/// Options for one build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Link-listing endpoint URL.
    pub endpoint: String,
    /// Seed page titles, in processing order.
    pub seeds: Vec<PageTitle>,
    /// Maximum links kept per seed.
    pub links_per_seed: usize,
    /// Links requested per call.
    pub page_size: usize,
    /// Minimum spacing before a continuation round, in milliseconds.
    pub round_delay_ms: u64,
    /// Minimum spacing before the first request of a new page, in milliseconds.
    pub page_delay_ms: u64,
    /// Number of seeds fetched in parallel. 1 is strictly sequential.
    pub concurrency: usize,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Treatment of unknown edge endpoints.
    pub endpoint_policy: EndpointPolicy,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            seeds: DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect(),
            links_per_seed: 100,
            page_size: MAX_PAGE_SIZE,
            round_delay_ms: 100,
            page_delay_ms: 500,
            concurrency: 1,
            timeout_secs: 30,
            user_agent: concat!("wikigraph/", env!("CARGO_PKG_VERSION")).to_string(),
            endpoint_policy: EndpointPolicy::AutoCreate,
        }
    }
}

impl BuildConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: BuildConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> BuildResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Ok(Self::from_toml(&text)?)
    }

    /// Reject values the build cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "endpoint",
                reason: "must not be empty".into(),
            });
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "must be at least 1".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Set the endpoint URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Replace the seed list.
    pub fn seeds<I, S>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PageTitle>,
    {
        self.seeds = seeds.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-seed link limit.
    pub fn links_per_seed(mut self, limit: usize) -> Self {
        self.links_per_seed = limit;
        self
    }

    /// Set the per-request page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set both request spacings.
    pub fn delays(mut self, round: Duration, page: Duration) -> Self {
        self.round_delay_ms = millis(round);
        self.page_delay_ms = millis(page);
        self
    }

    /// Set the number of parallel seed fetches.
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers;
        self
    }

    /// Set the edge endpoint policy.
    pub fn endpoint_policy(mut self, policy: EndpointPolicy) -> Self {
        self.endpoint_policy = policy;
        self
    }

    /// Spacing before a continuation round.
    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms)
    }

    /// Spacing before the first request of a page.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
