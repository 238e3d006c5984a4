//! Error taxonomy.
//!
//! Two tiers:
//! - [`FetchError`]: one page could not be fetched. Recoverable; the build
//!   degrades that page to an empty link set and carries on.
//! - [`BuildError`]: the build itself is broken (assembly defect, bad config,
//!   unwritable output, no worker pool). Fatal.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::links::PageTitle;

/// Result of fetching one page.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result of a build-level operation.
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Per-page fetch failure.
///
/// Cloneable so a cached failure can be handed to every caller asking for
/// the same title.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The endpoint reported that the page does not exist.
    #[error("page not found: {title}")]
    NotFound {
        /// Requested title
        title: PageTitle,
    },
    /// Network, timeout or HTTP status failure.
    #[error("transport failure for '{title}': {reason}")]
    Transport {
        /// Requested title
        title: PageTitle,
        /// Underlying error text
        reason: String,
    },
    /// The response body did not match the endpoint contract.
    #[error("malformed response for '{title}': {reason}")]
    Malformed {
        /// Requested title
        title: PageTitle,
        /// What was wrong with the body
        reason: String,
    },
    /// The build was cancelled before the page was fully fetched.
    #[error("fetch cancelled for '{title}'")]
    Cancelled {
        /// Requested title
        title: PageTitle,
    },
}

impl FetchError {
    /// The title the failed fetch was for.
    pub fn title(&self) -> &str {
        match self {
            FetchError::NotFound { title }
            | FetchError::Transport { title, .. }
            | FetchError::Malformed { title, .. }
            | FetchError::Cancelled { title } => title,
        }
    }

    /// Whether the page is simply absent, as opposed to a failed request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Invalid configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
    /// The TOML document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Fatal build failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Assembly produced an inconsistent graph. Always a defect.
    #[error("graph assembly failed: {reason}")]
    Assembly {
        /// Which invariant was violated
        reason: String,
    },
    /// Filesystem failure while reading or writing a payload or config.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The fetch worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

impl BuildError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an assembly error.
    pub fn assembly(reason: impl Into<String>) -> Self {
        BuildError::Assembly {
            reason: reason.into(),
        }
    }
}
