//! Core types for wikigraph.
//!
//! This crate defines the shared vocabulary of the workspace:
//! - `links`: PageTitle, LinkSet and LinkMapping (raw fetch results)
//! - `graph`: GraphNode, GraphEdge and GraphPayload (assembled output)
//! - `error`: FetchError (per-page, recoverable) and BuildError (fatal)
//! - `config`: BuildConfig and its TOML loader

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod graph;
pub mod links;

pub use config::{BuildConfig, EndpointPolicy};
pub use error::{BuildError, BuildResult, ConfigError, FetchError, FetchResult};
pub use graph::{GraphEdge, GraphNode, GraphPayload, GraphStats};
pub use links::{LinkMapping, LinkSet, PageTitle};
