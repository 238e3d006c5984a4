//! Public types for the wikigraph API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Raw link data
// ============================================================================

pub use wikigraph_core::{LinkMapping, LinkSet, PageTitle};

// ============================================================================
// Assembled graph
// ============================================================================

pub use wikigraph_core::{GraphEdge, GraphNode, GraphPayload, GraphStats};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use wikigraph_core::{BuildConfig, EndpointPolicy};
pub use wikigraph_core::{BuildError, BuildResult, ConfigError, FetchError, FetchResult};

// ============================================================================
// Endpoint access and build runs
// ============================================================================

pub use wikigraph_engine::{AdjacencyIndex, BuildReport, CancelHandle, FetchSummary};
pub use wikigraph_fetch::{ApiResponse, HttpLinkApi, LinkApi};
