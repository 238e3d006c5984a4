//! Graph assembly and build orchestration for wikigraph.
//!
//! - `graph`: [`GraphAssembler`], integrity checks and an adjacency index
//! - `session`: [`BuildSession`], one fetch-assemble-check run

pub mod graph;
pub mod session;

pub use graph::adjacency::AdjacencyIndex;
pub use graph::integrity::check_integrity;
pub use graph::{assemble, GraphAssembler};
pub use session::{BuildReport, BuildSession, CancelHandle, FetchSummary};
