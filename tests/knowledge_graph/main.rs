//! KnowledgeGraph Test Suite
//!
//! End-to-end tests through the public facade over a scripted endpoint.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test knowledge_graph
//! ```

// Test modules
mod test_utils;

mod output;
mod rebuild;
