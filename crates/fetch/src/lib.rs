//! Link acquisition for wikigraph.
//!
//! Layers, leaves first:
//! - `limiter`: one shared [`RateLimiter`] spacing every outbound request
//! - `api`: the [`LinkApi`] transport seam and its tagged [`ApiResponse`]
//! - `http`: [`HttpLinkApi`], the real endpoint client
//! - `source`: [`LinkSource`], pagination over a `LinkApi`
//! - `cache`: [`PageCache`], at most one fetch per title per run
//! - `testing`: `ScriptedApi`, an in-memory endpoint (`testing` feature)

pub mod api;
pub mod cache;
pub mod http;
pub mod limiter;
pub mod source;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{ApiResponse, LinkApi};
pub use cache::PageCache;
pub use http::HttpLinkApi;
pub use limiter::{RateLimiter, RequestKind};
pub use source::LinkSource;
#[cfg(any(test, feature = "testing"))]
pub use testing::ScriptedApi;
