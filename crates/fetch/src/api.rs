//! The link-listing endpoint contract.
//!
//! One call asks for the links of one title, optionally resuming from a
//! continuation token. The body is decoded once, here, into a tagged
//! [`ApiResponse`]; callers never probe raw JSON.
//!
//! Expected body shape:
//!
//! ```text
//! {"continue": {"plcontinue": "<token>"},
//!  "query": {"pages": {"<pageid>": {"title": "...", "links": [{"title": "..."}]}}}}
//! ```
//!
//! A page id of `-1` (or a `missing` marker) means the page does not exist.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use wikigraph_core::PageTitle;

/// Page id the endpoint uses for a nonexistent page.
pub const MISSING_PAGE_ID: &str = "-1";

/// Decoded result of one endpoint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// The page exists. `continuation` is set when more links remain.
    Found {
        /// Link titles of this batch, in endpoint order
        links: Vec<PageTitle>,
        /// Token for the next batch, if any
        continuation: Option<String>,
    },
    /// The page does not exist.
    NotFound,
    /// The request failed before a body was obtained.
    TransportError(String),
    /// A body was obtained but did not match the contract.
    Malformed(String),
}

/// Transport seam over the link-listing endpoint.
///
/// Implementations issue exactly one request per call and must not retry or
/// sleep on their own; spacing is the caller's job.
pub trait LinkApi: Send + Sync {
    /// Request up to `page_size` links of `title`, resuming at `continuation`.
    fn query_links(&self, title: &str, page_size: usize, continuation: Option<&str>)
        -> ApiResponse;
}

impl<T: LinkApi + ?Sized> LinkApi for Arc<T> {
    fn query_links(
        &self,
        title: &str,
        page_size: usize,
        continuation: Option<&str>,
    ) -> ApiResponse {
        (**self).query_links(title, page_size, continuation)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    query: Option<QueryBlock>,
    #[serde(default, rename = "continue")]
    continuation: Option<ContinueBlock>,
    #[serde(default)]
    error: Option<ErrorBlock>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    pages: BTreeMap<String, PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    #[serde(default)]
    links: Vec<LinkEntry>,
    #[serde(default)]
    missing: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    title: PageTitle,
}

#[derive(Debug, Deserialize)]
struct ContinueBlock {
    #[serde(default)]
    plcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBlock {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

/// Decode a response body.
pub fn parse_response(body: &str) -> ApiResponse {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(e) => e,
        Err(e) => return ApiResponse::Malformed(format!("invalid JSON: {}", e)),
    };

    if let Some(err) = envelope.error {
        return ApiResponse::Malformed(format!("endpoint error {}: {}", err.code, err.info));
    }

    let Some(query) = envelope.query else {
        return ApiResponse::Malformed("response has no query block".to_string());
    };

    let Some((page_id, page)) = query.pages.into_iter().next() else {
        return ApiResponse::Malformed("response lists no pages".to_string());
    };

    if page_id == MISSING_PAGE_ID || page.missing.is_some() {
        return ApiResponse::NotFound;
    }

    ApiResponse::Found {
        links: page.links.into_iter().map(|l| l.title).collect(),
        continuation: envelope.continuation.and_then(|c| c.plcontinue),
    }
}
