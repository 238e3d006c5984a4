//! Paginated link fetching for a single page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use wikigraph_core::{FetchError, FetchResult, LinkSet};

use crate::api::{ApiResponse, LinkApi};
use crate::limiter::{RateLimiter, RequestKind};

/// Fetches all links of a page by following continuation tokens.
///
/// Every request, continuation rounds included, goes through the shared
/// [`RateLimiter`]. A fetch stops when the endpoint has no more batches,
/// when `limit` unique links are collected, or after
/// `ceil(limit / page_size)` rounds, whichever comes first.
pub struct LinkSource<A> {
    api: A,
    limiter: Arc<RateLimiter>,
    page_size: usize,
    cancelled: Arc<AtomicBool>,
}

impl<A: LinkApi> LinkSource<A> {
    /// Create a source over `api` requesting `page_size` links per call.
    pub fn new(api: A, limiter: Arc<RateLimiter>, page_size: usize) -> Self {
        Self {
            api,
            limiter,
            page_size: page_size.max(1),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// The underlying endpoint.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Links requested per call.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Upper bound on requests for one page with the given limit.
    pub fn max_rounds(&self, limit: usize) -> usize {
        let ps = self.page_size;
        (limit / ps + usize::from(limit % ps != 0)).max(1)
    }

    /// Fetch up to `limit` unique links of `title`, in endpoint order.
    ///
    /// A page that does not exist, a failed request and a cancelled build
    /// are all reported as `Err`. A failure on any round discards the links
    /// collected in earlier rounds.
    pub fn fetch_links(&self, title: &str, limit: usize) -> FetchResult<LinkSet> {
        let mut links = LinkSet::new();
        if limit == 0 {
            return Ok(links);
        }

        let max_rounds = self.max_rounds(limit);
        let mut continuation: Option<String> = None;
        let mut rounds = 0;

        loop {
            if self.cancelled.load(Ordering::Acquire) {
                return Err(FetchError::Cancelled {
                    title: title.to_string(),
                });
            }

            let kind = if rounds == 0 {
                RequestKind::FirstPage
            } else {
                RequestKind::Continuation
            };
            self.limiter.acquire(kind);
            let response = self
                .api
                .query_links(title, self.page_size, continuation.as_deref());
            rounds += 1;

            match response {
                ApiResponse::Found {
                    links: batch,
                    continuation: next,
                } => {
                    let batch_len = batch.len();
                    links.extend(batch);
                    debug!(target: "wikigraph::fetch", title = %title, round = rounds, batch = batch_len, "Fetched batch");

                    match next {
                        None => break,
                        Some(_) if links.len() >= limit => break,
                        Some(_) if rounds >= max_rounds => {
                            debug!(target: "wikigraph::fetch", title = %title, rounds, "Round ceiling reached, treating as exhausted");
                            break;
                        }
                        Some(token) => continuation = Some(token),
                    }
                }
                ApiResponse::NotFound => {
                    warn!(target: "wikigraph::fetch", title = %title, "Page not found");
                    return Err(FetchError::NotFound {
                        title: title.to_string(),
                    });
                }
                ApiResponse::TransportError(reason) => {
                    warn!(target: "wikigraph::fetch", title = %title, error = %reason, "Error fetching links");
                    return Err(FetchError::Transport {
                        title: title.to_string(),
                        reason,
                    });
                }
                ApiResponse::Malformed(reason) => {
                    warn!(target: "wikigraph::fetch", title = %title, error = %reason, "Malformed response");
                    return Err(FetchError::Malformed {
                        title: title.to_string(),
                        reason,
                    });
                }
            }
        }

        links.truncate(limit);
        info!(target: "wikigraph::fetch", title = %title, links = links.len(), rounds, "Fetched links");
        Ok(links)
    }

    /// Like [`LinkSource::fetch_links`], but any failure yields an empty set.
    pub fn fetch_links_or_empty(&self, title: &str, limit: usize) -> LinkSet {
        self.fetch_links(title, limit).unwrap_or_default()
    }
}
