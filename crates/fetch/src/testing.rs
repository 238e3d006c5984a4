//! Scripted in-memory endpoint.
//!
//! [`ScriptedApi`] answers [`LinkApi`] calls from a per-title script, so
//! pagination, missing pages and transport failures can be exercised
//! without a network. Continuation tokens are the decimal index of the next
//! batch. Every call is recorded for later assertions.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use wikigraph_core::PageTitle;

use crate::api::{ApiResponse, LinkApi};

#[derive(Debug, Clone)]
enum Script {
    Batches(Vec<Vec<PageTitle>>),
    Endless(Vec<PageTitle>),
    Missing,
    FailAt {
        batches: Vec<Vec<PageTitle>>,
        round: usize,
        reason: String,
    },
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Requested title
    pub title: PageTitle,
    /// Requested page size
    pub page_size: usize,
    /// Continuation token sent, if any
    pub continuation: Option<String>,
}

/// A [`LinkApi`] that replays scripted responses.
///
/// Titles without a script are reported as not found, like the real
/// endpoint does for unknown pages.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    scripts: HashMap<PageTitle, Script>,
    latency: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

fn owned(batch: &[&str]) -> Vec<PageTitle> {
    batch.iter().map(|s| s.to_string()).collect()
}

impl ScriptedApi {
    /// Create an endpoint with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `title` as a single batch.
    pub fn page(self, title: &str, links: &[&str]) -> Self {
        self.batches(title, &[links])
    }

    /// Serve `title` as consecutive batches linked by continuation tokens.
    pub fn batches(mut self, title: &str, batches: &[&[&str]]) -> Self {
        let batches = batches.iter().map(|b| owned(b)).collect();
        self.scripts.insert(title.to_string(), Script::Batches(batches));
        self
    }

    /// Serve `title` with the same batch forever, always with a token.
    pub fn endless(mut self, title: &str, batch: &[&str]) -> Self {
        self.scripts
            .insert(title.to_string(), Script::Endless(owned(batch)));
        self
    }

    /// Report `title` as nonexistent.
    pub fn missing(mut self, title: &str) -> Self {
        self.scripts.insert(title.to_string(), Script::Missing);
        self
    }

    /// Fail every request for `title` with a transport error.
    pub fn failing(self, title: &str, reason: &str) -> Self {
        self.failing_at(title, &[], 0, reason)
    }

    /// Serve `batches` for `title` but fail the request for batch `round`.
    pub fn failing_at(
        mut self,
        title: &str,
        batches: &[&[&str]],
        round: usize,
        reason: &str,
    ) -> Self {
        let batches = batches.iter().map(|b| owned(b)).collect();
        self.scripts.insert(
            title.to_string(),
            Script::FailAt {
                batches,
                round,
                reason: reason.to_string(),
            },
        );
        self
    }

    /// Sleep this long inside every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// All calls so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made for `title`.
    pub fn calls_for(&self, title: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.title == title).count()
    }

    /// Total number of calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

fn batch_response(batches: &[Vec<PageTitle>], round: usize) -> ApiResponse {
    match batches.get(round) {
        Some(links) => ApiResponse::Found {
            links: links.clone(),
            continuation: (round + 1 < batches.len()).then(|| (round + 1).to_string()),
        },
        None => ApiResponse::Malformed(format!("no batch {}", round)),
    }
}

impl LinkApi for ScriptedApi {
    fn query_links(
        &self,
        title: &str,
        page_size: usize,
        continuation: Option<&str>,
    ) -> ApiResponse {
        self.calls.lock().push(RecordedCall {
            title: title.to_string(),
            page_size,
            continuation: continuation.map(str::to_string),
        });
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let round = match continuation.map(str::parse::<usize>) {
            None => 0,
            Some(Ok(n)) => n,
            Some(Err(_)) => return ApiResponse::Malformed("unknown continuation token".into()),
        };

        match self.scripts.get(title) {
            None | Some(Script::Missing) => ApiResponse::NotFound,
            Some(Script::Batches(batches)) => batch_response(batches, round),
            Some(Script::Endless(batch)) => ApiResponse::Found {
                links: batch.clone(),
                continuation: Some((round + 1).to_string()),
            },
            Some(Script::FailAt {
                batches,
                round: fail_round,
                reason,
            }) => {
                if round == *fail_round {
                    ApiResponse::TransportError(reason.clone())
                } else {
                    batch_response(batches, round)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_chain_through_tokens() {
        let api = ScriptedApi::new().batches("A", &[&["x", "y"], &["z"]]);
        let first = api.query_links("A", 2, None);
        assert_eq!(
            first,
            ApiResponse::Found {
                links: vec!["x".into(), "y".into()],
                continuation: Some("1".into()),
            }
        );
        let second = api.query_links("A", 2, Some("1"));
        assert_eq!(
            second,
            ApiResponse::Found {
                links: vec!["z".into()],
                continuation: None,
            }
        );
        assert_eq!(api.calls_for("A"), 2);
        assert_eq!(api.calls()[1].continuation.as_deref(), Some("1"));
    }

    #[test]
    fn unknown_title_is_not_found() {
        let api = ScriptedApi::new();
        assert_eq!(api.query_links("Ghost", 10, None), ApiResponse::NotFound);
    }

    #[test]
    fn failing_at_round() {
        let api = ScriptedApi::new().failing_at("A", &[&["x"], &["y"]], 1, "reset");
        assert!(matches!(api.query_links("A", 1, None), ApiResponse::Found { .. }));
        assert_eq!(
            api.query_links("A", 1, Some("1")),
            ApiResponse::TransportError("reset".into())
        );
    }
}
