//! Per-run memo of fetch results.
//!
//! # Keying
//!
//! Entries are keyed by title only. A second request for a title with a
//! different `limit` gets the result produced for the first limit. Callers
//! that need a different limit need a fresh cache (a new build run).
//!
//! # Concurrency
//!
//! - DashMap: sharded map from title to a per-title `OnceCell`
//! - The shard lock is released before fetching, so slow fetches for
//!   different titles never block each other
//! - `OnceCell::get_or_init` admits one filler per title; concurrent callers
//!   for the same title block until it finishes and then share its result
//!
//! Failures are memoized like successes: a title is fetched at most once per
//! run whatever the outcome.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use wikigraph_core::{FetchResult, LinkSet, PageTitle};

type Slot = Arc<OnceCell<FetchResult<LinkSet>>>;

/// Title-keyed cache living for exactly one build run.
#[derive(Debug, Default)]
pub struct PageCache {
    slots: DashMap<PageTitle, Slot>,
    fetches: AtomicUsize,
    hits: AtomicUsize,
}

impl PageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `title`, running `fetch` on first use.
    ///
    /// `limit` is forwarded to `fetch` but is not part of the key.
    pub fn get_or_fetch<F>(&self, title: &str, limit: usize, fetch: F) -> FetchResult<LinkSet>
    where
        F: FnOnce(&str, usize) -> FetchResult<LinkSet>,
    {
        let slot: Slot = self.slots.entry(title.to_string()).or_default().clone();

        let mut filled_here = false;
        let result = slot.get_or_init(|| {
            filled_here = true;
            self.fetches.fetch_add(1, Ordering::Relaxed);
            fetch(title, limit)
        });

        if !filled_here {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(target: "wikigraph::cache", title = %title, "Cache hit");
        }
        result.clone()
    }

    /// The settled result for `title`, without fetching.
    pub fn get(&self, title: &str) -> Option<FetchResult<LinkSet>> {
        self.slots
            .get(title)
            .and_then(|slot| slot.value().get().cloned())
    }

    /// Whether `title` has a settled result.
    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Number of titles with a slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing was requested yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of times a fetch function actually ran.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Number of requests answered from the cache.
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use wikigraph_core::FetchError;

    fn links(titles: &[&str]) -> LinkSet {
        titles.iter().copied().collect()
    }

    #[test]
    fn fetches_once_per_title() {
        let cache = PageCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = |_: &str, _: usize| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(links(&["a", "b"]))
        };

        for _ in 0..5 {
            let got = cache.get_or_fetch("P", 10, fetch).unwrap();
            assert_eq!(got.as_slice(), &["a", "b"]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.fetch_count(), 1);
        assert_eq!(cache.hit_count(), 4);
    }

    #[test]
    fn limit_is_not_part_of_the_key() {
        let cache = PageCache::new();
        let first = cache
            .get_or_fetch("P", 2, |_, limit| {
                assert_eq!(limit, 2);
                Ok(links(&["a", "b"]))
            })
            .unwrap();
        let second = cache
            .get_or_fetch("P", 50, |_, _| panic!("must be served from cache"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn failures_are_memoized() {
        let cache = PageCache::new();
        let err = FetchError::Transport {
            title: "P".into(),
            reason: "timeout".into(),
        };
        let first = cache.get_or_fetch("P", 10, |_, _| Err(err.clone()));
        let second = cache.get_or_fetch("P", 10, |_, _| Ok(LinkSet::new()));
        assert_eq!(first, Err(err.clone()));
        assert_eq!(second, Err(err));
        assert_eq!(cache.fetch_count(), 1);
    }

    #[test]
    fn distinct_titles_fetch_independently() {
        let cache = PageCache::new();
        cache.get_or_fetch("A", 10, |_, _| Ok(links(&["x"]))).unwrap();
        cache.get_or_fetch("B", 10, |_, _| Ok(links(&["y"]))).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.fetch_count(), 2);
        assert!(cache.contains("A"));
        assert!(!cache.contains("C"));
        assert_eq!(cache.get("B").unwrap().unwrap().as_slice(), &["y"]);
    }

    #[test]
    fn concurrent_requests_share_one_fetch() {
        let cache = Arc::new(PageCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    cache
                        .get_or_fetch("Slow", 10, |_, _| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(30));
                            Ok(links(&["a"]))
                        })
                        .unwrap()
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap().as_slice(), &["a"]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.fetch_count(), 1);
        assert_eq!(cache.hit_count(), 7);
    }
}
