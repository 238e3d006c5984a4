//! Raw link data gathered from the link-listing endpoint.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An opaque, case-sensitive page title. Identifies a node.
pub type PageTitle = String;

/// Outbound links of one page, in fetch order, without duplicates.
///
/// The first occurrence of a title wins; later repeats are ignored. Order
/// follows the endpoint's pagination order and is not stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PageTitle>", into = "Vec<PageTitle>")]
pub struct LinkSet {
    titles: Vec<PageTitle>,
    seen: HashSet<PageTitle>,
}

impl LinkSet {
    /// Create an empty link set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a title. Returns false if it was already present.
    pub fn push(&mut self, title: impl Into<PageTitle>) -> bool {
        let title = title.into();
        if self.seen.contains(&title) {
            return false;
        }
        self.seen.insert(title.clone());
        self.titles.push(title);
        true
    }

    /// Keep only the first `limit` titles.
    pub fn truncate(&mut self, limit: usize) {
        if self.titles.len() <= limit {
            return;
        }
        for dropped in self.titles.drain(limit..) {
            self.seen.remove(&dropped);
        }
    }

    /// Whether `title` is one of the links.
    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether there are no links.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Iterate titles in fetch order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageTitle> {
        self.titles.iter()
    }

    /// Titles in fetch order.
    pub fn as_slice(&self) -> &[PageTitle] {
        &self.titles
    }
}

impl From<Vec<PageTitle>> for LinkSet {
    fn from(titles: Vec<PageTitle>) -> Self {
        titles.into_iter().collect()
    }
}

impl From<LinkSet> for Vec<PageTitle> {
    fn from(set: LinkSet) -> Self {
        set.titles
    }
}

impl<S: Into<PageTitle>> FromIterator<S> for LinkSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LinkSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<PageTitle>> Extend<S> for LinkSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for title in iter {
            self.push(title);
        }
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a PageTitle;
    type IntoIter = std::slice::Iter<'a, PageTitle>;

    fn into_iter(self) -> Self::IntoIter {
        self.titles.iter()
    }
}

/// Queried page → its links, in insertion order.
///
/// Only queried pages (seeds) have entries; link targets are not queried
/// unless they are themselves seeds. Inserting an existing title replaces
/// its links but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkMapping {
    entries: Vec<(PageTitle, LinkSet)>,
    index: HashMap<PageTitle, usize>,
}

impl LinkMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the links of `source`.
    pub fn insert(&mut self, source: impl Into<PageTitle>, links: LinkSet) {
        let source = source.into();
        match self.index.get(&source) {
            Some(&pos) => self.entries[pos].1 = links,
            None => {
                self.index.insert(source.clone(), self.entries.len());
                self.entries.push((source, links));
            }
        }
    }

    /// Links of `source`, if it was queried.
    pub fn get(&self, source: &str) -> Option<&LinkSet> {
        self.index.get(source).map(|&pos| &self.entries[pos].1)
    }

    /// Iterate `(source, links)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PageTitle, &LinkSet)> {
        self.entries.iter().map(|(s, l)| (s, l))
    }

    /// Number of queried pages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was queried.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of links across all pages.
    pub fn total_links(&self) -> usize {
        self.entries.iter().map(|(_, l)| l.len()).sum()
    }
}

impl<S: Into<PageTitle>> FromIterator<(S, LinkSet)> for LinkMapping {
    fn from_iter<I: IntoIterator<Item = (S, LinkSet)>>(iter: I) -> Self {
        let mut mapping = LinkMapping::new();
        for (source, links) in iter {
            mapping.insert(source, links);
        }
        mapping
    }
}
