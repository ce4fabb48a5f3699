//! Client-side memo of search results.

use std::collections::HashMap;

use crate::api::SearchResultItem;

/// Prefix-aware memo of prior search results, keyed by normalized query.
///
/// Lookup tries the exact key first, then every prefix from one character
/// shorter down to the minimum key length, returning the first hit. A
/// shorter prefix's result set is an optimistic stand-in to render while
/// the authoritative fetch for the full query is in flight; the real fetch
/// always supersedes it.
///
/// Entries are never evicted; the memo lives for the session.
#[derive(Debug)]
pub struct SearchCache {
    entries: HashMap<String, Vec<SearchResultItem>>,
    min_key_chars: usize,
}

impl SearchCache {
    /// Creates an empty cache whose prefix scan stops at `min_key_chars`.
    pub fn new(min_key_chars: usize) -> Self {
        Self {
            entries: HashMap::new(),
            min_key_chars,
        }
    }

    /// Exact hit, or the longest cached prefix of `key`, or nothing.
    pub fn lookup(&self, key: &str) -> Option<&[SearchResultItem]> {
        if let Some(hit) = self.entries.get(key) {
            return Some(hit);
        }
        let chars = key.chars().count();
        for len in (self.min_key_chars..chars).rev() {
            let prefix: String = key.chars().take(len).collect();
            if let Some(hit) = self.entries.get(&prefix) {
                return Some(hit);
            }
        }
        None
    }

    /// Stores the authoritative results for `key`, replacing any prior entry.
    pub fn put(&mut self, key: impl Into<String>, results: Vec<SearchResultItem>) {
        self.entries.insert(key.into(), results);
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(crate::search::DEFAULT_MIN_QUERY_CHARS)
    }
}
