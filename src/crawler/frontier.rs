//! Frontier management for the breadth-first crawl
//!
//! This module handles:
//! - The FIFO queue of URLs waiting to be visited
//! - The write-once visited set
//! - Scope and dedup checks on every newly discovered URL

use crate::url::{ScopeRule, UrlEquality};
use crate::{UrlError, UrlResult};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Queue of URLs to visit plus the set of URLs already visited
///
/// The frontier is the only authority on what has been seen: a URL is
/// returned by `next` at most once per run, and `offer` never queues a URL
/// that is visited or already waiting.
#[derive(Debug)]
pub struct Frontier {
    /// `(key, url)` pairs waiting to be visited, in discovery order
    ///
    /// The key is only used for dedup; the URL is the first resolved form
    /// seen and is what `next` hands out.
    queue: VecDeque<(String, String)>,

    /// Keys of every URL currently in `queue`
    queued: HashSet<String>,

    /// Keys of every URL ever returned by `next`
    visited: HashSet<String>,

    scope: ScopeRule,
    equality: UrlEquality,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(scope: ScopeRule, equality: UrlEquality) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            scope,
            equality,
        }
    }

    /// Resets the frontier to exactly one queued URL
    ///
    /// The visited set is cleared. The seed is not checked against the scope.
    pub fn seed(&mut self, url: &str) -> UrlResult<()> {
        let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;
        let key = self.equality.canonicalize(&parsed);

        self.queue.clear();
        self.queued.clear();
        self.visited.clear();

        self.queued.insert(key.clone());
        self.queue.push_back((key, parsed.to_string()));
        Ok(())
    }

    /// Removes and returns the head of the queue
    ///
    /// The URL is marked visited before it is returned, so links back to it
    /// found while processing it are rejected. `None` means the frontier is
    /// exhausted.
    pub fn next(&mut self) -> Option<String> {
        let (key, url) = self.queue.pop_front()?;
        self.queued.remove(&key);
        self.visited.insert(key);
        Some(url)
    }

    /// Queues a URL if it is in scope, unvisited and not already queued
    ///
    /// Rejection is not an error. Returns true if the URL was queued.
    pub fn offer(&mut self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::trace!("Rejected unparseable URL {}: {}", url, e);
                return false;
            }
        };

        if !self.scope.allows_url(&parsed) {
            tracing::trace!("Rejected out-of-scope URL {}", url);
            return false;
        }

        let key = self.equality.canonicalize(&parsed);

        if self.visited.contains(&key) {
            tracing::trace!("Rejected visited URL {}", key);
            return false;
        }

        if !self.queued.insert(key.clone()) {
            tracing::trace!("Rejected already queued URL {}", key);
            return false;
        }

        self.queue.push_back((key, parsed.to_string()));
        true
    }

    /// Returns the number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no URL is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs handed out by `next`
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns whether a URL (under the equality policy) has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.equality
            .canonicalize_str(url)
            .map(|key| self.visited.contains(&key))
            .unwrap_or(false)
    }

    /// Drops every waiting URL, returning how many were discarded
    pub fn drain(&mut self) -> usize {
        let discarded = self.queue.len();
        self.queue.clear();
        self.queued.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;

    const START: &str = "https://shop.example.com/product/";

    fn create_frontier() -> Frontier {
        let scope = ScopeRule::new(START, START, MatchMode::Prefix).unwrap();
        Frontier::new(scope, UrlEquality::exact())
    }

    #[test]
    fn test_seed_queues_exactly_one_url() {
        let mut frontier = create_frontier();
        frontier.seed(START).unwrap();

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.visited_count(), 0);
        assert_eq!(frontier.next(), Some(START.to_string()));
        assert_eq!(frontier.next(), None);
    }

    #[test]
    fn test_seed_clears_previous_state() {
        let mut frontier = create_frontier();
        frontier.seed(START).unwrap();
        frontier.next();
        frontier.offer("https://shop.example.com/product/a");

        frontier.seed(START).unwrap();
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.visited_count(), 0);
        assert!(!frontier.is_visited(START));
    }

    #[test]
    fn test_seed_rejects_unparseable_url() {
        let mut frontier = create_frontier();
        assert!(frontier.seed("not a url").is_err());
    }

    #[test]
    fn test_seed_ignores_scope() {
        let mut frontier = create_frontier();
        frontier.seed("https://shop.example.com/").unwrap();
        assert_eq!(frontier.next(), Some("https://shop.example.com/".to_string()));
    }

    #[test]
    fn test_next_marks_visited() {
        let mut frontier = create_frontier();
        frontier.seed(START).unwrap();

        let url = frontier.next().unwrap();
        assert!(frontier.is_visited(&url));
        assert!(!frontier.offer(&url), "self link must be rejected");
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = create_frontier();
        frontier.seed(START).unwrap();
        frontier.next();

        assert!(frontier.offer("https://shop.example.com/product/c"));
        assert!(frontier.offer("https://shop.example.com/product/a"));
        assert!(frontier.offer("https://shop.example.com/product/b"));

        assert_eq!(
            frontier.next().as_deref(),
            Some("https://shop.example.com/product/c")
        );
        assert_eq!(
            frontier.next().as_deref(),
            Some("https://shop.example.com/product/a")
        );
        assert_eq!(
            frontier.next().as_deref(),
            Some("https://shop.example.com/product/b")
        );
        assert_eq!(frontier.next(), None);
    }

    #[test]
    fn test_offer_rejects_queued_duplicate() {
        let mut frontier = create_frontier();
        frontier.seed(START).unwrap();
        frontier.next();

        assert!(frontier.offer("https://shop.example.com/product/a"));
        assert!(!frontier.offer("https://shop.example.com/product/a"));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_offer_rejects_other_host() {
        let mut frontier = create_frontier();
        assert!(!frontier.offer("https://elsewhere.example.com/product/a"));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_offer_rejects_same_host_outside_pattern() {
        let mut frontier = create_frontier();
        assert!(!frontier.offer("https://shop.example.com/blog/post"));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_offer_rejects_garbage() {
        let mut frontier = create_frontier();
        assert!(!frontier.offer("::::"));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_exact_equality_keeps_variants_distinct() {
        let mut frontier = create_frontier();
        assert!(frontier.offer("https://shop.example.com/product/a"));
        assert!(frontier.offer("https://shop.example.com/product/a/"));
        assert!(frontier.offer("https://shop.example.com/product/a?page=2"));
        assert_eq!(frontier.len(), 3);
    }

    #[test]
    fn test_loose_equality_merges_variants() {
        let scope = ScopeRule::new(START, START, MatchMode::Prefix).unwrap();
        let equality = UrlEquality {
            ignore_query: true,
            ignore_trailing_slash: true,
            ignore_fragment: true,
        };
        let mut frontier = Frontier::new(scope, equality);

        assert!(frontier.offer("https://shop.example.com/product/a"));
        assert!(!frontier.offer("https://shop.example.com/product/a/"));
        assert!(!frontier.offer("https://shop.example.com/product/a?page=2"));
        assert!(!frontier.offer("https://shop.example.com/product/a#reviews"));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_loose_equality_keeps_first_seen_url() {
        let scope = ScopeRule::new(START, START, MatchMode::Prefix).unwrap();
        let equality = UrlEquality {
            ignore_query: true,
            ignore_trailing_slash: false,
            ignore_fragment: false,
        };
        let mut frontier = Frontier::new(scope, equality);

        assert!(frontier.offer("https://shop.example.com/product/view?id=42"));
        assert!(!frontier.offer("https://shop.example.com/product/view?id=43"));
        assert_eq!(
            frontier.next().as_deref(),
            Some("https://shop.example.com/product/view?id=42")
        );
        assert!(frontier.is_visited("https://shop.example.com/product/view"));
    }

    #[test]
    fn test_trailing_slash_seed_stays_in_scope() {
        let scope = ScopeRule::new(START, START, MatchMode::Prefix).unwrap();
        let equality = UrlEquality {
            ignore_query: false,
            ignore_trailing_slash: true,
            ignore_fragment: false,
        };
        let mut frontier = Frontier::new(scope.clone(), equality);
        frontier.seed(START).unwrap();

        let url = frontier.next().unwrap();
        assert_eq!(url, START);
        assert!(scope.allows(&url));
        assert!(frontier.offer("https://shop.example.com/product/a/"));
        assert!(!frontier.offer("https://shop.example.com/product/a"));
        assert_eq!(
            frontier.next().as_deref(),
            Some("https://shop.example.com/product/a/")
        );
    }

    #[test]
    fn test_visited_count_equals_dequeues() {
        let mut frontier = create_frontier();
        frontier.seed(START).unwrap();

        let mut dequeues = 0;
        while let Some(url) = frontier.next() {
            dequeues += 1;
            // Every page links to two others and itself
            frontier.offer(&url);
            frontier.offer("https://shop.example.com/product/a");
            frontier.offer("https://shop.example.com/product/b");
        }

        assert_eq!(dequeues, 3);
        assert_eq!(frontier.visited_count(), dequeues);
    }

    #[test]
    fn test_drain_discards_waiting_urls() {
        let mut frontier = create_frontier();
        frontier.offer("https://shop.example.com/product/a");
        frontier.offer("https://shop.example.com/product/b");

        assert_eq!(frontier.drain(), 2);
        assert!(frontier.is_empty());
        assert!(frontier.offer("https://shop.example.com/product/a"));
    }
}
