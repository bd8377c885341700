//! Crawl statistics
//!
//! This module accumulates per-run counters while the crawl loop runs and
//! renders them for the terminal once it is done.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Why the crawl loop stopped dispatching work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Every reachable in-scope URL was visited
    #[default]
    FrontierExhausted,

    /// The configured `max-pages` limit was reached
    PageCap,

    /// The configured `max-duration` limit was reached
    TimeCap,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrontierExhausted => "frontier_exhausted",
            Self::PageCap => "page_cap",
            Self::TimeCap => "time_cap",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of URLs dequeued and processed
    pub pages_visited: u64,

    /// Count of pages by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// In-scope links found across all pages, duplicates included
    pub links_discovered: u64,

    /// Links accepted by the frontier
    pub links_enqueued: u64,

    /// URLs left in the frontier when a safety cap tripped
    pub urls_discarded: u64,

    /// Sections appended to the output document
    pub sections_written: u64,

    /// Size of the written document
    pub document_bytes: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stop_reason: StopReason,
}

impl CrawlStatistics {
    /// Starts a new set of counters stamped with the current time
    pub fn start() -> Self {
        Self {
            pages_visited: 0,
            pages_by_state: HashMap::new(),
            links_discovered: 0,
            links_enqueued: 0,
            urls_discarded: 0,
            sections_written: 0,
            document_bytes: 0,
            started_at: Utc::now(),
            finished_at: None,
            stop_reason: StopReason::default(),
        }
    }

    /// Counts one processed page in the given state
    pub fn record(&mut self, state: PageState) {
        self.pages_visited += 1;
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    /// Returns the number of pages recorded in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Returns the number of pages that ended in an error state
    pub fn error_count(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the run, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Stop reason: {}", stats.stop_reason);
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Links enqueued: {}", stats.links_enqueued);
    if stats.urls_discarded > 0 {
        println!("  URLs discarded by cap: {}", stats.urls_discarded);
    }
    println!();

    println!("Pages by State:");
    // Sort states by count (descending), then by state for a stable listing
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (state, count) in state_counts {
        let percentage = if stats.pages_visited > 0 {
            (*count as f64 / stats.pages_visited as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    println!("Output:");
    println!("  Sections written: {}", stats.sections_written);
    println!("  Document size: {} bytes", stats.document_bytes);
    println!();

    let errors = stats.error_count();
    if errors > 0 {
        println!("Skipped pages: {}", errors);
    }
}
