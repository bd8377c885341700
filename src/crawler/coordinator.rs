//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other components
//! together:
//! - Seeding the frontier and dispatching URLs to a bounded set of workers
//! - Turning each fetched page into a document section and new links
//! - Emitting completed pages in dequeue order
//! - Enforcing the optional page and time caps
//! - Writing the output document once the crawl is done

use crate::config::Config;
use crate::crawler::extractor::{
    discover_links, extract_record, parse_page, ExtractionRules, ParseError,
};
use crate::crawler::fetcher::{Fetch, FetchError, FetchedPage};
use crate::crawler::frontier::Frontier;
use crate::crawler::throttle::Throttle;
use crate::output::{render_section, CrawlStatistics, OutputDocument, StopReason};
use crate::state::{CrawlPhase, PageState};
use crate::url::{ScopeRule, UrlEquality};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Counters and timestamps for the run
    pub statistics: CrawlStatistics,

    /// Where the output document was written
    pub document_path: PathBuf,

    /// Always `CrawlPhase::Done` for a report returned by `run`
    pub phase: CrawlPhase,
}

/// One dequeued URL handed to a worker
#[derive(Debug, Clone)]
struct PageTask {
    /// Dequeue order, used to emit results deterministically
    sequence: u64,
    url: String,
    /// False for an out-of-scope start URL, which is only traversed
    extract: bool,
}

/// What a worker learned from one page
#[derive(Debug)]
struct PageOutcome {
    url: String,
    state: PageState,
    section: Option<String>,
    links: Vec<String>,
}

impl PageOutcome {
    fn skipped(url: String, state: PageState) -> Self {
        Self {
            url,
            state,
            section: None,
            links: Vec::new(),
        }
    }
}

/// Main crawler coordinator structure
///
/// The coordinator is the only owner of the frontier and the output
/// document. Workers receive a URL and hand back an owned `PageOutcome`, so
/// no crawl state is shared between tasks apart from the throttle.
pub struct Coordinator<F: Fetch + 'static> {
    config: Config,
    fetcher: Arc<F>,
    rules: Arc<ExtractionRules>,
    scope: ScopeRule,
    frontier: Frontier,
    throttle: Throttle,
    document: OutputDocument,
    statistics: CrawlStatistics,
    phase: CrawlPhase,
}

impl<F: Fetch + 'static> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `fetcher` - The transport used for every page
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The scope or extraction rules could not be built
    pub fn new(config: Config, fetcher: F) -> crate::Result<Self> {
        let scope = ScopeRule::from_config(&config.crawler.start_url, &config.scope)?;
        let equality = UrlEquality::from(config.scope.url_equality);
        let rules = ExtractionRules::compile(&config.extraction)?;
        let throttle = Throttle::new(Duration::from_millis(config.crawler.politeness_delay));
        let document = OutputDocument::new(config.output.document_title.clone());

        Ok(Self {
            frontier: Frontier::new(scope.clone(), equality),
            scope,
            fetcher: Arc::new(fetcher),
            rules: Arc::new(rules),
            throttle,
            document,
            statistics: CrawlStatistics::start(),
            phase: CrawlPhase::default(),
            config,
        })
    }

    /// Runs the main crawl loop until the frontier is exhausted or a cap trips
    ///
    /// This is the core crawling logic that:
    /// 1. Seeds the frontier with the start URL
    /// 2. Dispatches dequeued URLs to at most `max-concurrent-fetches` workers
    /// 3. Applies completed pages in dequeue order
    /// 4. Writes the output document
    pub async fn run(mut self) -> crate::Result<CrawlReport> {
        let start_url = self.config.crawler.start_url.clone();
        let max_workers = self.config.crawler.max_concurrent_fetches.max(1) as usize;

        self.frontier.seed(&start_url)?;
        self.statistics = CrawlStatistics::start();
        self.phase = CrawlPhase::Running;

        tracing::info!(
            "Starting crawl at {} (scope: {} on {}, {} worker(s), {:?} between requests)",
            start_url,
            self.config.scope.pattern,
            self.scope.authority(),
            max_workers,
            self.throttle.delay()
        );

        let started = Instant::now();
        let mut workers: JoinSet<(u64, PageOutcome)> = JoinSet::new();
        let mut pending: BTreeMap<u64, PageOutcome> = BTreeMap::new();
        let mut in_flight: BTreeMap<u64, String> = BTreeMap::new();
        let mut next_sequence: u64 = 0;
        let mut next_to_apply: u64 = 0;
        let mut stop: Option<StopReason> = None;

        loop {
            // Fill free worker slots
            while stop.is_none() && workers.len() < max_workers && !self.frontier.is_empty() {
                if let Some(reason) = self.cap_reached(next_sequence, started) {
                    tracing::info!("Safety cap reached ({}), no new pages will be fetched", reason);
                    stop = Some(reason);
                    break;
                }

                let Some(url) = self.frontier.next() else {
                    break;
                };

                let task = PageTask {
                    sequence: next_sequence,
                    extract: self.scope.allows(&url),
                    url,
                };
                next_sequence += 1;

                tracing::debug!("Dispatching #{}: {}", task.sequence, task.url);
                in_flight.insert(task.sequence, task.url.clone());
                self.spawn_worker(&mut workers, task);
            }

            // Nothing in flight and nothing dispatched: the crawl is over
            let Some(joined) = workers.join_next().await else {
                break;
            };

            match joined {
                Ok((sequence, outcome)) => {
                    in_flight.remove(&sequence);
                    pending.insert(sequence, outcome);
                }
                Err(e) => {
                    // Only on abort or runtime shutdown; the sequence is reclaimed below
                    tracing::error!("Worker supervisor failed: {}", e);
                }
            }

            if workers.is_empty() {
                reclaim_lost_pages(&mut in_flight, &mut pending);
            }

            while let Some(outcome) = pending.remove(&next_to_apply) {
                self.apply(outcome, stop.is_none());
                next_to_apply += 1;

                if self.statistics.pages_visited % 10 == 0 {
                    let elapsed = started.elapsed();
                    let rate = self.statistics.pages_visited as f64 / elapsed.as_secs_f64();
                    tracing::info!(
                        "Progress: {} pages visited, {} in frontier, {} sections, {:.2} pages/sec",
                        self.statistics.pages_visited,
                        self.frontier.len(),
                        self.document.len(),
                        rate
                    );
                }
            }
        }

        if let Some(reason) = stop {
            let discarded = self.frontier.drain();
            self.statistics.urls_discarded = discarded as u64;
            self.statistics.stop_reason = reason;
            if discarded > 0 {
                tracing::info!("Discarded {} queued URLs", discarded);
            }
        } else {
            tracing::info!("Frontier is empty, crawl complete");
        }

        self.finish()
    }

    /// Returns the cap that forbids dispatching another page, if any
    fn cap_reached(&self, dispatched: u64, started: Instant) -> Option<StopReason> {
        if let Some(max_pages) = self.config.crawler.max_pages {
            if dispatched >= u64::from(max_pages) {
                return Some(StopReason::PageCap);
            }
        }

        if let Some(max_duration) = self.config.crawler.max_duration {
            if started.elapsed() >= Duration::from_secs(max_duration) {
                return Some(StopReason::TimeCap);
            }
        }

        None
    }

    /// Spawns a worker for one page
    ///
    /// The page is processed in its own task so a panic surfaces as a
    /// `JoinError` here and can be reported against its sequence number.
    fn spawn_worker(&self, workers: &mut JoinSet<(u64, PageOutcome)>, task: PageTask) {
        let fetcher = Arc::clone(&self.fetcher);
        let rules = Arc::clone(&self.rules);
        let throttle = self.throttle.clone();
        let scope = self.scope.clone();

        workers.spawn(async move {
            let sequence = task.sequence;
            let url = task.url.clone();
            let handle =
                tokio::spawn(async move { process_page(fetcher, throttle, rules, scope, task).await });

            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("Worker for {} failed: {}", url, e);
                    PageOutcome::skipped(url, PageState::WorkerFailed)
                }
            };
            (sequence, outcome)
        });
    }

    /// Applies a completed page to the crawl state
    ///
    /// Called strictly in dequeue order. Links are only offered while new
    /// work may still be dispatched.
    fn apply(&mut self, outcome: PageOutcome, accepting: bool) {
        self.statistics.record(outcome.state);

        if let Some(section) = outcome.section {
            self.document.push_section(section);
            self.statistics.sections_written += 1;
        }

        self.statistics.links_discovered += outcome.links.len() as u64;
        if !accepting {
            return;
        }

        let mut enqueued = 0;
        for link in &outcome.links {
            if self.frontier.offer(link) {
                enqueued += 1;
            }
        }
        self.statistics.links_enqueued += enqueued;

        tracing::debug!(
            "Processed {} ({}): {} links, {} new",
            outcome.url,
            outcome.state,
            outcome.links.len(),
            enqueued
        );
    }

    /// Writes the document and produces the report
    fn finish(mut self) -> crate::Result<CrawlReport> {
        self.phase = CrawlPhase::Done;

        let document_path = PathBuf::from(&self.config.output.document_path);
        let bytes = self.document.write_to(&document_path)?;
        self.statistics.document_bytes = bytes as u64;
        self.statistics.finish();

        tracing::info!(
            "Crawl completed: {} pages visited, {} sections written to {} ({} bytes, stop reason: {})",
            self.statistics.pages_visited,
            self.statistics.sections_written,
            document_path.display(),
            bytes,
            self.statistics.stop_reason
        );

        Ok(CrawlReport {
            statistics: self.statistics,
            document_path,
            phase: self.phase,
        })
    }
}

/// Fetches and processes one page
///
/// Failures are logged with the URL and turned into a skip state; they never
/// stop the crawl.
async fn process_page<F: Fetch>(
    fetcher: Arc<F>,
    throttle: Throttle,
    rules: Arc<ExtractionRules>,
    scope: ScopeRule,
    task: PageTask,
) -> PageOutcome {
    throttle.wait_turn().await;

    match fetcher.fetch(&task.url).await {
        Ok(page) => analyze_page(page, &task, &rules, &scope),
        Err(e) => {
            let state = classify_fetch_error(&e);
            tracing::warn!("Skipping {} ({}): {}", task.url, state, e);
            PageOutcome::skipped(task.url, state)
        }
    }
}

/// Parses a fetched page, extracts its record and discovers its links
fn analyze_page(
    page: FetchedPage,
    task: &PageTask,
    rules: &ExtractionRules,
    scope: &ScopeRule,
) -> PageOutcome {
    let url = task.url.clone();

    let current_url = match Url::parse(&url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Skipping {}: invalid URL: {}", url, e);
            return PageOutcome::skipped(url, PageState::ParseFailed);
        }
    };

    let document = match parse_page(&page.body, page.content_type.as_deref()) {
        Ok(document) => document,
        Err(e) => {
            let state = match e {
                ParseError::NotHtml { .. } => PageState::ContentMismatch,
                ParseError::NotUtf8 => PageState::ParseFailed,
            };
            tracing::warn!("Skipping {} ({}): {}", url, state, e);
            return PageOutcome::skipped(url, state);
        }
    };

    let (state, section) = if task.extract {
        let record = extract_record(&document, &url, rules);
        (PageState::Extracted, Some(render_section(&record)))
    } else {
        tracing::debug!("{} is outside the scope pattern, following links only", url);
        (PageState::Traversed, None)
    };

    let links = discover_links(&document, &current_url, scope);

    PageOutcome {
        url,
        state,
        section,
        links,
    }
}

/// Turns every dispatched page that never reported back into a failure
///
/// Must only be called once no worker is running, so anything still in
/// `in_flight` is known to be lost. Returns how many pages were reclaimed.
fn reclaim_lost_pages(
    in_flight: &mut BTreeMap<u64, String>,
    pending: &mut BTreeMap<u64, PageOutcome>,
) -> usize {
    let lost = std::mem::take(in_flight);
    let count = lost.len();
    for (sequence, url) in lost {
        tracing::warn!("Worker for {} never reported back", url);
        pending.insert(sequence, PageOutcome::skipped(url, PageState::WorkerFailed));
    }
    count
}

fn classify_fetch_error(error: &FetchError) -> PageState {
    if error.is_dead_link() {
        PageState::DeadLink
    } else if error.is_unreachable() {
        PageState::Unreachable
    } else if matches!(error, FetchError::Status { .. }) {
        PageState::HttpError
    } else {
        PageState::Unreachable
    }
}
