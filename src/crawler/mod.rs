//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier of URLs to visit and the visited set
//! - HTTP fetching behind the `Fetch` seam
//! - Product extraction and link discovery
//! - Politeness throttling
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod throttle;

pub use coordinator::{Coordinator, CrawlReport};
pub use extractor::{
    discover_links, extract_record, parse_page, DetailLayout, ExtractionRules, ParseError,
    ProductRecord, NO_DESCRIPTION, NO_DETAILS, NO_SPECIFICATIONS, NO_TITLE,
};
pub use fetcher::{
    build_http_client, user_agent_string, Fetch, FetchError, FetchedPage, HttpFetcher,
};
pub use frontier::Frontier;
pub use throttle::{time_until_next_request, Throttle};

use crate::config::Config;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the user agent settings
/// 2. Seed the frontier with the start URL
/// 3. Fetch, extract and follow links until the frontier is exhausted
/// 4. Write the output document
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed and the document was written
/// * `Err(CrawlError)` - Crawl could not start or the document could not be written
pub async fn crawl(config: Config) -> crate::Result<CrawlReport> {
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
    tracing::debug!("HTTP client ready ({}s timeout)", config.crawler.request_timeout);

    Coordinator::new(config, fetcher)?.run().await
}
