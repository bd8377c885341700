//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the outcome recorded for each visited page
//! - `CrawlPhase`: the Running/Done state of the crawl loop

mod page_state;

// Re-export main types
pub use page_state::{CrawlPhase, PageState};
