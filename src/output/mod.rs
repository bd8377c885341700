//! Output module for the product document and crawl statistics
//!
//! This module handles:
//! - Rendering product records as Markdown sections
//! - Accumulating and writing the output document
//! - Recording crawl statistics

mod markdown;
pub mod stats;

pub use markdown::{render_section, OutputDocument, SECTION_SEPARATOR};
pub use stats::{print_statistics, CrawlStatistics, StopReason};

use thiserror::Error;

/// Errors raised while producing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output document: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;
