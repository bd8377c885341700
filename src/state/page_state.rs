/// Page outcome definitions for tracking crawl progress
///
/// Every dequeued URL ends in exactly one of these states.
use std::fmt;

/// Represents the final state of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success States =====
    /// Page was fetched, a record was extracted and its links were followed
    Extracted,

    /// Page was fetched for link discovery only (an out-of-scope start URL)
    Traversed,

    // ===== Skip States =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned another non-2xx status
    HttpError,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Response was not an HTML document
    ContentMismatch,

    /// Response body could not be parsed
    ParseFailed,

    /// The worker processing the page stopped unexpectedly
    WorkerFailed,
}

impl PageState {
    /// All states, in reporting order
    pub const ALL: [PageState; 8] = [
        Self::Extracted,
        Self::Traversed,
        Self::DeadLink,
        Self::HttpError,
        Self::Unreachable,
        Self::ContentMismatch,
        Self::ParseFailed,
        Self::WorkerFailed,
    ];

    /// Returns true if the page was fetched and processed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted | Self::Traversed)
    }

    /// Returns true if the page was skipped because of a fetch or parse failure
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Returns a stable snake_case label for logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Traversed => "traversed",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::ParseFailed => "parse_failed",
            Self::WorkerFailed => "worker_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two phases of the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlPhase {
    /// The frontier may still yield URLs or pages are in flight
    #[default]
    Running,
    /// Terminal: nothing left to dispatch and nothing in flight
    Done,
}

impl CrawlPhase {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
