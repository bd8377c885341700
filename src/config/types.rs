use serde::Deserialize;

/// Main configuration structure for the product crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub scope: ScopeConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// The single URL the crawl starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Minimum time between consecutive fetches to the target host (milliseconds)
    #[serde(rename = "politeness-delay", default = "default_politeness_delay")]
    pub politeness_delay: u64,

    /// Maximum number of page fetches in flight at once
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Stop dispatching after this many pages have been dequeued
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Stop dispatching once the run has lasted this long (seconds)
    #[serde(rename = "max-duration", default)]
    pub max_duration: Option<u64>,
}

fn default_politeness_delay() -> u64 {
    1000
}

fn default_max_concurrent_fetches() -> u32 {
    1
}

fn default_request_timeout() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Which URLs are eligible for crawling
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeConfig {
    /// Inclusion pattern identifying product pages
    pub pattern: String,

    /// How the pattern is matched against candidate URLs
    #[serde(rename = "match", default)]
    pub match_mode: MatchMode,

    /// Which URL differences are ignored when deduplicating
    #[serde(rename = "url-equality", default)]
    pub url_equality: UrlEqualityConfig,
}

/// Pattern matching mode for the scope inclusion pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// URL starts with the pattern (path prefix when the pattern starts with '/')
    #[default]
    Prefix,
    /// URL contains the pattern anywhere
    Contains,
}

/// URL equality flags; all off means exact-string equality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UrlEqualityConfig {
    #[serde(default)]
    pub ignore_query: bool,
    #[serde(default)]
    pub ignore_trailing_slash: bool,
    #[serde(default)]
    pub ignore_fragment: bool,
}

/// Selector configuration for product field extraction
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Title strategies, tried in order
    #[serde(default = "default_title_strategies")]
    pub title: Vec<SelectorStrategy>,

    /// Description strategies, tried in order
    #[serde(default = "default_description_strategies")]
    pub description: Vec<SelectorStrategy>,

    /// Details/specifications discovery
    #[serde(default)]
    pub details: DetailsConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title: default_title_strategies(),
            description: default_description_strategies(),
            details: DetailsConfig::default(),
        }
    }
}

fn default_title_strategies() -> Vec<SelectorStrategy> {
    vec![SelectorStrategy::Css("h1.product-title".to_string())]
}

fn default_description_strategies() -> Vec<SelectorStrategy> {
    vec![SelectorStrategy::Css("div.product-description".to_string())]
}

/// One way of locating a field value in a page
///
/// In TOML either a bare CSS selector string (element text is used) or a
/// table naming an attribute whose value is used instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SelectorStrategy {
    Css(String),
    Attribute { selector: String, attribute: String },
}

impl SelectorStrategy {
    /// Returns the CSS selector of this strategy
    pub fn selector(&self) -> &str {
        match self {
            Self::Css(selector) => selector,
            Self::Attribute { selector, .. } => selector,
        }
    }
}

/// Details discovery mode and its selector set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DetailsConfig {
    /// One container element whose items are collected
    ListContainer {
        container: String,
        #[serde(default = "default_item_selector")]
        item: String,
    },
    /// Every element matching any of the tag/attribute rules is collected
    Scattered { rules: Vec<DetailRule> },
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self::ListContainer {
            container: "ul.product-specifications".to_string(),
            item: default_item_selector(),
        }
    }
}

fn default_item_selector() -> String {
    "li".to_string()
}

/// A tag plus optional attribute filter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailRule {
    pub tag: String,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the Markdown document written at the end of the run
    #[serde(rename = "document-path", default = "default_document_path")]
    pub document_path: String,

    /// Top-level heading of the document
    #[serde(rename = "document-title", default = "default_document_title")]
    pub document_title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            document_title: default_document_title(),
        }
    }
}

fn default_document_path() -> String {
    "product_data.md".to_string()
}

fn default_document_title() -> String {
    "Extracted Product Data".to_string()
}
