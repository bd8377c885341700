use crate::config::{MatchMode, ScopeConfig};
use crate::url::domain::extract_authority;
use crate::{UrlError, UrlResult};
use url::Url;

/// Decides whether a URL is eligible for crawling
///
/// A URL is in scope when it lives on the same network location as the
/// start URL AND matches the inclusion pattern. The rule is built once per
/// run and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRule {
    authority: String,
    pattern: String,
    mode: MatchMode,
}

impl ScopeRule {
    /// Builds a scope rule anchored to the host of `start_url`
    pub fn new(start_url: &str, pattern: &str, mode: MatchMode) -> UrlResult<Self> {
        let start = Url::parse(start_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        let authority =
            extract_authority(&start).ok_or_else(|| UrlError::MissingHost(start_url.to_string()))?;

        Ok(Self {
            authority,
            pattern: pattern.to_string(),
            mode,
        })
    }

    /// Builds a scope rule from the `[scope]` configuration section
    pub fn from_config(start_url: &str, config: &ScopeConfig) -> UrlResult<Self> {
        Self::new(start_url, &config.pattern, config.match_mode)
    }

    /// Returns true if the URL string parses and is in scope
    pub fn allows(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.allows_url(&parsed),
            Err(_) => false,
        }
    }

    /// Returns true if the parsed URL is in scope
    pub fn allows_url(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match extract_authority(url) {
            Some(authority) if authority == self.authority => {}
            _ => return false,
        }

        matches_pattern(&self.pattern, self.mode, url)
    }

    /// The `host:port` every in-scope URL shares
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

/// Checks a URL against an inclusion pattern
///
/// In prefix mode a pattern starting with `/` is a path prefix; any other
/// pattern is a prefix of the whole URL string. Contains mode looks for the
/// pattern anywhere in the URL string.
///
/// # Examples
///
/// ```
/// use product_crawler::config::MatchMode;
/// use product_crawler::url::matches_pattern;
/// use url::Url;
///
/// let url = Url::parse("https://shop.example.com/product/widget").unwrap();
/// assert!(matches_pattern("/product/", MatchMode::Prefix, &url));
/// assert!(matches_pattern("https://shop.example.com/product/", MatchMode::Prefix, &url));
/// assert!(matches_pattern("widget", MatchMode::Contains, &url));
/// assert!(!matches_pattern("/category/", MatchMode::Prefix, &url));
/// ```
pub fn matches_pattern(pattern: &str, mode: MatchMode, url: &Url) -> bool {
    match mode {
        MatchMode::Prefix if pattern.starts_with('/') => url.path().starts_with(pattern),
        MatchMode::Prefix => url.as_str().starts_with(pattern),
        MatchMode::Contains => url.as_str().contains(pattern),
    }
}
