use crate::config::UrlEqualityConfig;
use crate::{UrlError, UrlResult};
use url::Url;

/// Policy deciding when two resolved URLs name the same page
///
/// With every flag off (the default) two URLs are equal only if their
/// resolved absolute forms are byte-identical: query strings, trailing
/// slashes and case differences all produce distinct pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlEquality {
    /// Drop the query string before comparing
    pub ignore_query: bool,
    /// Treat `/a/` and `/a` as the same page (the root `/` is kept)
    pub ignore_trailing_slash: bool,
    /// Drop the `#fragment` before comparing
    pub ignore_fragment: bool,
}

impl From<UrlEqualityConfig> for UrlEquality {
    fn from(config: UrlEqualityConfig) -> Self {
        Self {
            ignore_query: config.ignore_query,
            ignore_trailing_slash: config.ignore_trailing_slash,
            ignore_fragment: config.ignore_fragment,
        }
    }
}

impl UrlEquality {
    /// Exact-string equality of resolved URLs
    pub fn exact() -> Self {
        Self::default()
    }

    /// Returns true if no part of the URL is ignored
    pub fn is_exact(&self) -> bool {
        !self.ignore_query && !self.ignore_trailing_slash && !self.ignore_fragment
    }

    /// Produces the dedup key for a URL under this policy
    ///
    /// # Examples
    ///
    /// ```
    /// use product_crawler::url::UrlEquality;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://shop.example.com/product/a/?ref=home").unwrap();
    ///
    /// assert_eq!(
    ///     UrlEquality::exact().canonicalize(&url),
    ///     "https://shop.example.com/product/a/?ref=home"
    /// );
    ///
    /// let loose = UrlEquality { ignore_query: true, ignore_trailing_slash: true, ignore_fragment: true };
    /// assert_eq!(loose.canonicalize(&url), "https://shop.example.com/product/a");
    /// ```
    pub fn canonicalize(&self, url: &Url) -> String {
        if self.is_exact() {
            return url.to_string();
        }

        let mut url = url.clone();

        if self.ignore_fragment {
            url.set_fragment(None);
        }

        if self.ignore_query {
            url.set_query(None);
        }

        if self.ignore_trailing_slash {
            let path = url.path();
            if path.len() > 1 && path.ends_with('/') {
                let trimmed = path.trim_end_matches('/');
                let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
                let trimmed = trimmed.to_string();
                url.set_path(&trimmed);
            }
        }

        url.to_string()
    }

    /// Parses a URL string and produces its dedup key
    pub fn canonicalize_str(&self, url: &str) -> UrlResult<String> {
        let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;
        Ok(self.canonicalize(&parsed))
    }
}

/// Resolves a link href against the page it was found on
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - fragment-only links (same page anchors)
/// - unresolvable references
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_exact_keeps_everything() {
        let eq = UrlEquality::exact();
        assert_eq!(
            eq.canonicalize(&parse("https://example.com/product/a/?b=2#top")),
            "https://example.com/product/a/?b=2#top"
        );
    }

    #[test]
    fn test_exact_distinguishes_variants() {
        let eq = UrlEquality::exact();
        let a = eq.canonicalize(&parse("https://example.com/product/a"));
        let b = eq.canonicalize(&parse("https://example.com/product/a/"));
        let c = eq.canonicalize(&parse("https://example.com/product/a?x=1"));
        let d = eq.canonicalize(&parse("https://example.com/product/A"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_ignore_query() {
        let eq = UrlEquality {
            ignore_query: true,
            ..Default::default()
        };
        assert_eq!(
            eq.canonicalize(&parse("https://example.com/product/a?color=red")),
            "https://example.com/product/a"
        );
    }

    #[test]
    fn test_ignore_trailing_slash_keeps_root() {
        let eq = UrlEquality {
            ignore_trailing_slash: true,
            ..Default::default()
        };
        assert_eq!(
            eq.canonicalize(&parse("https://example.com/product/a/")),
            "https://example.com/product/a"
        );
        assert_eq!(
            eq.canonicalize(&parse("https://example.com/")),
            "https://example.com/"
        );
    }

    #[test]
    fn test_ignore_fragment() {
        let eq = UrlEquality {
            ignore_fragment: true,
            ..Default::default()
        };
        assert_eq!(
            eq.canonicalize(&parse("https://example.com/product/a#reviews")),
            "https://example.com/product/a"
        );
    }

    #[test]
    fn test_canonicalize_str_rejects_garbage() {
        let result = UrlEquality::exact().canonicalize_str("not a url");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = parse("https://example.com/product/a");
        assert_eq!(
            resolve_link("b", &base).map(|u| u.to_string()),
            Some("https://example.com/product/b".to_string())
        );
        assert_eq!(
            resolve_link("/about", &base).map(|u| u.to_string()),
            Some("https://example.com/about".to_string())
        );
        assert_eq!(
            resolve_link("../c", &base).map(|u| u.to_string()),
            Some("https://example.com/c".to_string())
        );
    }

    #[test]
    fn test_resolve_skips_special_schemes() {
        let base = parse("https://example.com/product/a");
        assert!(resolve_link("javascript:void(0)", &base).is_none());
        assert!(resolve_link("mailto:sales@example.com", &base).is_none());
        assert!(resolve_link("tel:+1234567890", &base).is_none());
        assert!(resolve_link("data:text/html,<h1>x</h1>", &base).is_none());
        assert!(resolve_link("#reviews", &base).is_none());
        assert!(resolve_link("   ", &base).is_none());
        assert!(resolve_link("ftp://example.com/file", &base).is_none());
    }
}
