use url::Url;

/// Extracts the network location of a URL as `host:port`
///
/// The port is the explicit one or the scheme's default, so
/// `https://example.com/` and `https://example.com:443/` share a location
/// while `http://127.0.0.1:8080/` and `http://127.0.0.1:9090/` do not.
///
/// # Returns
///
/// * `Some(String)` - The lowercase `host:port`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use product_crawler::url::extract_authority;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com:443".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port_or_known_default() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_default_port() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_authority(&url), Some("example.com:443".to_string()));

        let url = Url::parse("http://example.com/").unwrap();
        assert_eq!(extract_authority(&url), Some("example.com:80".to_string()));
    }

    #[test]
    fn test_explicit_default_port_matches_implicit() {
        let implicit = Url::parse("https://example.com/a").unwrap();
        let explicit = Url::parse("https://example.com:443/b").unwrap();
        assert_eq!(extract_authority(&implicit), extract_authority(&explicit));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("http://127.0.0.1:8080/product/1").unwrap();
        assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
    }

    #[test]
    fn test_subdomain_is_distinct() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(
            extract_authority(&url),
            Some("blog.example.com:443".to_string())
        );
    }

    #[test]
    fn test_no_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(extract_authority(&url), None);
    }
}
