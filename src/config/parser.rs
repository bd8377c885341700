use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use product_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Scope pattern: {}", config.scope.pattern);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so a produced document can be traced back to the exact
/// configuration that generated it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use crate::config::{DetailRule, DetailsConfig, MatchMode, SelectorStrategy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASE_CONFIG: &str = r#"
[crawler]
start-url = "https://shop.example.com/product/"
politeness-delay = 1000

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[scope]
pattern = "https://shop.example.com/product/"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config_applies_defaults() {
        let file = create_temp_config(BASE_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.start_url, "https://shop.example.com/product/");
        assert_eq!(config.crawler.politeness_delay, 1000);
        assert_eq!(config.crawler.max_concurrent_fetches, 1);
        assert_eq!(config.crawler.request_timeout, 30);
        assert_eq!(config.crawler.max_pages, None);
        assert_eq!(config.scope.match_mode, MatchMode::Prefix);
        assert!(!config.scope.url_equality.ignore_query);
        assert_eq!(
            config.extraction.title,
            vec![SelectorStrategy::Css("h1.product-title".to_string())]
        );
        assert_eq!(config.extraction.details, DetailsConfig::default());
        assert_eq!(config.output.document_path, "product_data.md");
        assert_eq!(config.output.document_title, "Extracted Product Data");
    }

    #[test]
    fn test_load_full_extraction_section() {
        let content = format!(
            r#"{}
match = "contains"

[scope.url-equality]
ignore-query = true

[extraction]
title = ["h1.product-title", {{ selector = "meta[property='og:title']", attribute = "content" }}]
description = ["div.product-description", "div.summary"]

[extraction.details]
mode = "scattered"
rules = [
    {{ tag = "span", attribute = "class", value = "spec" }},
    {{ tag = "td", attribute = "data-spec" }},
]

[output]
document-path = "out.md"
"#,
            BASE_CONFIG
        );
        let file = create_temp_config(&content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scope.match_mode, MatchMode::Contains);
        assert!(config.scope.url_equality.ignore_query);
        assert_eq!(config.extraction.title.len(), 2);
        assert_eq!(
            config.extraction.title[1],
            SelectorStrategy::Attribute {
                selector: "meta[property='og:title']".to_string(),
                attribute: "content".to_string(),
            }
        );
        assert_eq!(config.extraction.description.len(), 2);
        assert_eq!(
            config.extraction.details,
            DetailsConfig::Scattered {
                rules: vec![
                    DetailRule {
                        tag: "span".to_string(),
                        attribute: Some("class".to_string()),
                        value: Some("spec".to_string()),
                    },
                    DetailRule {
                        tag: "td".to_string(),
                        attribute: Some("data-spec".to_string()),
                        value: None,
                    },
                ]
            }
        );
        assert_eq!(config.output.document_path, "out.md");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawler.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_empty_start_url_fails_fast() {
        let content = BASE_CONFIG.replace(
            "start-url = \"https://shop.example.com/product/\"",
            "start-url = \"\"",
        );
        let result = parse_config(&content);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
