use crate::config::types::{
    Config, CrawlerConfig, DetailsConfig, ExtractionConfig, OutputConfig, ScopeConfig,
    UserAgentConfig,
};
use crate::crawler::ExtractionRules;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
///
/// A configuration that would produce a vacuous or unbounded crawl is
/// rejected here, before any request is made.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_scope_config(&config.scope)?;
    validate_extraction_config(&config.extraction)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.start_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "start_url cannot be empty".to_string(),
        ));
    }

    let start = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    if start.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' has no host",
            config.start_url
        )));
    }

    if config.politeness_delay < 100 {
        return Err(ConfigError::Validation(format!(
            "politeness_delay must be >= 100ms, got {}ms",
            config.politeness_delay
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 32, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_duration == Some(0) {
        return Err(ConfigError::Validation(
            "max_duration must be >= 1 second when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the scope rule
fn validate_scope_config(config: &ScopeConfig) -> ConfigResult<()> {
    if config.pattern.trim().is_empty() {
        return Err(ConfigError::Validation(
            "scope pattern cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction rules by compiling every selector
fn validate_extraction_config(config: &ExtractionConfig) -> ConfigResult<()> {
    if config.title.is_empty() {
        return Err(ConfigError::Validation(
            "at least one title selector is required".to_string(),
        ));
    }

    if config.description.is_empty() {
        return Err(ConfigError::Validation(
            "at least one description selector is required".to_string(),
        ));
    }

    if let DetailsConfig::Scattered { rules } = &config.details {
        if rules.is_empty() {
            return Err(ConfigError::Validation(
                "scattered details mode requires at least one rule".to_string(),
            ));
        }

        for rule in rules {
            if rule.value.is_some() && rule.attribute.is_none() {
                return Err(ConfigError::Validation(format!(
                    "detail rule for <{}> has a value but no attribute",
                    rule.tag
                )));
            }
        }
    }

    ExtractionRules::compile(config).map(|_| ())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.document_path.is_empty() {
        return Err(ConfigError::Validation(
            "document_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> ConfigResult<()> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DetailRule, SelectorStrategy};

    fn crawler_config() -> CrawlerConfig {
        CrawlerConfig {
            start_url: "https://shop.example.com/product/".to_string(),
            politeness_delay: 1000,
            max_concurrent_fetches: 1,
            request_timeout: 30,
            max_pages: None,
            max_duration: None,
        }
    }

    #[test]
    fn test_validate_crawler_config() {
        assert!(validate_crawler_config(&crawler_config()).is_ok());

        let mut config = crawler_config();
        config.start_url = "   ".to_string();
        assert!(matches!(
            validate_crawler_config(&config),
            Err(ConfigError::Validation(_))
        ));

        let mut config = crawler_config();
        config.start_url = "not a url".to_string();
        assert!(matches!(
            validate_crawler_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        let mut config = crawler_config();
        config.start_url = "ftp://shop.example.com/".to_string();
        assert!(validate_crawler_config(&config).is_err());

        let mut config = crawler_config();
        config.politeness_delay = 50;
        assert!(validate_crawler_config(&config).is_err());

        let mut config = crawler_config();
        config.max_concurrent_fetches = 0;
        assert!(validate_crawler_config(&config).is_err());

        let mut config = crawler_config();
        config.max_pages = Some(0);
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_validate_scope_config() {
        let scope = ScopeConfig {
            pattern: String::new(),
            match_mode: Default::default(),
            url_equality: Default::default(),
        };
        assert!(matches!(
            validate_scope_config(&scope),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_extraction_config() {
        assert!(validate_extraction_config(&ExtractionConfig::default()).is_ok());

        let mut config = ExtractionConfig::default();
        config.title.clear();
        assert!(validate_extraction_config(&config).is_err());

        let mut config = ExtractionConfig::default();
        config.description = vec![SelectorStrategy::Css("div[[[".to_string())];
        assert!(matches!(
            validate_extraction_config(&config),
            Err(ConfigError::InvalidSelector(_))
        ));

        let mut config = ExtractionConfig::default();
        config.details = DetailsConfig::Scattered { rules: vec![] };
        assert!(validate_extraction_config(&config).is_err());

        let mut config = ExtractionConfig::default();
        config.details = DetailsConfig::Scattered {
            rules: vec![DetailRule {
                tag: "span".to_string(),
                attribute: None,
                value: Some("spec".to_string()),
            }],
        };
        assert!(validate_extraction_config(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
