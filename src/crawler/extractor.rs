//! Product field extraction and link discovery
//!
//! This module turns one fetched page into:
//! - a `ProductRecord` (title, description, details) using ordered selector
//!   strategies with fixed fallbacks when markup is missing
//! - the list of in-scope links found on the page
//!
//! Nothing here touches crawl state: the same page and rules always produce
//! the same record and the same links.

use crate::config::{DetailRule, DetailsConfig, ExtractionConfig, SelectorStrategy};
use crate::url::{resolve_link, ScopeRule};
use crate::{ConfigError, ConfigResult};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Title used when no title strategy matches
pub const NO_TITLE: &str = "No Title";

/// Description used when no description strategy matches
pub const NO_DESCRIPTION: &str = "No Description Available";

/// Details entry used in list-container mode when nothing is found
pub const NO_SPECIFICATIONS: &str = "No Specifications Provided";

/// Details entry used in scattered mode when nothing is found
pub const NO_DETAILS: &str = "No product details found.";

/// Reasons a fetched body cannot be treated as an HTML page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response body is not valid UTF-8")]
    NotUtf8,

    #[error("expected HTML, got {content_type}")]
    NotHtml { content_type: String },
}

/// Parses a fetched body into an HTML document
///
/// When the server announced a content type it must be HTML. The body must
/// be valid UTF-8; markup errors are tolerated the way browsers tolerate them.
pub fn parse_page(body: &[u8], content_type: Option<&str>) -> Result<Html, ParseError> {
    if let Some(content_type) = content_type {
        let mime = content_type.to_ascii_lowercase();
        if !mime.contains("text/html") && !mime.contains("application/xhtml+xml") {
            return Err(ParseError::NotHtml {
                content_type: content_type.to_string(),
            });
        }
    }

    let text = std::str::from_utf8(body).map_err(|_| ParseError::NotUtf8)?;
    Ok(Html::parse_document(text))
}

/// How the details list is discovered and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLayout {
    /// Items of one container element, rendered as `- item` bullets
    ListContainer,
    /// Every element matching any rule, rendered one per line
    Scattered,
}

impl DetailLayout {
    /// Heading used for the details block of a section
    pub fn label(&self) -> &'static str {
        match self {
            Self::ListContainer => "Specifications",
            Self::Scattered => "Product Details",
        }
    }

    /// Entry substituted when no details are found
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::ListContainer => NO_SPECIFICATIONS,
            Self::Scattered => NO_DETAILS,
        }
    }
}

/// The fields extracted from one product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub source_url: String,
    pub title: String,
    pub description: String,
    /// Collected details, or the single fallback entry
    pub details: Vec<String>,
    /// False when `details` holds the fallback entry
    pub details_found: bool,
    pub layout: DetailLayout,
}

/// A compiled field strategy
#[derive(Debug, Clone)]
struct Strategy {
    selector: Selector,
    attribute: Option<String>,
}

impl Strategy {
    fn compile(strategy: &SelectorStrategy) -> ConfigResult<Self> {
        let selector = parse_selector(strategy.selector())?;
        let attribute = match strategy {
            SelectorStrategy::Css(_) => None,
            SelectorStrategy::Attribute { attribute, .. } => Some(attribute.clone()),
        };
        Ok(Self {
            selector,
            attribute,
        })
    }

    /// Text of the first matching element, if non-empty
    fn evaluate(&self, document: &Html) -> Option<String> {
        let element = document.select(&self.selector).next()?;
        let text = match &self.attribute {
            Some(name) => element.value().attr(name)?.trim().to_string(),
            None => element_text(element),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Clone)]
enum DetailsRule {
    ListContainer { container: Selector, item: Selector },
    Scattered { rules: Vec<Selector> },
}

/// Compiled extraction configuration
///
/// Selectors are parsed once per run; a configuration that compiles here
/// never fails during extraction.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    title: Vec<Strategy>,
    description: Vec<Strategy>,
    details: DetailsRule,
}

impl ExtractionRules {
    /// Compiles every selector of the extraction configuration
    pub fn compile(config: &ExtractionConfig) -> ConfigResult<Self> {
        let title = config
            .title
            .iter()
            .map(Strategy::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let description = config
            .description
            .iter()
            .map(Strategy::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let details = match &config.details {
            DetailsConfig::ListContainer { container, item } => DetailsRule::ListContainer {
                container: parse_selector(container)?,
                item: parse_selector(item)?,
            },
            DetailsConfig::Scattered { rules } => DetailsRule::Scattered {
                rules: rules
                    .iter()
                    .map(|rule| parse_selector(&rule_selector(rule)))
                    .collect::<Result<Vec<_>, _>>()?,
            },
        };

        Ok(Self {
            title,
            description,
            details,
        })
    }

    /// The details mode these rules were compiled for
    pub fn layout(&self) -> DetailLayout {
        match self.details {
            DetailsRule::ListContainer { .. } => DetailLayout::ListContainer,
            DetailsRule::Scattered { .. } => DetailLayout::Scattered,
        }
    }
}

fn parse_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Builds the CSS selector for a tag/attribute rule
///
/// A `class` value matches one class token, like a class lookup would; any
/// other attribute value must match exactly.
fn rule_selector(rule: &DetailRule) -> String {
    match (&rule.attribute, &rule.value) {
        (Some(attribute), Some(value))
            if attribute == "class" && !value.contains(char::is_whitespace) =>
        {
            format!("{}[class~=\"{}\"]", rule.tag, escape_css_string(value))
        }
        (Some(attribute), Some(value)) => {
            format!("{}[{}=\"{}\"]", rule.tag, attribute, escape_css_string(value))
        }
        (Some(attribute), None) => format!("{}[{}]", rule.tag, attribute),
        (None, _) => rule.tag.clone(),
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Collects the visible text of an element
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined with a
/// single space.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty result of the strategies, in order
fn first_match(strategies: &[Strategy], document: &Html) -> Option<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy.evaluate(document))
}

fn collect_details(rule: &DetailsRule, document: &Html) -> Vec<String> {
    match rule {
        DetailsRule::ListContainer { container, item } => document
            .select(container)
            .next()
            .map(|container| {
                container
                    .select(item)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        DetailsRule::Scattered { rules } => rules
            .iter()
            .flat_map(|selector| document.select(selector).map(element_text))
            .filter(|text| !text.is_empty())
            .collect(),
    }
}

/// Extracts a product record from a parsed page
///
/// Missing markup is expected: every field falls back to its fixed sentinel,
/// so a record is always produced.
///
/// # Example
///
/// ```
/// use product_crawler::config::ExtractionConfig;
/// use product_crawler::crawler::{extract_record, ExtractionRules, NO_DESCRIPTION};
/// use scraper::Html;
///
/// let rules = ExtractionRules::compile(&ExtractionConfig::default()).unwrap();
/// let page = Html::parse_document(r#"<h1 class="product-title"> Brush Set </h1>"#);
/// let record = extract_record(&page, "https://shop.example.com/product/brush", &rules);
///
/// assert_eq!(record.title, "Brush Set");
/// assert_eq!(record.description, NO_DESCRIPTION);
/// ```
pub fn extract_record(document: &Html, url: &str, rules: &ExtractionRules) -> ProductRecord {
    let layout = rules.layout();

    let title = first_match(&rules.title, document).unwrap_or_else(|| NO_TITLE.to_string());
    let description =
        first_match(&rules.description, document).unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let collected = collect_details(&rules.details, document);
    let details_found = !collected.is_empty();
    let details = if details_found {
        collected
    } else {
        vec![layout.fallback().to_string()]
    };

    ProductRecord {
        source_url: url.to_string(),
        title,
        description,
        details,
        details_found,
        layout,
    }
}

/// Finds every in-scope link on a page
///
/// Each `<a href>` is resolved against `current_url`; the result keeps the
/// order of first appearance with duplicates removed. Links marked
/// `download` are skipped. The visited set is not consulted here.
pub fn discover_links(document: &Html, current_url: &Url, scope: &ScopeRule) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute_url) = resolve_link(href, current_url) else {
            continue;
        };

        if !scope.allows_url(&absolute_url) {
            continue;
        }

        let absolute = absolute_url.to_string();
        if seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    links
}
