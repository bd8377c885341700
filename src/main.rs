//! Product Crawler main entry point
//!
//! This is the command-line interface for the breadth-first product crawler.

use anyhow::Context;
use clap::Parser;
use product_crawler::config::{load_config_with_hash, Config, DetailsConfig, SelectorStrategy};
use product_crawler::crawler::crawl;
use product_crawler::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Product Crawler: a breadth-first product page harvester
///
/// Product Crawler walks every page under one URL prefix of a single host,
/// extracts product titles, descriptions and specifications, and writes them
/// into one Markdown document.
#[derive(Parser, Debug)]
#[command(name = "product-crawler")]
#[command(version)]
#[command(about = "A breadth-first product page harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Write the document here instead of the configured document path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(output) = cli.output {
        config.output.document_path = output.to_string_lossy().into_owned();
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_crawler=info,warn"),
            1 => EnvFilter::new("product_crawler=debug,info"),
            2 => EnvFilter::new("product_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Product Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    match config.crawler.max_pages {
        Some(max_pages) => println!("  Max pages: {}", max_pages),
        None => println!("  Max pages: unlimited"),
    }
    match config.crawler.max_duration {
        Some(max_duration) => println!("  Max duration: {}s", max_duration),
        None => println!("  Max duration: unlimited"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nScope:");
    println!("  Pattern: {} ({:?})", config.scope.pattern, config.scope.match_mode);
    let equality = &config.scope.url_equality;
    println!(
        "  URL equality: ignore query={}, ignore trailing slash={}, ignore fragment={}",
        equality.ignore_query, equality.ignore_trailing_slash, equality.ignore_fragment
    );

    println!("\nExtraction:");
    println!("  Title: {}", describe_strategies(&config.extraction.title));
    println!(
        "  Description: {}",
        describe_strategies(&config.extraction.description)
    );
    match &config.extraction.details {
        DetailsConfig::ListContainer { container, item } => {
            println!("  Details: list container {} (items: {})", container, item);
        }
        DetailsConfig::Scattered { rules } => {
            println!("  Details: scattered ({} rules)", rules.len());
            for rule in rules {
                match (&rule.attribute, &rule.value) {
                    (Some(attribute), Some(value)) => {
                        println!("    * <{} {}=\"{}\">", rule.tag, attribute, value)
                    }
                    (Some(attribute), None) => println!("    * <{} {}>", rule.tag, attribute),
                    (None, _) => println!("    * <{}>", rule.tag),
                }
            }
        }
    }

    println!("\nOutput:");
    println!("  Document: {}", config.output.document_path);
    println!("  Title: {}", config.output.document_title);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.crawler.start_url);
}

fn describe_strategies(strategies: &[SelectorStrategy]) -> String {
    strategies
        .iter()
        .map(|strategy| match strategy {
            SelectorStrategy::Css(selector) => selector.clone(),
            SelectorStrategy::Attribute {
                selector,
                attribute,
            } => format!("{} @{}", selector, attribute),
        })
        .collect::<Vec<_>>()
        .join(", then ")
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} into {}",
        config.crawler.start_url,
        config.output.document_path
    );

    match crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed successfully, document written to {}",
                report.document_path.display()
            );
            print_statistics(&report.statistics);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
