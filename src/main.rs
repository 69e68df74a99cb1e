//! Catalog-Harvester main entry point
//!
//! This is the command-line interface for the Catalog-Harvester page harvester.

use anyhow::Context;
use catalog_harvester::config::{load_config_with_hash, load_identifiers, Config, LoggerConfig};
use catalog_harvester::harvester::run_harvest;
use catalog_harvester::model::document_url;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Harvester: a bounded-concurrency catalogue harvester
///
/// Catalog-Harvester fetches a list of catalogue pages with a browser-like
/// request profile, extracts title, price, availability and image links from
/// each one, and exports the records as JSON, XLSX and CSV.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-concurrency catalogue harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// JSON file with the identifiers to fetch (overrides the config)
    #[arg(long, value_name = "PATH")]
    identifiers: Option<PathBuf>,

    /// Validate config and identifiers and show what would be fetched
    #[arg(long)]
    dry_run: bool,

    /// Skip image link synthesis
    #[arg(long)]
    no_images: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Logging depends on the config, so it is set up once the file is loaded
    setup_logging(&config.logger, cli.verbose, cli.quiet);
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.no_images {
        config.harvester.collect_images = false;
    }

    let identifiers_path = cli
        .identifiers
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.harvester.identifiers_file));
    let identifiers = load_identifiers(&identifiers_path).with_context(|| {
        format!(
            "Failed to load identifiers from {}",
            identifiers_path.display()
        )
    })?;
    tracing::info!(
        count = identifiers.len(),
        "Loaded identifiers from {}",
        identifiers_path.display()
    );

    if cli.dry_run {
        handle_dry_run(&config, &identifiers_path, &identifiers);
        return Ok(());
    }

    handle_harvest(config, &identifiers).await
}

/// Sets up the logging/tracing subscriber from the config and CLI flags
///
/// `-v` and `-q` take precedence over the configured level.
fn setup_logging(logger: &LoggerConfig, verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!("catalog_harvester={},warn", logger.level)),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    if logger.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Handles the --dry-run mode: shows what would be fetched without network I/O
fn handle_dry_run(config: &Config, identifiers_path: &Path, identifiers: &[String]) {
    println!("=== Catalog-Harvester Dry Run ===\n");

    println!("Harvester Configuration:");
    println!("  Base URL: {}", config.harvester.base_url);
    println!("  Concurrency: {}", config.harvester.concurrency);
    println!(
        "  Politeness delay: up to {}ms",
        config.harvester.politeness_delay_ms
    );
    println!(
        "  Request timeout: {}s",
        config.harvester.request_timeout_secs
    );
    if config.harvester.collect_images {
        println!("  Images: from {}", config.harvester.image_base_url);
    } else {
        println!("  Images: disabled");
    }

    println!("\nRequest Profile:");
    println!("  User agent: {}", config.request_profile.user_agent);
    println!("  Headers: {}", config.request_profile.headers.len());
    println!("  Cookies: {}", config.request_profile.cookies.len());

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    println!("  Workbook: {}", config.output.workbook_path);
    println!("  Table: {}", config.output.table_path);
    println!("  Summary: {}", config.output.summary_path);
    println!("  Date suffix: {}", config.output.date_suffix);

    println!(
        "\nIdentifiers ({} from {}):",
        identifiers.len(),
        identifiers_path.display()
    );
    for id in identifiers.iter().take(5) {
        println!("  - {}", document_url(&config.harvester.base_url, id));
    }
    if identifiers.len() > 5 {
        println!("  ... and {} more", identifiers.len() - 5);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would fetch {} pages", identifiers.len());
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, identifiers: &[String]) -> anyhow::Result<()> {
    tracing::info!(
        "Base URL: {}, concurrency: {}",
        config.harvester.base_url,
        config.harvester.concurrency
    );

    let result = run_harvest(config, identifiers)
        .await
        .context("Harvest could not be started")?;

    tracing::info!(
        "Harvest finished: {} of {} pages parsed ({:.2}%)",
        result.succeeded(),
        result.submitted,
        result.success_rate()
    );

    Ok(())
}
