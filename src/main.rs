//! Bookshelf-Mirror main entry point
//!
//! This is the command-line interface for the catalog mirror builder.

use anyhow::Context;
use bookshelf_mirror::config::{load_settings, validate, CrawlConfig, DEFAULT_CATEGORY_ID};
use bookshelf_mirror::crawler::Coordinator;
use bookshelf_mirror::output::print_statistics;
use bookshelf_mirror::CatalogUrls;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bookshelf-Mirror: an offline mirror builder for book catalogs
///
/// Downloads book metadata, covers and texts from one catalog category and
/// writes the records to books_data.json.
#[derive(Parser, Debug)]
#[command(name = "bookshelf-mirror")]
#[command(version)]
#[command(about = "Mirror a paginated book catalog category", long_about = None)]
struct Cli {
    /// First listing page to download
    #[arg(long, alias = "start_page", default_value_t = 1)]
    start_page: u32,

    /// Last listing page to download (discovered from pagination if omitted)
    #[arg(long, alias = "end_page")]
    end_page: Option<u32>,

    /// Catalog category identifier
    #[arg(long, alias = "category_id", default_value_t = DEFAULT_CATEGORY_ID)]
    category_id: u32,

    /// Folder for images, books and the JSON document
    #[arg(long, alias = "dest_folder", default_value = ".")]
    dest_folder: PathBuf,

    /// Do not download cover images
    #[arg(long, visible_alias = "skip-imgs", alias = "skip_imgs")]
    skip_images: bool,

    /// Do not download book texts
    #[arg(long, visible_alias = "skip-txt", alias = "skip_txt")]
    skip_text: bool,

    /// Folder for books_data.json (defaults to the destination folder)
    #[arg(long, alias = "json_path")]
    json_path: Option<PathBuf>,

    /// Optional TOML file with site, HTTP and crawl settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Usage errors must surface before any network activity
    if let Err(e) = validate(&config) {
        usage_error(e).exit();
    }

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookshelf_mirror=info,warn"),
            1 => EnvFilter::new("bookshelf_mirror=debug,info"),
            2 => EnvFilter::new("bookshelf_mirror=trace,debug"),
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

/// Combines command-line flags and the optional settings file
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = CrawlConfig::new(cli.category_id, cli.dest_folder.clone());
    config.start_page = cli.start_page;
    config.end_page = cli.end_page;
    config.skip_images = cli.skip_images;
    config.skip_text = cli.skip_text;
    config.json_path = cli.json_path.clone();

    if let Some(path) = &cli.config {
        tracing::info!("Loading settings from: {}", path.display());
        config.settings = load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    }

    Ok(config)
}

/// Wraps a configuration error as a clap usage error (exit code 2)
fn usage_error(error: impl std::fmt::Display) -> clap::Error {
    Cli::command().error(ErrorKind::ValueValidation, error)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &CrawlConfig) -> anyhow::Result<()> {
    let urls = CatalogUrls::new(&config.settings.site.base_url)?;

    println!("=== Bookshelf-Mirror Dry Run ===\n");

    println!("Catalog:");
    println!("  Site: {}", urls.base());
    println!("  Category: {}", config.category_id);
    println!(
        "  First listing page: {}",
        urls.listing(config.category_id, config.start_page)?
    );
    match config.end_page {
        Some(end_page) => println!("  Pages: {}..={}", config.start_page, end_page),
        None => println!("  Pages: {}..=(discovered)", config.start_page),
    }

    println!("\nOutput:");
    println!("  Destination: {}", config.dest_folder.display());
    println!("  Images: {}", if config.skip_images { "skipped" } else { "images/" });
    println!("  Texts: {}", if config.skip_text { "skipped" } else { "books/" });
    println!("  JSON: {}", config.json_file().display());

    println!("\nHTTP:");
    println!("  User agent: {}", config.settings.http.user_agent);
    println!(
        "  Timeouts: {}s total, {}s connect",
        config.settings.http.timeout_secs, config.settings.http.connect_timeout_secs
    );
    println!(
        "  Concurrency: {}, failure backoff: {}ms",
        config.settings.crawl.concurrency, config.settings.crawl.failure_backoff_ms
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig, quiet: bool) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config).context("Failed to initialize crawler")?;

    // An interrupt drops the run future, discarding partial results
    let result = tokio::select! {
        result = coordinator.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, no output written");
            std::process::exit(130);
        }
    };

    match result {
        Ok(report) => {
            tracing::info!("Records written to {}", report.json_file.display());
            if !quiet {
                print_statistics(&report.stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("Crawl aborted")
        }
    }
}
