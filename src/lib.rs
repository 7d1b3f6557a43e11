//! Bookshelf-Mirror: an offline mirror builder for paginated book catalogs
//!
//! This crate walks the listing pages of a catalog category, extracts per-book
//! metadata (title, author, genres, reader comments), downloads cover images
//! and full text files, and writes the collected records as one JSON document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Bookshelf-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Item task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Refusing to write outside destination root: {path}")]
    PathEscape { path: String },

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

impl MirrorError {
    /// Returns true if this error only invalidates the item being processed
    ///
    /// Network and extraction failures are scoped to one item; everything else
    /// (disk, serialization, internal state) aborts the run.
    pub fn is_item_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Extraction(_))
    }
}

/// Transport-level failures reported by the fetcher
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Connection failure for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    BadStatus { url: String, status: u16 },
}

impl NetworkError {
    /// Returns the HTTP status code if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Structural failures while reading fetched markup
///
/// All variants mean the page does not have the expected shape. They are
/// never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Required element '{selector}' not found")]
    MissingElement { selector: String },

    #[error("Heading '{heading}' has {separators} title/author separators, expected 1")]
    MalformedHeading { heading: String, separators: usize },

    #[error("Cannot derive an item identifier from {url}")]
    MalformedItemUrl { url: String },

    #[error("Pagination label '{label}' is not a page number")]
    InvalidPageLabel { label: String },

    #[error("Cannot resolve '{href}' against {base}")]
    InvalidUrl { href: String, base: String },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Bookshelf-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{run_crawl, Coordinator, CrawlReport};
pub use output::BookRecord;
pub use state::CrawlPhase;
pub use url::CatalogUrls;
