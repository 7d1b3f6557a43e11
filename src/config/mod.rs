//! Configuration module for Bookshelf-Mirror
//!
//! This module holds the resolved crawl configuration, loads the optional
//! TOML settings file and validates everything before any network activity.
//!
//! # Example
//!
//! ```no_run
//! use bookshelf_mirror::config::{load_settings, validate, CrawlConfig};
//! use std::path::Path;
//!
//! let mut config = CrawlConfig::new(55, "./mirror");
//! config.settings = load_settings(Path::new("mirror.toml")).unwrap();
//! validate(&config).unwrap();
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, CrawlSettings, HttpSettings, Settings, SiteSettings, DEFAULT_CATEGORY_ID,
    JSON_FILE_NAME,
};

// Re-export parser and validation functions
pub use parser::{load_settings, parse_settings};
pub use validation::{validate, MAX_CONCURRENCY};
