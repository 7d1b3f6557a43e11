//! Output module for crawl results
//!
//! This module handles:
//! - The `BookRecord` shape written to disk
//! - Exporting the ordered record set as a JSON document
//! - Recording and printing crawl statistics

mod json;
mod record;
pub mod stats;

pub use json::export_json;
pub use record::BookRecord;
pub use stats::{print_statistics, CrawlStats};
