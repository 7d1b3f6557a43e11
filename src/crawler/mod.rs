//! Crawler module for catalog pages and payloads
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without redirect following
//! - HTML extraction of item links, record fields and comments
//! - Payload downloads with per-kind missing semantics
//! - Overall crawl coordination

mod coordinator;
mod downloader;
mod fetcher;
mod parser;

pub use coordinator::{clamp_end_page, run_crawl, Coordinator, CrawlReport};
pub use downloader::{download, image_filename, text_filename, Download};
pub use fetcher::{build_http_client, Fetcher, RawResponse};
pub use parser::{
    extract_comments, last_page_number, list_item_urls, parse_record, split_heading,
    PartialRecord,
};
