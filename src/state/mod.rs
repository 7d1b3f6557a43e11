//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the run-level state machine
//!   (resolve range, collect URLs, process items, export, done)

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
