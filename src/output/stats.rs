//! Statistics for a finished crawl run

/// Counters collected while a run progresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Listing pages fetched
    pub pages_fetched: u32,

    /// Item URLs collected from listing pages
    pub items_discovered: usize,

    /// Items that produced a record
    pub items_processed: usize,

    /// Items skipped after a network or extraction failure
    pub items_failed: usize,

    /// Cover images written
    pub images_stored: usize,

    /// Book texts written
    pub texts_stored: usize,

    /// Items whose text endpoint had no file
    pub texts_absent: usize,

    /// URLs of the skipped items, in discovery order
    pub failed_items: Vec<String>,
}

impl CrawlStats {
    /// Creates empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of discovered items that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.items_discovered == 0 {
            return 0.0;
        }
        (self.items_processed as f64 / self.items_discovered as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Listing pages fetched: {}", stats.pages_fetched);
    println!("  Items discovered: {}", stats.items_discovered);
    println!("  Items processed: {}", stats.items_processed);
    println!("  Items failed: {}", stats.items_failed);
    println!();

    println!("Payloads:");
    println!("  Images stored: {}", stats.images_stored);
    println!("  Texts stored: {}", stats.texts_stored);
    println!("  Texts not available: {}", stats.texts_absent);
    println!();

    if !stats.failed_items.is_empty() {
        println!("Failed Items ({}):", stats.failed_items.len());
        for url in &stats.failed_items {
            println!("  - {}", url);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} items)",
        stats.success_rate(),
        stats.items_processed,
        stats.items_discovered
    );
}
