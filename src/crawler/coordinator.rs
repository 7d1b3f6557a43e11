//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run through its phases:
//! - Resolving the listing page range (explicit or from pagination)
//! - Collecting item URLs from every listing page
//! - Processing items with per-item failure isolation
//! - Exporting the ordered record set

use crate::config::{validate, CrawlConfig};
use crate::crawler::downloader::{download, image_filename, text_filename, Download};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{extract_comments, last_page_number, list_item_urls, parse_record};
use crate::output::{export_json, BookRecord, CrawlStats};
use crate::state::CrawlPhase;
use crate::storage::{PayloadKind, PayloadStore};
use crate::url::{item_id, CatalogUrls};
use crate::MirrorError;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Records in item discovery order
    pub records: Vec<BookRecord>,

    /// Run statistics
    pub stats: CrawlStats,

    /// Listing pages that were crawled
    pub pages: RangeInclusive<u32>,

    /// Path of the exported JSON document
    pub json_file: PathBuf,
}

/// Resolves the effective last page
///
/// A discovered end page smaller than `start_page` is clamped to it, and a
/// category without pagination is a single page.
///
/// # Examples
///
/// ```
/// use bookshelf_mirror::crawler::clamp_end_page;
///
/// assert_eq!(clamp_end_page(1, Some(12)), 12);
/// assert_eq!(clamp_end_page(5, Some(3)), 5);
/// assert_eq!(clamp_end_page(2, None), 2);
/// ```
pub fn clamp_end_page(start_page: u32, discovered: Option<u32>) -> u32 {
    discovered.map_or(start_page, |end| end.max(start_page))
}

/// Shared, read-only pieces needed to process one item
#[derive(Debug, Clone)]
struct ItemContext {
    fetcher: Fetcher,
    store: PayloadStore,
    urls: CatalogUrls,
    skip_images: bool,
    skip_text: bool,
}

/// A record plus what happened to its payloads
struct ProcessedItem {
    record: BookRecord,
    text_absent: bool,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlConfig,
    ctx: ItemContext,
    phase: CrawlPhase,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration and builds the HTTP client. No network
    /// activity happens here.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MirrorError)` - Invalid configuration or client setup failure
    pub fn new(config: CrawlConfig) -> Result<Self, MirrorError> {
        validate(&config)?;

        let urls = CatalogUrls::new(&config.settings.site.base_url)?;
        let fetcher = Fetcher::new(&config.settings.http)?;
        let store = PayloadStore::new(&config.dest_folder);

        let ctx = ItemContext {
            fetcher,
            store,
            urls,
            skip_images: config.skip_images,
            skip_text: config.skip_text,
        };

        Ok(Self {
            config,
            ctx,
            phase: CrawlPhase::default(),
            stats: CrawlStats::new(),
        })
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Statistics collected so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    fn advance(&mut self, to: CrawlPhase) -> Result<(), MirrorError> {
        if !self.phase.can_transition_to(to) {
            return Err(MirrorError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::debug!("Phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Runs the whole crawl
    ///
    /// Listing-page failures abort the run; item failures are logged and
    /// skipped. The JSON document is only written when every phase before it
    /// completed. A finished coordinator cannot be run again.
    pub async fn run(&mut self) -> Result<CrawlReport, MirrorError> {
        if self.phase.is_terminal() {
            return Err(MirrorError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::default(),
            });
        }

        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of category {} from {}",
            self.config.category_id,
            self.ctx.urls.base()
        );

        let (pages, first_page) = self.resolve_page_range().await?;

        self.advance(CrawlPhase::CollectItemUrls)?;
        let item_urls = self.collect_item_urls(pages.clone(), first_page).await?;

        self.advance(CrawlPhase::ProcessItems)?;
        let records = self.process_items(item_urls).await?;

        self.advance(CrawlPhase::Export)?;
        let json_file = export_json(&records, self.config.json_dir()).await?;

        self.advance(CrawlPhase::Done)?;
        tracing::info!(
            "Crawl completed: {} of {} items in {:?}",
            self.stats.items_processed,
            self.stats.items_discovered,
            start_time.elapsed()
        );

        Ok(CrawlReport {
            records,
            stats: self.stats.clone(),
            pages,
            json_file,
        })
    }

    /// Determines the page range, fetching the start page if needed
    ///
    /// Returns the start page markup when it was fetched, so collection does
    /// not request it twice.
    async fn resolve_page_range(
        &mut self,
    ) -> Result<(RangeInclusive<u32>, Option<String>), MirrorError> {
        let start_page = self.config.start_page;

        if let Some(end_page) = self.config.end_page {
            tracing::info!("Using explicit page range {}..={}", start_page, end_page);
            return Ok((start_page..=end_page, None));
        }

        let url = self.ctx.urls.listing(self.config.category_id, start_page)?;
        let html = self.ctx.fetcher.fetch(&url).await?.text();
        self.stats.pages_fetched += 1;

        let discovered = last_page_number(&html)?;
        let end_page = clamp_end_page(start_page, discovered);
        tracing::info!(
            "Discovered last page {:?}, crawling pages {}..={}",
            discovered,
            start_page,
            end_page
        );

        Ok((start_page..=end_page, Some(html)))
    }

    /// Fetches every listing page in range and collects item URLs in order
    async fn collect_item_urls(
        &mut self,
        pages: RangeInclusive<u32>,
        mut first_page: Option<String>,
    ) -> Result<Vec<Url>, MirrorError> {
        let start_page = *pages.start();
        let total_pages = pages.end() - pages.start() + 1;
        let mut item_urls = Vec::new();

        for (index, page) in pages.enumerate() {
            let url = self.ctx.urls.listing(self.config.category_id, page)?;

            let html = match first_page.take().filter(|_| page == start_page) {
                Some(html) => html,
                None => {
                    let html = self.ctx.fetcher.fetch(&url).await?.text();
                    self.stats.pages_fetched += 1;
                    html
                }
            };

            let found = list_item_urls(&html, &url)?;
            tracing::info!(
                "Listing page {} ({}/{}): {} items",
                page,
                index + 1,
                total_pages,
                found.len()
            );
            item_urls.extend(found);
        }

        self.stats.items_discovered = item_urls.len();
        Ok(item_urls)
    }

    /// Processes all items, keeping at most `concurrency` in flight
    ///
    /// Records come back in discovery order whatever the completion order.
    async fn process_items(&mut self, item_urls: Vec<Url>) -> Result<Vec<BookRecord>, MirrorError> {
        let total = item_urls.len();
        let concurrency = self.config.settings.crawl.concurrency.max(1) as usize;
        let backoff = self.config.settings.crawl.failure_backoff();

        let mut slots: Vec<Option<BookRecord>> = vec![None; total];
        let mut failed: Vec<(usize, String)> = Vec::new();
        let mut pending = item_urls.into_iter().enumerate();
        let mut tasks = JoinSet::new();
        let mut completed = 0;

        loop {
            while tasks.len() < concurrency {
                let Some((index, url)) = pending.next() else {
                    break;
                };

                let ctx = self.ctx.clone();
                tasks.spawn(async move {
                    let result = process_item(&ctx, &url).await;
                    if let Err(e) = &result {
                        if e.is_item_recoverable() {
                            tracing::warn!("Skipping item {}: {}", url, e);
                            tokio::time::sleep(backoff).await;
                        }
                    }
                    (index, url, result)
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            let (index, url, result) = joined?;
            completed += 1;

            match result {
                Ok(item) => {
                    tracing::info!(
                        "[{}/{}] Downloaded book: {} by {}",
                        completed,
                        total,
                        item.record.title,
                        item.record.author
                    );

                    self.stats.items_processed += 1;
                    if item.record.image_path.is_some() {
                        self.stats.images_stored += 1;
                    }
                    if item.record.text_path.is_some() {
                        self.stats.texts_stored += 1;
                    }
                    if item.text_absent {
                        self.stats.texts_absent += 1;
                    }
                    slots[index] = Some(item.record);
                }
                Err(e) if e.is_item_recoverable() => {
                    self.stats.items_failed += 1;
                    failed.push((index, url.to_string()));
                }
                Err(e) => {
                    tracing::error!("Aborting run while processing {}: {}", url, e);
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        failed.sort_unstable_by_key(|(index, _)| *index);
        self.stats.failed_items = failed.into_iter().map(|(_, url)| url).collect();

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Produces the record for one item
///
/// Order: derive id, fetch detail page, parse record, download cover,
/// download text, read comments. The first failure ends the item.
async fn process_item(ctx: &ItemContext, url: &Url) -> Result<ProcessedItem, MirrorError> {
    let id = item_id(url)?;
    let html = ctx.fetcher.fetch(url).await?.text();
    let partial = parse_record(&html, url)?;

    let image_path = if ctx.skip_images {
        None
    } else {
        let image_url = partial.require_image_url()?;
        download(
            &ctx.fetcher,
            &ctx.store,
            PayloadKind::Image,
            image_url,
            &image_filename(image_url),
        )
        .await?
        .into_path()
    };

    let text = if ctx.skip_text {
        None
    } else {
        let text_url = ctx.urls.text_payload(id)?;
        Some(
            download(
                &ctx.fetcher,
                &ctx.store,
                PayloadKind::Text,
                &text_url,
                &text_filename(id, &partial.title),
            )
            .await?,
        )
    };
    let text_absent = text.as_ref().is_some_and(Download::is_absent);

    let comments = extract_comments(&html)?;

    Ok(ProcessedItem {
        record: BookRecord {
            title: partial.title,
            author: partial.author,
            image_path,
            text_path: text.and_then(Download::into_path),
            comments,
            genres: partial.genres,
        },
        text_absent,
    })
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use bookshelf_mirror::config::CrawlConfig;
/// use bookshelf_mirror::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new(55, "./mirror");
/// let report = run_crawl(config).await?;
/// println!("{} books", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlReport, MirrorError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
