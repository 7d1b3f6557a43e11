/// Crawl phase definitions for tracking run progress
///
/// A run moves through the phases strictly in order; the coordinator refuses
/// any other transition.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Determining the listing page range (explicit or discovered)
    ResolvePageRange,

    /// Fetching listing pages and collecting item URLs
    CollectItemUrls,

    /// Fetching item pages, extracting records and downloading payloads
    ProcessItems,

    /// Writing the JSON document
    Export,

    /// Run finished
    Done,
}

impl CrawlPhase {
    /// Returns true if the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the phase that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::ResolvePageRange => Some(Self::CollectItemUrls),
            Self::CollectItemUrls => Some(Self::ProcessItems),
            Self::ProcessItems => Some(Self::Export),
            Self::Export => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Checks if a transition from this phase to another is valid
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResolvePageRange => "resolve_page_range",
            Self::CollectItemUrls => "collect_item_urls",
            Self::ProcessItems => "process_items",
            Self::Export => "export",
            Self::Done => "done",
        }
    }
}

impl Default for CrawlPhase {
    fn default() -> Self {
        Self::ResolvePageRange
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
