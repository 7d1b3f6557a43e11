use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default catalog category (science fiction on tululu.org)
pub const DEFAULT_CATEGORY_ID: u32 = 55;

/// File name of the exported JSON document
pub const JSON_FILE_NAME: &str = "books_data.json";

/// Fully resolved configuration for a single crawl run
///
/// Built once at startup from the command line and an optional settings file,
/// then shared read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// First listing page to visit (1-based)
    pub start_page: u32,

    /// Last listing page to visit; discovered from pagination when absent
    pub end_page: Option<u32>,

    /// Catalog category identifier
    pub category_id: u32,

    /// Root folder for images, books and (by default) the JSON document
    pub dest_folder: PathBuf,

    /// Do not download cover images
    pub skip_images: bool,

    /// Do not download text files
    pub skip_text: bool,

    /// Folder for the JSON document, if different from `dest_folder`
    pub json_path: Option<PathBuf>,

    /// Site and transport settings
    pub settings: Settings,
}

impl CrawlConfig {
    /// Creates a configuration with default settings for the given category
    pub fn new(category_id: u32, dest_folder: impl Into<PathBuf>) -> Self {
        Self {
            start_page: 1,
            end_page: None,
            category_id,
            dest_folder: dest_folder.into(),
            skip_images: false,
            skip_text: false,
            json_path: None,
            settings: Settings::default(),
        }
    }

    /// Folder the JSON document is written into
    pub fn json_dir(&self) -> &Path {
        self.json_path.as_deref().unwrap_or(&self.dest_folder)
    }

    /// Full path of the exported JSON document
    pub fn json_file(&self) -> PathBuf {
        self.json_dir().join(JSON_FILE_NAME)
    }
}

/// Settings loaded from the optional TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub site: SiteSettings,
    pub http: HttpSettings,
    pub crawl: CrawlSettings,
}

/// Catalog site settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Root URL of the catalog site
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://tululu.org/".to_string(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("BookshelfMirror/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Item processing settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Pause after a failed item before moving on (milliseconds)
    #[serde(rename = "failure-backoff-ms")]
    pub failure_backoff_ms: u64,

    /// Maximum number of items processed at the same time
    pub concurrency: u32,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            failure_backoff_ms: 5000,
            concurrency: 1,
        }
    }
}

impl CrawlSettings {
    pub fn failure_backoff(&self) -> Duration {
        Duration::from_millis(self.failure_backoff_ms)
    }
}
