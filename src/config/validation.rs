use crate::config::types::{CrawlConfig, CrawlSettings, HttpSettings, SiteSettings};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Largest accepted item concurrency
pub const MAX_CONCURRENCY: u32 = 16;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> ConfigResult<()> {
    validate_page_range(config)?;

    if config.category_id == 0 {
        return Err(ConfigError::Validation(
            "category_id must be >= 1".to_string(),
        ));
    }

    validate_site_settings(&config.settings.site)?;
    validate_http_settings(&config.settings.http)?;
    validate_crawl_settings(&config.settings.crawl)?;
    Ok(())
}

/// Validates the requested listing page range
fn validate_page_range(config: &CrawlConfig) -> ConfigResult<()> {
    if config.start_page < 1 {
        return Err(ConfigError::Validation(format!(
            "start_page must be >= 1, got {}",
            config.start_page
        )));
    }

    if let Some(end_page) = config.end_page {
        if end_page < config.start_page {
            return Err(ConfigError::Validation(format!(
                "end_page ({}) cannot be less than start_page ({})",
                end_page, config.start_page
            )));
        }
    }

    Ok(())
}

/// Validates site settings
fn validate_site_settings(site: &SiteSettings) -> ConfigResult<()> {
    let url = Url::parse(&site.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            site.base_url
        )));
    }

    Ok(())
}

/// Validates HTTP transport settings
fn validate_http_settings(http: &HttpSettings) -> ConfigResult<()> {
    if http.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if http.timeout_secs == 0 || http.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

/// Validates item processing settings
fn validate_crawl_settings(crawl: &CrawlSettings) -> ConfigResult<()> {
    if crawl.concurrency < 1 || crawl.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, crawl.concurrency
        )));
    }

    Ok(())
}
