use crate::config::types::Settings;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// Every section and key is optional; anything missing keeps its default.
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded settings
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use bookshelf_mirror::config::load_settings;
///
/// let settings = load_settings(Path::new("mirror.toml")).unwrap();
/// println!("Crawling {}", settings.site.base_url);
/// ```
pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parses settings from TOML text
pub fn parse_settings(content: &str) -> ConfigResult<Settings> {
    let settings: Settings = toml::from_str(content)?;
    Ok(settings)
}
