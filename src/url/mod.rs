//! URL handling module for Bookshelf-Mirror
//!
//! This module knows the catalog's URL scheme: where listing pages live,
//! where the text payload endpoint is, and how an item identifier is
//! embedded in a detail-page URL.

mod item_id;
mod resolve;

pub use item_id::item_id;
pub use resolve::resolve_href;

use url::{ParseError, Url};

/// URL builder for one catalog site
///
/// # Examples
///
/// ```
/// use bookshelf_mirror::url::CatalogUrls;
///
/// let urls = CatalogUrls::new("https://tululu.org").unwrap();
/// assert_eq!(urls.listing(55, 3).unwrap().as_str(), "https://tululu.org/l55/3");
/// assert_eq!(
///     urls.text_payload(239).unwrap().as_str(),
///     "https://tululu.org/txt.php?id=239"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CatalogUrls {
    base: Url,
}

impl CatalogUrls {
    /// Creates a URL builder rooted at `base_url`
    ///
    /// The base is reduced to a directory URL (trailing slash, no query or
    /// fragment) so relative joins land under it.
    pub fn new(base_url: &str) -> Result<Self, ParseError> {
        let mut base = Url::parse(base_url)?;
        base.set_query(None);
        base.set_fragment(None);

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// Root URL of the catalog site
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Listing page `page` of category `category_id`
    pub fn listing(&self, category_id: u32, page: u32) -> Result<Url, ParseError> {
        self.base.join(&format!("l{}/{}", category_id, page))
    }

    /// Text payload endpoint for the given item
    pub fn text_payload(&self, item_id: u64) -> Result<Url, ParseError> {
        let mut url = self.base.join("txt.php")?;
        url.query_pairs_mut()
            .append_pair("id", &item_id.to_string());
        Ok(url)
    }
}
