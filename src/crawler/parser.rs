//! HTML extraction for catalog pages
//!
//! This module reads already-fetched markup and pulls out:
//! - Item detail-page URLs from a listing page
//! - The highest page number from a listing page's pagination control
//! - Title, author, cover URL and genres from an item detail page
//! - Reader comments from an item detail page
//!
//! Nothing here performs I/O.

use crate::url::resolve_href;
use crate::{ExtractionError, ExtractionResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One listing row per catalog item
const LISTING_ROW: &str = "table.d_book";
/// Item anchor inside a listing row
const LISTING_ITEM_LINK: &str = "div.bookimage a[href]";
/// Page-number links of the pagination control
const PAGINATION_LABEL: &str = "a.npage";
/// Detail-page heading holding "<title> :: <author>"
const HEADING: &str = "h1";
/// Cover image on a detail page
const COVER_IMAGE: &str = "div.bookimage img[src]";
/// Genre links on a detail page
const GENRE_LINK: &str = "span.d_book a";
/// Comment bodies on a detail page
const COMMENT_BODY: &str = "div.texts span.black";

/// Token separating title and author in the heading
///
/// Seen as `Title :: Author` and as `Title\u{a0}::\u{a0}Author`. The padding
/// around the token is any run of Unicode whitespace, which includes
/// non-breaking spaces.
const TITLE_AUTHOR_SEPARATOR: &str = "::";

/// Fields extracted from an item detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    /// Book title
    pub title: String,

    /// Book author
    pub author: String,

    /// Absolute cover image URL, if the page has one
    pub image_url: Option<Url>,

    /// Why a cover present on the page has no usable URL
    pub image_error: Option<ExtractionError>,

    /// Genre names in page order
    pub genres: Vec<String>,
}

impl PartialRecord {
    /// Cover image URL, required when covers are being downloaded
    pub fn require_image_url(&self) -> ExtractionResult<&Url> {
        match (&self.image_url, &self.image_error) {
            (Some(url), _) => Ok(url),
            (None, Some(err)) => Err(err.clone()),
            (None, None) => Err(ExtractionError::MissingElement {
                selector: COVER_IMAGE.to_string(),
            }),
        }
    }
}

fn selector(css: &str) -> ExtractionResult<Selector> {
    Selector::parse(css).map_err(|_| ExtractionError::InvalidSelector(css.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the item detail-page URLs of a listing page, top to bottom
///
/// A page without item rows yields an empty list. Rows without an item
/// anchor are skipped with a warning.
///
/// # Example
///
/// ```
/// use bookshelf_mirror::crawler::list_item_urls;
/// use url::Url;
///
/// let html = r#"<table class="d_book"><tr><td>
///     <div class="bookimage"><a href="/b239/"><img src="/shots/239.jpg"></a></div>
/// </td></tr></table>"#;
/// let base = Url::parse("https://tululu.org/l55/1").unwrap();
/// let urls = list_item_urls(html, &base).unwrap();
/// assert_eq!(urls[0].as_str(), "https://tululu.org/b239/");
/// ```
pub fn list_item_urls(html: &str, base_url: &Url) -> ExtractionResult<Vec<Url>> {
    let document = Html::parse_document(html);
    let row_selector = selector(LISTING_ROW)?;
    let link_selector = selector(LISTING_ITEM_LINK)?;

    let mut urls = Vec::new();
    for row in document.select(&row_selector) {
        let href = row
            .select(&link_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"));

        match href.and_then(|href| resolve_href(href, base_url)) {
            Some(url) => urls.push(url),
            None => tracing::warn!("Listing row without item link on {}", base_url),
        }
    }

    Ok(urls)
}

/// Reads the highest page number from the pagination control
///
/// # Returns
///
/// * `Ok(Some(n))` - The last pagination label
/// * `Ok(None)` - The page has no pagination control (single-page category)
/// * `Err(ExtractionError::InvalidPageLabel)` - The last label is not a number
pub fn last_page_number(html: &str) -> ExtractionResult<Option<u32>> {
    let document = Html::parse_document(html);
    let label_selector = selector(PAGINATION_LABEL)?;

    let Some(last) = document.select(&label_selector).last() else {
        return Ok(None);
    };

    let label = element_text(last);
    label
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ExtractionError::InvalidPageLabel { label })
}

/// Extracts the record fields from an item detail page
///
/// # Arguments
///
/// * `html` - The detail-page markup
/// * `item_url` - The detail-page URL, used to resolve the cover image
///
/// # Returns
///
/// * `Ok(PartialRecord)` - Title and author split, cover and genres read
/// * `Err(ExtractionError)` - The heading is missing or malformed
pub fn parse_record(html: &str, item_url: &Url) -> ExtractionResult<PartialRecord> {
    let document = Html::parse_document(html);

    let heading_selector = selector(HEADING)?;
    let heading = document
        .select(&heading_selector)
        .next()
        .map(|h| h.text().collect::<String>())
        .ok_or_else(|| ExtractionError::MissingElement {
            selector: HEADING.to_string(),
        })?;
    let (title, author) = split_heading(&heading)?;

    let cover_selector = selector(COVER_IMAGE)?;
    let cover_src = document
        .select(&cover_selector)
        .next()
        .and_then(|img| img.value().attr("src"));

    let (image_url, image_error) = match cover_src {
        None => (None, None),
        Some(src) => match resolve_href(src, item_url) {
            Some(url) => (Some(url), None),
            None => (
                None,
                Some(ExtractionError::InvalidUrl {
                    href: src.to_string(),
                    base: item_url.to_string(),
                }),
            ),
        },
    };

    let genre_selector = selector(GENRE_LINK)?;
    let genres = document.select(&genre_selector).map(element_text).collect();

    Ok(PartialRecord {
        title,
        author,
        image_url,
        image_error,
        genres,
    })
}

/// Returns the reader comments of an item detail page, in page order
///
/// A page without comments yields an empty list. Every matched body is
/// kept, even one with no text, so the count matches the page.
pub fn extract_comments(html: &str) -> ExtractionResult<Vec<String>> {
    let document = Html::parse_document(html);
    let comment_selector = selector(COMMENT_BODY)?;

    Ok(document.select(&comment_selector).map(element_text).collect())
}

/// Splits a `"<title> :: <author>"` heading into its two parts
///
/// The heading must contain the separator exactly once and both sides must
/// be non-empty after trimming.
///
/// # Examples
///
/// ```
/// use bookshelf_mirror::crawler::split_heading;
///
/// let (title, author) = split_heading("Алиса в стране чудес \u{a0}::\u{a0} Кэрролл Льюис").unwrap();
/// assert_eq!(title, "Алиса в стране чудес");
/// assert_eq!(author, "Кэрролл Льюис");
/// ```
pub fn split_heading(heading: &str) -> ExtractionResult<(String, String)> {
    let malformed = |separators| ExtractionError::MalformedHeading {
        heading: heading.trim().to_string(),
        separators,
    };

    let separators = heading.matches(TITLE_AUTHOR_SEPARATOR).count();
    if separators != 1 {
        return Err(malformed(separators));
    }

    let (title, author) = heading
        .split_once(TITLE_AUTHOR_SEPARATOR)
        .ok_or_else(|| malformed(separators))?;
    let (title, author) = (title.trim(), author.trim());

    if title.is_empty() || author.is_empty() {
        return Err(malformed(separators));
    }

    Ok((title.to_string(), author.to_string()))
}
