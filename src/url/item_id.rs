use crate::ExtractionError;
use url::Url;

/// Extracts the numeric item identifier from a detail-page URL
///
/// Detail pages are addressed as `/<letter><digits>/` (for example
/// `/b239/`). The identifier is the last non-empty path segment with its
/// one-letter prefix removed.
///
/// # Arguments
///
/// * `url` - The item detail-page URL
///
/// # Returns
///
/// * `Ok(u64)` - The item identifier
/// * `Err(ExtractionError::MalformedItemUrl)` - The URL does not carry one
///
/// # Examples
///
/// ```
/// use url::Url;
/// use bookshelf_mirror::url::item_id;
///
/// let url = Url::parse("https://tululu.org/b239/").unwrap();
/// assert_eq!(item_id(&url).unwrap(), 239);
/// ```
pub fn item_id(url: &Url) -> Result<u64, ExtractionError> {
    let malformed = || ExtractionError::MalformedItemUrl {
        url: url.to_string(),
    };

    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(malformed)?;

    let mut chars = segment.chars();
    match chars.next() {
        Some(prefix) if prefix.is_ascii_alphabetic() => {}
        _ => return Err(malformed()),
    }

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    digits.parse().map_err(|_| malformed())
}
