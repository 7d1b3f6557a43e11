use url::Url;

/// Resolves an href or src attribute to an absolute HTTP(S) URL
///
/// Returns None if the reference should be ignored:
/// - empty values
/// - javascript:, mailto:, tel:, data: references
/// - fragment-only links
/// - values that do not resolve to an http or https URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use bookshelf_mirror::url::resolve_href;
///
/// let base = Url::parse("https://tululu.org/l55/1").unwrap();
/// let resolved = resolve_href("/b239/", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://tululu.org/b239/");
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
