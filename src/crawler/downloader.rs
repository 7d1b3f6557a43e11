//! Payload downloads (cover images and book texts)

use crate::crawler::fetcher::Fetcher;
use crate::storage::{PayloadKind, PayloadStore};
use crate::MirrorError;
use std::path::PathBuf;
use url::Url;

/// File name used for a cover whose URL has no usable last segment
const DEFAULT_COVER_NAME: &str = "cover";

/// Outcome of a payload download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// Payload fetched and written to this path
    Stored(PathBuf),

    /// The source has no such payload for this item
    Absent,
}

impl Download {
    /// Stored path, if any
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Stored(path) => Some(path),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Fetches a payload and stores it under the kind's subfolder
///
/// # Missing Payloads
///
/// | Kind | Non-200 answer | Transport failure |
/// |------|----------------|-------------------|
/// | Text | `Ok(Download::Absent)` | `Err(Network)` |
/// | Image | `Err(Network)` | `Err(Network)` |
///
/// Nothing is written (and no folder is created) unless the fetch succeeds.
///
/// # Arguments
///
/// * `fetcher` - The HTTP fetcher
/// * `store` - Destination store
/// * `kind` - Payload kind, selects subfolder and missing semantics
/// * `url` - Payload URL
/// * `filename` - Desired file name (sanitized by the store)
pub async fn download(
    fetcher: &Fetcher,
    store: &PayloadStore,
    kind: PayloadKind,
    url: &Url,
    filename: &str,
) -> Result<Download, MirrorError> {
    let response = match fetcher.fetch(url).await {
        Ok(response) => response,
        Err(e) => match e.status() {
            Some(status) if kind.bad_status_means_absent() => {
                tracing::debug!("No {} payload at {} (HTTP {})", kind, url, status);
                return Ok(Download::Absent);
            }
            _ => return Err(e.into()),
        },
    };

    let path = store.write(kind, filename, &response.body).await?;
    Ok(Download::Stored(path))
}

/// File name for a cover image: the last segment of its URL
pub fn image_filename(image_url: &Url) -> String {
    image_url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or(DEFAULT_COVER_NAME)
        .to_string()
}

/// File name for a book text: `<id>_<title>.txt`
pub fn text_filename(item_id: u64, title: &str) -> String {
    format!("{}_{}.txt", item_id, title)
}
