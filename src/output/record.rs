use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One catalog item as written to the JSON document
///
/// `title` and `author` are always non-empty. Missing payloads serialize as
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,

    pub author: String,

    /// Stored cover image (absent if skipped)
    #[serde(rename = "image_src")]
    pub image_path: Option<PathBuf>,

    /// Stored book text (absent if skipped or the item has no text)
    #[serde(rename = "book_path")]
    pub text_path: Option<PathBuf>,

    /// Reader comments in page order
    pub comments: Vec<String>,

    /// Genre names in page order
    pub genres: Vec<String>,
}
