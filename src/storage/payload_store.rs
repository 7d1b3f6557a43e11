//! Filesystem persistence for downloaded payloads

use crate::storage::sanitize::sanitize_filename;
use crate::MirrorError;
use std::fmt;
use std::path::PathBuf;

/// The kinds of payload a catalog item can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Cover image (binary)
    Image,
    /// Full book text
    Text,
}

impl PayloadKind {
    /// Subfolder under the destination root holding this kind of payload
    pub fn subfolder(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Text => "books",
        }
    }

    /// Returns true if a non-200 answer means "this item has no such payload"
    ///
    /// The text endpoint redirects to a placeholder page for books without a
    /// text file. Covers are only requested when the page references one, so
    /// a bad status for an image is a real failure.
    pub fn bad_status_means_absent(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Writes payloads under a destination root, one subfolder per kind
///
/// Subfolders are created lazily on the first write, so a run that skips a
/// payload kind never creates its folder.
#[derive(Debug, Clone)]
pub struct PayloadStore {
    root: PathBuf,
}

impl PayloadStore {
    /// Creates a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder for the given payload kind
    pub fn folder(&self, kind: PayloadKind) -> PathBuf {
        self.root.join(kind.subfolder())
    }

    /// Computes where a payload named `filename` would be stored
    ///
    /// The name is sanitized into a single path component first; the result
    /// is guaranteed to be a direct child of the kind's folder.
    pub fn target_path(&self, kind: PayloadKind, filename: &str) -> Result<PathBuf, MirrorError> {
        let folder = self.folder(kind);
        let path = folder.join(sanitize_filename(filename));

        if path.parent() != Some(folder.as_path()) || !path.starts_with(&self.root) {
            return Err(MirrorError::PathEscape {
                path: path.display().to_string(),
            });
        }

        Ok(path)
    }

    /// Writes `contents` as `filename` in the kind's folder
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the stored file
    /// * `Err(MirrorError)` - The folder or the file could not be written
    pub async fn write(
        &self,
        kind: PayloadKind,
        filename: &str,
        contents: &[u8],
    ) -> Result<PathBuf, MirrorError> {
        let path = self.target_path(kind, filename)?;

        tokio::fs::create_dir_all(self.folder(kind)).await?;
        tokio::fs::write(&path, contents).await?;

        tracing::debug!("Stored {} payload at {}", kind, path.display());
        Ok(path)
    }
}
