//! JSON export of the collected records

use crate::config::JSON_FILE_NAME;
use crate::output::record::BookRecord;
use crate::MirrorError;
use std::path::{Path, PathBuf};

/// Writes all records as one JSON array into `dir/books_data.json`
///
/// The folder is created if needed. The document is written to a temporary
/// sibling first and renamed into place, so an existing file is never left
/// half-written. Non-ASCII text is kept verbatim.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written document
/// * `Err(MirrorError)` - Serialization or filesystem failure
pub async fn export_json(records: &[BookRecord], dir: &Path) -> Result<PathBuf, MirrorError> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(JSON_FILE_NAME);
    let tmp_path = dir.join(format!("{}.tmp", JSON_FILE_NAME));

    let json = serde_json::to_vec_pretty(records)?;
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, &path).await?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}
