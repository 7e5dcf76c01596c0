//! Atomic single-file writes.
//!
//! Contents are written to a hidden sibling temp file, flushed to disk, and
//! renamed over the destination.  Rename within one directory is atomic on
//! every supported platform, so readers see either the old file or the new
//! one, never a truncated mix.
//!
//! The parent directory is created on first use.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Replaces the file at `path` with `contents`.
///
/// # Errors
///
/// Returns the underlying I/O error.  On failure the temp file is removed
/// and the destination is left as it was.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }

    let tmp = temp_path_for(path);
    if let Err(e) = write_and_rename(&tmp, path, contents).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

async fn write_and_rename(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, path).await
}

/// `dir/name.json` → `dir/.name.json.tmp-<uuid>`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_name = format!(".{name}.tmp-{}", Uuid::new_v4().simple());
    path.with_file_name(tmp_name)
}
