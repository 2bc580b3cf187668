//! Utility functions for file operations and path manipulation

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Suffix of in-progress files that have not been published yet
pub const PARTIAL_SUFFIX: &str = ".part";

/// Sibling path used while `dest` is being written
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use thing_archiver::utils::partial_path;
///
/// assert_eq!(
///     partial_path(Path::new("/archive/cube/metadata.json")),
///     Path::new("/archive/cube/metadata.json.part")
/// );
/// ```
#[must_use]
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}

/// Create `dir` and its parents; an existing directory is not an error
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::filesystem(dir, e))
}

/// Write `contents` to `dest` so readers see either the old file or the new one
///
/// The bytes go to a sibling `.part` file which is flushed to disk and then
/// renamed over `dest`. If anything fails the partial file is removed and
/// `dest` is left untouched.
pub async fn write_atomic(dest: &Path, contents: &[u8]) -> Result<()> {
    let temp = partial_path(dest);

    let written = async {
        let mut file = tokio::fs::File::create(&temp).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<_, std::io::Error>(())
    }
    .await;

    if let Err(e) = written {
        discard_partial(&temp).await;
        return Err(Error::filesystem(dest, e));
    }

    publish(&temp, dest).await
}

/// Move a fully written temporary file into its final place
pub async fn publish(temp: &Path, dest: &Path) -> Result<()> {
    if let Err(e) = tokio::fs::rename(temp, dest).await {
        discard_partial(temp).await;
        return Err(Error::filesystem(dest, e));
    }
    Ok(())
}

/// Best-effort removal of a partial file
pub async fn discard_partial(temp: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::debug!(path = %temp.display(), error = %e, "Could not remove partial file");
    }
}

/// Whether something already exists at `path`
///
/// Errors while checking count as "missing" so the caller re-creates it.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Human-readable byte count
///
/// Below 1024 bytes the exact count is shown, below 1 MiB kilobytes, and
/// megabytes above that, both with two decimals.
///
/// # Examples
///
/// ```
/// use thing_archiver::utils::human_size;
///
/// assert_eq!(human_size(512), "512 bytes");
/// assert_eq!(human_size(2048), "2.00 KB");
/// assert_eq!(human_size(5 * 1024 * 1024), "5.00 MB");
/// ```
#[must_use]
pub fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{bytes} bytes")
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}
