//! Writing rendered messages to the export directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::normalize::unique_path;

/// Writes `bytes` to a fresh file named after `base_name` in `dir`.
///
/// The data is written to a hidden temporary file first and renamed into
/// place, so a file under the final name is always complete. An existing
/// file is never replaced.
///
/// # Errors
///
/// Returns an error if no free name is left or the write fails.
pub async fn write_message(dir: &Path, base_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let target = unique_path(dir, base_name)?;
    let temp = temp_path(&target);

    if let Err(e) = write_file(&temp, bytes).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e);
    }

    // Another writer may have taken the name since it was picked.
    let target = if fs::try_exists(&target).await? {
        unique_path(dir, base_name)?
    } else {
        target
    };

    if let Err(e) = fs::rename(&temp, &target).await {
        let _ = fs::remove_file(&temp).await;
        return Err(Error::Io(e));
    }

    Ok(target)
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.partial"))
}
