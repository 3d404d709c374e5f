//! Dated on-disk backup store.
//!
//! Artifacts are laid out as `<root>/<YYYY-MM-DD>/<address>`, one
//! directory per run date and one extensionless file per device.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, StoreError};

/// Distinguishes temp files of concurrent writes to the same artifact.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Writes configuration artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    /// Create a store rooted at `root`. Nothing is touched until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact for `address` on `date`.
    pub fn artifact_path(&self, date: &str, address: &str) -> PathBuf {
        self.root.join(date).join(address)
    }

    /// Persist `text` as the artifact for `address` on `date`.
    ///
    /// The date directory is created if needed and an existing artifact is
    /// replaced. The content is written to a hidden file next to the
    /// target and renamed into place, so readers never see a partial file.
    /// Concurrent writes to the same artifact each use their own temp file;
    /// the last rename wins.
    pub async fn write(&self, date: &str, address: &str, text: &str) -> Result<PathBuf> {
        let dir = self.root.join(date);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;

        let target = dir.join(address);
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp = dir.join(format!(".{address}.{}.{seq}.tmp", std::process::id()));

        if let Err(e) = write_file(&temp, text).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }
        if let Err(source) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::Io {
                path: target,
                source,
            }
            .into());
        }

        debug!("wrote {} ({} bytes)", target.display(), text.len());
        Ok(target)
    }
}

async fn write_file(path: &Path, text: &str) -> Result<()> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).await.map_err(io_err)?;
    file.write_all(text.as_bytes()).await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;
    Ok(())
}
