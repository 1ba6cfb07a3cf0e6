use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use spdlog::{debug, error};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// File-system capability used by the publisher.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Makes sure `path` exists as a directory, creating it when missing.
    async fn ensure_directory(&self, path: &Path) -> io::Result<PathBuf>;

    /// Returns true only once `text` is durably stored at `path`.
    async fn write_text(&self, path: &Path, text: &str) -> bool;
}

pub struct LocalFileSystem;

impl LocalFileSystem {
    async fn write_and_sync(path: &Path, text: &str) -> io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(text.as_bytes()).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn ensure_directory(&self, path: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(path).await?;
        Ok(path.to_path_buf())
    }

    async fn write_text(&self, path: &Path, text: &str) -> bool {
        match Self::write_and_sync(path, text).await {
            Ok(()) => {
                debug!("Wrote {} bytes to {}", text.len(), path.display());
                true
            }
            Err(e) => {
                error!("Error writing {}: {}", path.display(), e);
                false
            }
        }
    }
}
