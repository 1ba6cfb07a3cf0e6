use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use spdlog::{error, info};

use crate::error::{ArtifactKind, PublishError, Result};
use crate::publish::path_deriver::{date_dir, derive_path};
use crate::storage::FileSystem;

pub struct ArtifactWriter {
    fs: Arc<dyn FileSystem>,
}

impl ArtifactWriter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Writes `text` once to `root/yyyy/MM/dd/slug.<kind extension>`.
    /// Nothing is retried and nothing is cleaned up when the write fails.
    pub async fn publish_text(
        &self,
        root: &Path,
        date: &NaiveDateTime,
        slug: &str,
        kind: ArtifactKind,
        text: &str,
    ) -> Result<PathBuf> {
        if slug.trim().is_empty() {
            return Err(PublishError::invalid_argument(format!("slug is required to publish {}", kind)));
        }

        let path = derive_path(root, date, slug, kind.extension());

        let dir = date_dir(root, date);
        if let Err(e) = self.fs.ensure_directory(&dir).await {
            error!("Error creating directory {} for {}: {}", dir.display(), kind, e);
            return Err(PublishError::PublishFailed { path, kind });
        }

        if !self.fs.write_text(&path, text).await {
            return Err(PublishError::PublishFailed { path, kind });
        }

        info!("Published {} to {}", kind, path.display());
        Ok(path)
    }
}
