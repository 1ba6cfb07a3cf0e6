use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// `root/yyyy/MM/dd`, the directory holding every artifact published on that day.
pub fn date_dir(root: &Path, date: &NaiveDateTime) -> PathBuf {
    root.join(date.format("%Y").to_string())
        .join(date.format("%m").to_string())
        .join(date.format("%d").to_string())
}

/// `root/yyyy/MM/dd/slug.extension`. The slug is used as is.
pub fn derive_path(root: &Path, date: &NaiveDateTime, slug: &str, extension: &str) -> PathBuf {
    date_dir(root, date).join(format!("{}.{}", slug, extension))
}
