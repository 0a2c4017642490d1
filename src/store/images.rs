// src/store/images.rs

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use tokio::{fs, io::AsyncWriteExt};

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("image store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Question images kept as plain files under one directory.
///
/// Stored names are always the output of [`secure_filename`], optionally with a
/// short random suffix, so they never contain a path separator.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes `bytes` under a sanitized version of `original_name` and returns
    /// the name it was stored as.
    ///
    /// If the name is taken, a short uuid suffix is appended to the stem.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, ImageStoreError> {
        let base = secure_filename(original_name);
        let mut candidate = base.clone();

        loop {
            let path = self.root.join(&candidate);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    tracing::info!("Stored image '{}' ({} bytes)", candidate, bytes.len());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = with_suffix(&base, &short_id());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Removes a stored image. A missing file is not an error.
    pub async fn delete(&self, name: &str) -> Result<(), ImageStoreError> {
        let Some(path) = self.path_of(name) else {
            tracing::warn!("Refusing to delete image with unsafe name '{}'", name);
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted image '{}'", name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Image '{}' was already gone", name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Location of a stored image, or `None` if `name` could not have been
    /// produced by [`ImageStore::save`].
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || secure_filename(name) != name {
            return None;
        }
        Some(self.root.join(name))
    }
}

/// Reduces an uploaded file name to something safe to use inside the upload
/// directory: path separators and whitespace become `_`, every character
/// outside `[A-Za-z0-9_.-]` is dropped (accented letters included, there is
/// no Unicode folding), and leading/trailing `.` and `_` are stripped. Falls back to `"image"` when nothing is left.
pub fn secure_filename(name: &str) -> String {
    let joined = name
        .replace(['/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}

fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{suffix}.{ext}"),
        _ => format!("{name}-{suffix}"),
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
