//! Image storage for admin uploads.
//!
//! Consumed as an interface: hand over a filename and bytes, get back an
//! identifier and a public URL. The bundled implementation writes to a local
//! directory that the server exposes at `/uploads`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;

/// Longest file extension carried over from the original filename.
const MAX_EXTENSION_LEN: usize = 8;

/// Errors from storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The submitted file had no content.
    #[error("No file provided")]
    Empty,

    /// Filesystem failure while persisting the file.
    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Empty => Self::BadRequest(e.to_string()),
            UploadError::Io(err) => Self::Internal(err.to_string()),
        }
    }
}

/// A stored upload: the identifier plus the URL it is served from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    pub id: Uuid,
    pub url: String,
}

/// Disk-backed upload store.
#[derive(Clone)]
pub struct DiskUploadStore {
    root: PathBuf,
}

impl DiskUploadStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Persist an uploaded file under a fresh UUID name.
    ///
    /// Only a short alphanumeric extension survives from the original
    /// filename; everything else about the name is discarded.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Empty` for zero-byte files and
    /// `UploadError::Io` when the write fails.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredUpload, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let id = Uuid::new_v4();
        let file_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        };

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        Ok(StoredUpload {
            id,
            url: format!("/uploads/{file_name}"),
        })
    }
}

/// Extract a safe lowercase extension from a client-supplied filename.
fn sanitized_extension(original_name: Option<&str>) -> Option<String> {
    let ext = Path::new(original_name?).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_extension() {
        assert_eq!(sanitized_extension(Some("photo.JPG")), Some("jpg".to_string()));
        assert_eq!(sanitized_extension(Some("archive.tar.gz")), Some("gz".to_string()));
        assert_eq!(sanitized_extension(Some("noext")), None);
        assert_eq!(sanitized_extension(Some("weird.j!pg")), None);
        assert_eq!(sanitized_extension(None), None);
    }

    #[tokio::test]
    async fn test_store_writes_file_and_builds_url() {
        let root = std::env::temp_dir().join(format!("cl-uploads-{}", Uuid::new_v4()));
        let store = DiskUploadStore::new(root.clone());

        let stored = store
            .store(Some("hero.png"), b"not-really-a-png")
            .await
            .expect("store succeeds");

        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.url.ends_with(".png"));

        let on_disk = root.join(format!("{}.png", stored.id));
        let contents = tokio::fs::read(&on_disk).await.expect("file exists");
        assert_eq!(contents, b"not-really-a-png");

        tokio::fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn test_store_rejects_empty_file() {
        let store = DiskUploadStore::new(std::env::temp_dir());
        assert!(matches!(
            store.store(Some("x.png"), b"").await,
            Err(UploadError::Empty)
        ));
    }
}
