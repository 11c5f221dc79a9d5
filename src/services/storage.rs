//! Scan image storage on the local filesystem

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// URL prefix under which stored images are served
pub const PUBLIC_PREFIX: &str = "/storage";

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Clone)]
pub struct ImageStorage {
    dir: PathBuf,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write an image under a fresh name and return its relative URL
    pub async fn save(&self, bytes: &[u8], original_name: Option<&str>) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Image is empty".to_string()));
        }

        let extension = extension_of(original_name)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot create storage directory: {}", e)))?;
        tokio::fs::write(self.dir.join(&file_name), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot write image: {}", e)))?;

        tracing::debug!(file = %file_name, size = bytes.len(), "image stored");
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Delete an image previously returned by `save`. Failures are logged only.
    pub async fn remove(&self, url: &str) {
        let file_name = url
            .strip_prefix(PUBLIC_PREFIX)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|name| !name.is_empty() && Path::new(name).file_name() == Some(name.as_ref()));
        let Some(file_name) = file_name else {
            tracing::warn!(%url, "not a stored image, nothing removed");
            return;
        };

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => tracing::debug!(file = %file_name, "image removed"),
            Err(e) => tracing::warn!(file = %file_name, error = %e, "cannot remove image"),
        }
    }
}

/// Lowercased extension of the uploaded file, `jpg` when the client sent none
fn extension_of(original_name: Option<&str>) -> AppResult<String> {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpg".to_string());

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::Validation(format!(
            "Unsupported image type .{}",
            extension
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Some("plate.JPG")).unwrap(), "jpg");
        assert_eq!(extension_of(Some("plate.png")).unwrap(), "png");
        assert_eq!(extension_of(None).unwrap(), "jpg");
        assert_eq!(extension_of(Some("noext")).unwrap(), "jpg");
        assert!(matches!(extension_of(Some("x.exe")), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = std::env::temp_dir().join(format!("market-scan-{}", Uuid::new_v4()));
        let storage = ImageStorage::new(&dir);

        let url = storage.save(b"jpeg-bytes", Some("cam1.jpg")).await.unwrap();
        assert!(url.starts_with("/storage/"));
        assert!(url.ends_with(".jpg"));

        let file_name = url.trim_start_matches("/storage/");
        let written = tokio::fs::read(dir.join(file_name)).await.unwrap();
        assert_eq!(written, b"jpeg-bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes_saved_image() {
        let dir = std::env::temp_dir().join(format!("market-scan-{}", Uuid::new_v4()));
        let storage = ImageStorage::new(&dir);

        let url = storage.save(b"jpeg-bytes", Some("cam1.jpg")).await.unwrap();
        let path = dir.join(url.trim_start_matches("/storage/"));
        assert!(tokio::fs::try_exists(&path).await.unwrap());

        storage.remove(&url).await;
        assert!(!tokio::fs::try_exists(&path).await.unwrap());

        // outside the storage directory: ignored
        storage.remove("/storage/../Cargo.toml").await;
        storage.remove("/etc/passwd").await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_empty() {
        let storage = ImageStorage::new(std::env::temp_dir());
        assert!(matches!(storage.save(&[], None).await, Err(AppError::Validation(_))));
    }
}
