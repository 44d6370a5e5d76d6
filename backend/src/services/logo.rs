//! Vendor logo files on local disk

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{AppError, AppResult};

pub const MSG_NOT_AN_IMAGE: &str = "Only image files are allowed";
pub const MSG_LOGO_TOO_LARGE: &str = "Logo file is too large";

/// An uploaded logo as received from the client, not yet written
#[derive(Clone)]
pub struct LogoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for LogoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Writes and removes logo files inside the upload directory
#[derive(Clone, Debug)]
pub struct LogoStorage {
    dir: PathBuf,
    max_file_size: usize,
}

impl LogoStorage {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            max_file_size: config.max_file_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Cannot create {}: {}", self.dir.display(), e))
        })
    }

    /// Reject uploads that are not images or exceed the size limit
    pub fn check(&self, upload: &LogoUpload) -> AppResult<()> {
        if !upload.content_type.starts_with("image/") {
            return Err(AppError::BadRequest(MSG_NOT_AN_IMAGE.to_string()));
        }
        if upload.bytes.len() > self.max_file_size {
            return Err(AppError::BadRequest(MSG_LOGO_TOO_LARGE.to_string()));
        }
        Ok(())
    }

    /// Write the upload under a fresh name and return that name
    pub async fn save(&self, upload: &LogoUpload) -> AppResult<String> {
        self.check(upload)?;

        let file_name = format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension_of(&upload.file_name)
        );
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &upload.bytes).await.map_err(|e| {
            AppError::Storage(format!("Cannot write {}: {}", path.display(), e))
        })?;

        tracing::debug!("Stored logo {} ({} bytes)", file_name, upload.bytes.len());
        Ok(file_name)
    }

    /// Delete a stored logo. Failures are logged and otherwise ignored.
    pub async fn remove(&self, file_name: &str) {
        let Some(path) = self.path_of(file_name) else {
            tracing::warn!("Refusing to remove logo with unsafe name {:?}", file_name);
            return;
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Error deleting logo file {}: {}", path.display(), e);
        }
    }

    /// Path of a stored logo, or `None` if the name would escape the directory
    pub fn path_of(&self, file_name: &str) -> Option<PathBuf> {
        let is_plain = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && file_name != "."
            && file_name != "..";
        is_plain.then(|| self.dir.join(file_name))
    }

    pub async fn exists(&self, file_name: &str) -> bool {
        match self.path_of(file_name) {
            Some(path) => tokio::fs::metadata(path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            None => false,
        }
    }
}

/// `.ext` of the client's file name, limited to a short alphanumeric suffix
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> LogoStorage {
        LogoStorage::new(&UploadConfig {
            dir: dir.to_string_lossy().into_owned(),
            max_file_size: 16,
            public_path: "/images".to_string(),
        })
    }

    fn png(bytes: &[u8]) -> LogoUpload {
        LogoUpload {
            file_name: "Logo.PNG".to_string(),
            content_type: "image/png".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("logo.png"), ".png");
        assert_eq!(extension_of("Logo.JPEG"), ".jpeg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("bad.p/g"), "");
    }

    #[test]
    fn test_check_rejects_non_images_and_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let logos = storage(dir.path());

        assert!(logos.check(&png(b"tiny")).is_ok());

        let mut text = png(b"tiny");
        text.content_type = "text/plain".to_string();
        let err = logos.check(&text).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == MSG_NOT_AN_IMAGE));

        let err = logos.check(&png(&[0u8; 17])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == MSG_LOGO_TOO_LARGE));
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let logos = storage(dir.path());

        let name = logos.save(&png(b"\x89PNG")).await.unwrap();
        assert!(name.ends_with(".png"));
        assert!(logos.exists(&name).await);
        assert_eq!(
            std::fs::read(dir.path().join(&name)).unwrap(),
            b"\x89PNG".to_vec()
        );

        let other = logos.save(&png(b"\x89PNG")).await.unwrap();
        assert_ne!(name, other);

        logos.remove(&name).await;
        assert!(!logos.exists(&name).await);

        // Removing again only logs
        logos.remove(&name).await;
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logos = storage(&dir.path().join("a").join("b"));
        logos.ensure_dir().await.unwrap();
        assert!(logos.dir().is_dir());
    }

    #[test]
    fn test_path_of_rejects_traversal() {
        let logos = storage(Path::new("images"));
        assert!(logos.path_of("../etc/passwd").is_none());
        assert!(logos.path_of("..").is_none());
        assert!(logos.path_of("").is_none());
        assert_eq!(
            logos.path_of("1-abc.png"),
            Some(PathBuf::from("images").join("1-abc.png"))
        );
    }
}
