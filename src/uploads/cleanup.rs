use super::TempUploads;
use tracing::{debug, warn};

/// Deletes the temporary files behind `uploads`. Failures are logged and swallowed.
pub async fn cleanup(mut uploads: TempUploads) {
    for file in uploads.take() {
        match tokio::fs::remove_file(&file.path).await {
            Ok(()) => debug!("Removed temporary upload {}", file.path.display()),
            Err(e) => warn!(
                "Failed to remove temporary upload {}: {}",
                file.path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uploads::UploadedFile;
    use tempfile::TempDir;

    fn uploaded(dir: &TempDir, name: &str) -> UploadedFile {
        UploadedFile {
            path: dir.path().join(name),
            original_name: Some(name.to_string()),
            mime_type: Some("image/jpeg".to_string()),
            size: 3,
        }
    }

    #[tokio::test]
    async fn test_cleanup_removes_every_file() {
        let dir = TempDir::new().unwrap();
        let files = vec![uploaded(&dir, "a.jpg"), uploaded(&dir, "b.png")];
        for file in &files {
            tokio::fs::write(&file.path, b"abc").await.unwrap();
        }

        cleanup(files.into()).await;

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        let present = uploaded(&dir, "present.jpg");
        tokio::fs::write(&present.path, b"abc").await.unwrap();

        cleanup(vec![uploaded(&dir, "already-gone.jpg"), present.clone()].into()).await;

        assert!(!present.path.exists());
    }
}
