use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// An accepted upload sitting in temporary storage for the life of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
    pub size: u64,
}

/// Owns the temporary files of one request.
///
/// Whatever is still held when the value is dropped is deleted from disk, so
/// files are removed even when the request future is abandoned mid-flight
/// (client disconnect, handler timeout). The normal path empties it through
/// [`cleanup`](super::cleanup) first.
#[derive(Debug, Default)]
pub struct TempUploads {
    files: Vec<UploadedFile>,
}

impl TempUploads {
    pub fn push(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadedFile> {
        self.files.iter()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut UploadedFile> {
        self.files.last_mut()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Hands the files to the caller, who becomes responsible for deleting them.
    pub(crate) fn take(&mut self) -> Vec<UploadedFile> {
        std::mem::take(&mut self.files)
    }
}

impl From<Vec<UploadedFile>> for TempUploads {
    fn from(files: Vec<UploadedFile>) -> Self {
        Self { files }
    }
}

impl Drop for TempUploads {
    fn drop(&mut self) {
        for file in self.files.drain(..) {
            match std::fs::remove_file(&file.path) {
                Ok(()) => debug!("Removed abandoned upload {}", file.path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(
                    "Failed to remove abandoned upload {}: {}",
                    file.path.display(),
                    e
                ),
            }
        }
    }
}

/// Everything the intake step pulled out of a `POST /generate-image` form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: TempUploads,
    pub transformation_type: Option<String>,
}
