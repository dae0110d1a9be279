use super::{TempUploads, UploadForm, UploadedFile, cleanup};
use crate::{Error, Result, config::UploadConfig};
use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use chrono::Utc;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

/// Multipart field carrying the image parts.
pub const IMAGES_FIELD: &str = "images";
/// Multipart text field selecting the transformation.
pub const TRANSFORMATION_FIELD: &str = "transformationType";

const FILE_PREFIX: &str = "images";
const FALLBACK_EXTENSION: &str = "jpg";
const IMAGE_TYPES: [&str; 8] = ["jpeg", "jpg", "png", "gif", "webp", "bmp", "tiff", "svg"];

pub async fn ensure_upload_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Reads the form, storing every accepted image part under `config.dir`.
///
/// Each file is registered with the form's [`TempUploads`] before any byte is
/// written, so an error or an abandoned request never leaves partial files.
pub async fn receive_uploads(mut multipart: Multipart, config: &UploadConfig) -> Result<UploadForm> {
    ensure_upload_dir(&config.dir).await?;

    let mut form = UploadForm::default();
    if let Err(e) = read_fields(&mut multipart, config, &mut form).await {
        cleanup(std::mem::take(&mut form.files)).await;
        return Err(e);
    }

    if form.files.is_empty() {
        return Err(Error::NoImagesUploaded);
    }

    info!(
        "Accepted {} upload(s), {} bytes total",
        form.files.len(),
        form.files.total_size()
    );
    Ok(form)
}

async fn read_fields(
    multipart: &mut Multipart,
    config: &UploadConfig,
    form: &mut UploadForm,
) -> Result<()> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            IMAGES_FIELD => {
                if form.files.len() >= config.max_files {
                    return Err(Error::TooManyFiles {
                        max_files: config.max_files,
                    });
                }

                let original_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                let mime_type = field.content_type().map(str::to_string);

                if !is_accepted_image(original_name.as_deref(), mime_type.as_deref()) {
                    return Err(Error::InvalidFileType {
                        filename: original_name.unwrap_or_default(),
                    });
                }

                store_field(field, config, &mut form.files, original_name, mime_type).await?;
            }
            TRANSFORMATION_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, config))?;
                let value = value.trim();
                if !value.is_empty() {
                    form.transformation_type = Some(value.to_string());
                }
            }
            _ if field.file_name().is_some() => {
                return Err(Error::UnexpectedUploadField { field: name });
            }
            _ => debug!("Ignoring form field '{}'", name),
        }
    }

    Ok(())
}

async fn store_field(
    mut field: Field<'_>,
    config: &UploadConfig,
    uploads: &mut TempUploads,
    original_name: Option<String>,
    mime_type: Option<String>,
) -> Result<()> {
    // Destination may have been removed since startup.
    ensure_upload_dir(&config.dir).await?;

    let path = config.dir.join(stored_file_name(original_name.as_deref()));
    let mut out = tokio::fs::File::create(&path).await?;
    uploads.push(UploadedFile {
        path: path.clone(),
        original_name,
        mime_type,
        size: 0,
    });

    let size = copy_field(&mut field, &mut out, config).await?;
    if let Some(file) = uploads.last_mut() {
        file.size = size;
    }
    debug!("Stored upload at {} ({} bytes)", path.display(), size);
    Ok(())
}

async fn copy_field(
    field: &mut Field<'_>,
    out: &mut tokio::fs::File,
    config: &UploadConfig,
) -> Result<u64> {
    let mut size: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        size += chunk.len() as u64;
        if size > config.max_file_size {
            return Err(Error::FileTooLarge {
                max_bytes: config.max_file_size,
            });
        }
        out.write_all(&chunk).await?;
    }
    out.flush().await?;
    Ok(size)
}

fn multipart_error(e: MultipartError, config: &UploadConfig) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::FileTooLarge {
            max_bytes: config.max_file_size,
        }
    } else {
        Error::malformed_upload(e.body_text())
    }
}

/// Image parts are accepted when either the filename extension or the declared
/// MIME type names a known raster/vector image format. Parts without a
/// filename are accepted as-is.
pub fn is_accepted_image(original_name: Option<&str>, mime_type: Option<&str>) -> bool {
    let Some(name) = original_name.filter(|n| !n.is_empty()) else {
        return true;
    };

    let extension_ok = extension_of(name).is_some_and(|ext| IMAGE_TYPES.contains(&ext.as_str()));
    let mime_ok = mime_type.is_some_and(|mime| {
        let mime = mime.to_ascii_lowercase();
        IMAGE_TYPES.iter().any(|t| mime.contains(t))
    });

    extension_ok || mime_ok
}

/// `images-<millis>-<random>.<ext>`; the extension defaults to `jpg`.
pub fn stored_file_name(original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(extension_of)
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!(
        "{}-{}-{}.{}",
        FILE_PREFIX,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    )
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
}
