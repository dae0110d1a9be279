mod cleanup;
mod intake;
mod types;

pub use cleanup::cleanup;
pub use intake::{
    IMAGES_FIELD, TRANSFORMATION_FIELD, ensure_upload_dir, is_accepted_image, receive_uploads,
    stored_file_name,
};
pub use types::{TempUploads, UploadForm, UploadedFile};
