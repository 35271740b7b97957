//! External collaborators: object storage for product images.

pub mod uploads;

pub use uploads::{BlobUploader, HttpBlobUploader, UploadError, UploadedFile};
