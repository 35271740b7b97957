//! Object-storage uploads for product images.
//!
//! Files are PUT to an S3-compatible HTTP endpoint with a bearer token; the
//! store answers with 2xx and the object becomes reachable under the public
//! base URL. The returned URL is durable and saved on the product record.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::config::StorageConfig;

/// A file received from a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Errors that can occur while uploading a file.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The HTTP request itself failed.
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The object store answered with a non-success status.
    #[error("object store rejected the upload: {0}")]
    Rejected(String),
}

/// Contract for uploading a file and obtaining its durable URL.
#[async_trait]
pub trait BlobUploader: Send + Sync {
    /// Upload a file and return its durable public URL.
    async fn upload(&self, file: &UploadedFile) -> Result<String, UploadError>;
}

/// Uploader backed by an S3-compatible HTTP object store.
#[derive(Debug, Clone)]
pub struct HttpBlobUploader {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    access_token: SecretString,
    public_base_url: String,
}

impl HttpBlobUploader {
    /// Create an uploader from the storage configuration.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            access_token: config.access_token.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a collision-free object key under the `products/` prefix.
    fn object_key(filename: &str) -> String {
        format!("products/{}-{}", Uuid::new_v4(), sanitize_filename(filename))
    }
}

/// Replace anything outside `[A-Za-z0-9._-]` so the filename is safe inside
/// an object key and a URL path segment.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl BlobUploader for HttpBlobUploader {
    #[instrument(skip(self, file), fields(filename = %file.filename, bytes = file.bytes.len()))]
    async fn upload(&self, file: &UploadedFile) -> Result<String, UploadError> {
        let key = Self::object_key(&file.filename);
        let target = format!("{}/{}/{key}", self.endpoint, self.bucket);

        let response = self
            .client
            .put(&target)
            .bearer_auth(self.access_token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected(format!("{status}: {body}")));
        }

        Ok(format!("{}/{key}", self.public_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("shirt-front_01.png"), "shirt-front_01.png");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my shirt (1).png"), "my-shirt--1-.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn object_keys_are_prefixed_and_unique() {
        let a = HttpBlobUploader::object_key("shirt.png");
        let b = HttpBlobUploader::object_key("shirt.png");

        assert!(a.starts_with("products/"));
        assert!(a.ends_with("-shirt.png"));
        assert_ne!(a, b);
    }
}
