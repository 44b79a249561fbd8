//! Photo object storage.
//!
//! Uploads go through the [`StorageBackend`] trait so the HTTP object
//! store can be swapped out in tests. The [`PhotoUploader`] layers the
//! bucket-fallback policy on top: buckets are tried in configured
//! priority order and the first successful upload wins, which keeps
//! uploads working when the primary bucket hits its quota.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use domain::models::PhotoUpload;

use crate::config::StorageConfig;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Photo storage not configured")]
    NotConfigured,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("All buckets rejected the upload; last error: {0}")]
    AllBucketsFailed(String),
}

/// An object store that can receive uploads and serve them publicly.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Uploads an object into a bucket.
    async fn upload(
        &self,
        bucket: &str,
        object_path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// The public URL an uploaded object is served from.
    fn public_url(&self, bucket: &str, object_path: &str) -> String;
}

/// HTTP object store client (S3-style upload-by-path API).
pub struct HttpObjectStore {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new(config: &StorageConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http,
        }
    }
}

#[async_trait]
impl StorageBackend for HttpObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        object_path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, bucket, object_path
        );

        let mut request = self
            .http
            .post(&url)
            .header("Content-Type", content_type)
            .body(bytes.to_vec());
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StorageError::UploadFailed(format!(
                "bucket '{}' returned {}: {}",
                bucket, status, body
            )))
        }
    }

    fn public_url(&self, bucket: &str, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, object_path
        )
    }
}

/// Uploads photos with bucket fallback.
#[derive(Clone)]
pub struct PhotoUploader {
    backend: Arc<dyn StorageBackend>,
    buckets: Vec<String>,
}

impl PhotoUploader {
    pub fn new(backend: Arc<dyn StorageBackend>, buckets: Vec<String>) -> Self {
        Self { backend, buckets }
    }

    /// Builds the uploader from configuration, if storage is configured.
    pub fn from_config(config: &StorageConfig) -> Option<Self> {
        if config.base_url.is_empty() || config.buckets.is_empty() {
            return None;
        }
        Some(Self::new(
            Arc::new(HttpObjectStore::new(config)),
            config.buckets.clone(),
        ))
    }

    /// Uploads a decoded photo and returns its public URL.
    ///
    /// Buckets are tried in priority order; per-bucket failures are logged
    /// and the next bucket is tried. Only when every bucket rejects the
    /// upload does the whole operation fail.
    pub async fn upload_photo(
        &self,
        form_id: Uuid,
        field_name: &str,
        photo: &PhotoUpload,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let object_path = format!(
            "{}/{}_{}_{}",
            form_id,
            field_name,
            Uuid::new_v4(),
            sanitize_file_name(&photo.file_name)
        );
        let content_type = photo
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        let mut last_error = StorageError::NotConfigured;
        for bucket in &self.buckets {
            match self
                .backend
                .upload(bucket, &object_path, bytes, content_type)
                .await
            {
                Ok(()) => {
                    debug!(bucket = %bucket, object = %object_path, "Photo uploaded");
                    return Ok(self.backend.public_url(bucket, &object_path));
                }
                Err(e) => {
                    warn!(
                        bucket = %bucket,
                        object = %object_path,
                        error = %e,
                        "Bucket rejected upload, trying next"
                    );
                    last_error = e;
                }
            }
        }

        Err(StorageError::AllBucketsFailed(last_error.to_string()))
    }
}

/// Keeps file names path-safe: alphanumerics, dot, dash and underscore.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
