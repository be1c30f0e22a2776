//! S3 storage service for attachment uploads.
//!
//! Handles letters, CVs, weekly log attachments and site visit files.
//! Supports both AWS S3 and MinIO for development. The `ObjectStore`
//! trait is the seam the workflow code depends on.

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use tracing::info;
use uuid::Uuid;

use crate::config::StorageSettings;
use crate::error::{AppError, AppResult};

/// Attachment storage operations used by the workflows.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object under a key.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: Option<&str>) -> AppResult<()>;

    /// Fetch an object and its content type.
    async fn get(&self, key: &str) -> AppResult<(Vec<u8>, Option<String>)>;

    /// Whether an object exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Delete an object by key.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Replace a stored object, never risking loss of both versions.
///
/// The new object is written under `new_key` first; the old object is
/// deleted only after the write succeeded, and only when its key differs
/// from the new one.
pub async fn replace_object(
    store: &dyn ObjectStore,
    old_key: Option<&str>,
    new_key: &str,
    data: Vec<u8>,
    content_type: Option<&str>,
) -> AppResult<()> {
    store.put(new_key, data, content_type).await?;

    if let Some(old) = old_key
        && old != new_key
        && store.exists(old).await?
    {
        store.delete(old).await?;
    }

    Ok(())
}

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    /// Create a new S3 storage client from configuration.
    pub async fn new(config: &StorageSettings) -> AppResult<Self> {
        let credentials =
            Credentials::new(&config.access_key, &config.secret_key, None, None, "ips");

        let region = Region::new(config.region.clone());

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .force_path_style(true); // Required for MinIO

        // Use custom endpoint for MinIO in development
        if let Some(ref endpoint) = config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let s3_config = s3_config_builder.build();
        let client = Client::from_conf(s3_config);

        let storage = Self {
            client,
            bucket: config.bucket.clone(),
        };

        storage.ensure_bucket_exists().await?;

        info!("S3 storage initialized: bucket={}", config.bucket);

        Ok(storage)
    }

    /// Ensure the bucket exists, creating it if necessary.
    async fn ensure_bucket_exists(&self) -> AppResult<()> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                info!("S3 bucket '{}' exists", self.bucket);
                Ok(())
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    info!("Creating S3 bucket '{}'", self.bucket);
                    self.client
                        .create_bucket()
                        .bucket(&self.bucket)
                        .send()
                        .await
                        .map_err(|e| {
                            AppError::Storage(format!("Failed to create bucket: {}", e))
                        })?;
                    info!("S3 bucket '{}' created", self.bucket);
                    Ok(())
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to access bucket '{}': {}",
                        self.bucket, service_error
                    )))
                }
            }
        }
    }

    /// Get the content type for a file based on its extension.
    pub fn content_type_for_extension(ext: &str) -> &'static str {
        match ext.to_lowercase().as_str() {
            "pdf" => "application/pdf",
            "doc" => "application/msword",
            "docx" => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "txt" => "text/plain",
            "zip" => "application/zip",
            _ => "application/octet-stream",
        }
    }

    /// Build a storage key for a request document.
    ///
    /// Format: requests/{request_id}/{kind}/{uuid}-{filename}
    pub fn request_key(request_id: Uuid, kind: &str, filename: &str) -> String {
        format!("requests/{}/{}/{}-{}", request_id, kind, Uuid::now_v7(), filename)
    }

    /// Build a storage key for a tracking document (logs, site visits).
    ///
    /// Format: tracking/{placement_id}/{kind}/{uuid}-{filename}
    pub fn tracking_key(placement_id: Uuid, kind: &str, filename: &str) -> String {
        format!(
            "tracking/{}/{}/{}-{}",
            placement_id,
            kind,
            Uuid::now_v7(),
            filename
        )
    }
}

#[async_trait::async_trait]
impl ObjectStore for Storage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: Option<&str>) -> AppResult<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(data);
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload file to S3: {}", e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<(Vec<u8>, Option<String>)> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    AppError::NotFound(format!("File {}", key))
                } else {
                    AppError::Storage(format!("Failed to get file from S3: {}", service_error))
                }
            })?;

        let content_type = response.content_type().map(String::from);
        let data = response
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read S3 response body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok((data, content_type))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to check object '{}': {}",
                        key, service_error
                    )))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete file from S3: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory double for replacement-ordering tests.
    #[derive(Default)]
    pub struct MemoryStore {
        pub objects: Mutex<HashMap<String, Vec<u8>>>,
        pub fail_puts: Mutex<bool>,
    }

    #[async_trait::async_trait]
    impl ObjectStore for MemoryStore {
        async fn put(
            &self,
            key: &str,
            data: Vec<u8>,
            _content_type: Option<&str>,
        ) -> AppResult<()> {
            if *self.fail_puts.lock().unwrap() {
                return Err(AppError::Storage("put failed".to_string()));
            }
            self.objects.lock().unwrap().insert(key.to_string(), data);
            Ok(())
        }

        async fn get(&self, key: &str) -> AppResult<(Vec<u8>, Option<String>)> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .map(|data| (data, None))
                .ok_or_else(|| AppError::NotFound(format!("File {}", key)))
        }

        async fn exists(&self, key: &str) -> AppResult<bool> {
            Ok(self.objects.lock().unwrap().contains_key(key))
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_replace_writes_new_then_deletes_old() {
        let store = MemoryStore::default();
        store.put("old", b"v1".to_vec(), None).await.unwrap();

        replace_object(&store, Some("old"), "new", b"v2".to_vec(), None)
            .await
            .unwrap();

        let objects = store.objects.lock().unwrap();
        assert!(!objects.contains_key("old"));
        assert_eq!(objects.get("new"), Some(&b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_replace_keeps_old_when_put_fails() {
        let store = MemoryStore::default();
        store.put("old", b"v1".to_vec(), None).await.unwrap();
        *store.fail_puts.lock().unwrap() = true;

        let result = replace_object(&store, Some("old"), "new", b"v2".to_vec(), None).await;
        assert!(result.is_err());

        // The failed write never deleted the old object
        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.get("old"), Some(&b"v1".to_vec()));
        assert!(!objects.contains_key("new"));
    }

    #[tokio::test]
    async fn test_replace_same_key_does_not_delete() {
        let store = MemoryStore::default();
        store.put("same", b"v1".to_vec(), None).await.unwrap();

        replace_object(&store, Some("same"), "same", b"v2".to_vec(), None)
            .await
            .unwrap();

        let objects = store.objects.lock().unwrap();
        assert_eq!(objects.get("same"), Some(&b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_replace_without_previous_object() {
        let store = MemoryStore::default();

        replace_object(&store, None, "new", b"v1".to_vec(), None)
            .await
            .unwrap();

        assert!(store.objects.lock().unwrap().contains_key("new"));
    }

    #[test]
    fn test_content_type_for_extension() {
        assert_eq!(Storage::content_type_for_extension("pdf"), "application/pdf");
        assert_eq!(Storage::content_type_for_extension("PDF"), "application/pdf");
        assert_eq!(Storage::content_type_for_extension("png"), "image/png");
        assert_eq!(
            Storage::content_type_for_extension("unknown"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_key_builders_scope_by_owner() {
        let id = Uuid::new_v4();
        let key = Storage::request_key(id, "acceptance", "letter.pdf");
        assert!(key.starts_with(&format!("requests/{}/acceptance/", id)));
        assert!(key.ends_with("-letter.pdf"));

        let key = Storage::tracking_key(id, "weekly_logs", "notes.pdf");
        assert!(key.starts_with(&format!("tracking/{}/weekly_logs/", id)));
    }
}
