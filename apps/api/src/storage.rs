//! Blob storage for uploaded candidate files.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `body` under `key` and returns the public URL of the object.
    async fn put(&self, key: &str, body: Bytes, content_type: Option<&str>)
        -> Result<String, AppError>;
}

/// Builds a collision-free object key: `<owner>/<kind>_<uuid>.<ext>`.
pub fn object_key(owner_id: Uuid, kind: &str, original_filename: Option<&str>) -> String {
    let extension = original_filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("{owner_id}/{kind}_{}.{ext}", Uuid::new_v4()),
        None => format!("{owner_id}/{kind}_{}", Uuid::new_v4()),
    }
}

pub struct S3FileStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    base_url: String,
}

impl S3FileStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, base_url: String) -> Self {
        Self {
            client,
            bucket,
            base_url,
        }
    }
}

#[async_trait]
impl FileStorage for S3FileStorage {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, AppError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        request
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(format!("{}/{}", self.base_url, key))
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryFileStorage {
        pub objects: Mutex<HashMap<String, Bytes>>,
    }

    #[async_trait]
    impl FileStorage for MemoryFileStorage {
        async fn put(
            &self,
            key: &str,
            body: Bytes,
            _content_type: Option<&str>,
        ) -> Result<String, AppError> {
            self.objects.lock().await.insert(key.to_string(), body);
            Ok(format!("/files/{key}"))
        }
    }
}
