//! Amazon S3 object storage utilities.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, instrument};

use crate::error::{StorageError, StorageOperation};

/// Location of an object in S3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Uri {
    /// Bucket name
    pub bucket: String,
    /// Object key within the bucket
    pub key: String,
}

impl S3Uri {
    /// Create a URI from a bucket and key.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Unsigned virtual-hosted-style URL for the object.
    ///
    /// This is what clients receive as `audioUrl`; it is never presigned.
    pub fn public_url(&self) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, self.key)
    }
}

impl std::fmt::Display for S3Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Metadata attached to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// MIME type of the body
    pub content_type: String,
    /// `Cache-Control` header value
    pub cache_control: Option<String>,
}

/// Blob storage seam.
///
/// Implementations are shared across concurrent invocations and must not
/// hold per-request state.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` at `uri`, replacing any existing object.
    async fn put(&self, uri: &S3Uri, data: Vec<u8>, options: &UploadOptions)
    -> Result<(), StorageError>;
}

/// S3-backed object store.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Create a store from shared AWS SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
        }
    }

    /// Create a store around an existing client.
    pub fn with_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    /// Upload bytes with `PutObject`.
    ///
    /// # Errors
    /// Returns `StorageError::OperationFailed` if the upload fails.
    #[instrument(level = "debug", name = "s3_put_object", skip(self, uri, data, options), fields(uri = %uri))]
    async fn put(
        &self,
        uri: &S3Uri,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        debug!(bytes = data.len(), content_type = %options.content_type, "Uploading object");

        self.client
            .put_object()
            .bucket(&uri.bucket)
            .key(&uri.key)
            .body(ByteStream::from(data))
            .content_type(&options.content_type)
            .set_cache_control(options.cache_control.clone())
            .send()
            .await
            .map_err(|e| {
                StorageError::operation_failed(
                    uri.to_string(),
                    StorageOperation::Upload,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        Ok(())
    }
}
