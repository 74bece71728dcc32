//! S3-backed [`ArtifactStore`].

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::config::StorageConfig;
use crate::{s3_public_url, ArtifactStore, StorageError};

/// Provider name reported for credentials taken from [`StorageConfig`].
const STATIC_CREDENTIALS_PROVIDER: &str = "houme-static";

pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3ArtifactStore {
    /// Build an S3 client for the configured bucket and region.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some((id, secret)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                id,
                secret,
                None,
                None,
                STATIC_CREDENTIALS_PROVIDER,
            ));
        }

        let sdk_config = loader.load().await;
        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(bucket = %self.bucket, %key, error = %message, "S3 upload failed");
                StorageError::Upload {
                    key: key.to_string(),
                    message,
                }
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        s3_public_url(&self.bucket, &self.region, key)
    }
}
