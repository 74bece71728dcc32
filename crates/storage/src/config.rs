use std::fmt;

use houme_core::error::CoreError;

/// Default AWS region of the artifact bucket.
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Default logical folder for generated images.
pub const DEFAULT_KEY_PREFIX: &str = "generated";

/// Artifact bucket settings.
#[derive(Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Static credentials. When either half is missing the default AWS
    /// provider chain is used instead.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub key_prefix: String,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `AWS_S3_BUCKET_NAME`    | required         |
    /// | `AWS_REGION`            | `ap-northeast-2` |
    /// | `AWS_ACCESS_KEY_ID`     | provider chain   |
    /// | `AWS_SECRET_ACCESS_KEY` | provider chain   |
    /// | `S3_KEY_PREFIX`         | `generated`      |
    pub fn from_env() -> Result<Self, CoreError> {
        let bucket = env_opt("AWS_S3_BUCKET_NAME")
            .ok_or_else(|| CoreError::Validation("AWS_S3_BUCKET_NAME must be set".into()))?;

        Ok(Self {
            bucket,
            region: env_opt("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.into()),
            access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            key_prefix: normalize_prefix(
                &env_opt("S3_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.into()),
            ),
        })
    }

    /// Both halves of a static key pair, if configured.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }
}

/// Strip surrounding slashes so keys come out as `prefix/name`.
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().trim_matches('/').to_string()
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
