use std::env;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ConfigError;

/// Connection settings for the bucket that holds uploaded storage files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    /// Public base URL that download links are built on.
    pub links_prefix: String,
    pub region: Option<String>,
    pub secure: bool,
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::EnvVarNotFound(name.to_string()))
}

impl MinioConfig {
    /// Reads `MINIO_ENDPOINT`, `MINIO_ACCESS_KEY`, `MINIO_SECRET_KEY` and
    /// `MINIO_BUCKET_NAME` (required) plus `MINIO_REGION`, `MINIO_SECURE` and
    /// `MINIO_LINKS_PREFIX`. A missing endpoint means uploads stay in memory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = required("MINIO_ENDPOINT")?;
        let secure = match env::var("MINIO_SECURE") {
            Ok(raw) => raw.trim().parse::<bool>().map_err(|_| {
                ConfigError::InvalidValue(format!("MINIO_SECURE must be true or false, got '{}'", raw))
            })?,
            Err(_) => false,
        };
        let links_prefix = env::var("MINIO_LINKS_PREFIX").unwrap_or_else(|_| {
            let scheme = if secure { "https" } else { "http" };
            warn!("MINIO_LINKS_PREFIX not set, download links use the endpoint");
            format!("{}://{}", scheme, endpoint)
        });

        let config = MinioConfig {
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            bucket_name: required("MINIO_BUCKET_NAME")?,
            region: env::var("MINIO_REGION").ok().filter(|r| !r.trim().is_empty()),
            endpoint,
            links_prefix,
            secure,
        };
        config.validate()?;
        info!("MinIO configuration loaded for bucket '{}'", config.bucket_name);
        debug!("MinIO endpoint: {}", config.endpoint_url());
        Ok(config)
    }

    /// Bucket names follow the S3 rules: 3 to 63 lowercase letters, digits,
    /// dots or hyphens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bucket = &self.bucket_name;
        if bucket.len() < 3 || bucket.len() > 63 {
            return Err(ConfigError::ValidationError(format!(
                "Bucket name '{}' must be between 3 and 63 characters",
                bucket
            )));
        }
        if !bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        {
            return Err(ConfigError::ValidationError(format!(
                "Bucket name '{}' contains invalid characters",
                bucket
            )));
        }
        if self.links_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError("Links prefix cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    /// Download link of a storage object: `<links_prefix>/<bucket>/<key>`.
    pub fn object_url(&self, object_key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.links_prefix.trim_end_matches('/'),
            self.bucket_name,
            object_key.trim_start_matches('/')
        )
    }
}

impl Default for MinioConfig {
    fn default() -> Self {
        MinioConfig {
            endpoint: "localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket_name: "planner-crm".to_string(),
            links_prefix: "http://localhost:9000".to_string(),
            region: None,
            secure: false,
        }
    }
}
