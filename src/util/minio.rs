use async_trait::async_trait;
use bytes::Bytes;
use minio::s3::args::{BucketExistsArgs, GetObjectArgs, MakeBucketArgs, PutObjectArgs, RemoveObjectArgs};
use minio::s3::client::{Client, ClientBuilder};
use minio::s3::creds::StaticProvider;
use minio::s3::error::Error as MinioError;
use minio::s3::http::BaseUrl;
use std::io::Cursor;
use tracing::{debug, error, info, instrument, warn};

use crate::config::MinioConfig;
use crate::util::object_store::{ObjectStore, ObjectStoreError};

#[derive(Debug, Clone)]
pub struct MinioService {
    client: Client,
    pub config: MinioConfig,
}

impl MinioService {
    /// Create a new MinIO service instance; the bucket is created when missing.
    #[instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket_name))]
    pub async fn new(config: MinioConfig) -> Result<Self, ObjectStoreError> {
        info!("Initializing MinIO service");

        config.validate().map_err(|e| {
            error!("MinIO configuration validation failed: {}", e);
            ObjectStoreError::ConfigError(e.to_string())
        })?;

        let base_url = config.endpoint_url().parse::<BaseUrl>().map_err(|e| {
            error!("Failed to parse MinIO endpoint URL: {}", e);
            ObjectStoreError::ConnectionError(format!("Invalid endpoint URL: {}", e))
        })?;

        let static_provider = StaticProvider::new(&config.access_key, &config.secret_key, None);

        let client = ClientBuilder::new(base_url)
            .provider(Some(Box::new(static_provider)))
            .build()
            .map_err(|e| {
                error!("Failed to create MinIO client: {}", e);
                ObjectStoreError::ConnectionError(format!("Client creation failed: {}", e))
            })?;

        let service = Self { client, config };
        service.ensure_bucket_exists().await?;

        info!("MinIO service initialized successfully");
        Ok(service)
    }

    #[instrument(skip(self))]
    async fn ensure_bucket_exists(&self) -> Result<(), ObjectStoreError> {
        let bucket_exists_args = BucketExistsArgs::new(&self.config.bucket_name)
            .map_err(|e| ObjectStoreError::InvalidArguments(e.to_string()))?;

        let exists = self.client.bucket_exists(&bucket_exists_args).await.map_err(|e| {
            error!("Failed to check if bucket exists: {}", e);
            ObjectStoreError::OperationError(format!("Bucket exists check failed: {}", e))
        })?;

        if exists {
            debug!("Bucket '{}' already exists", self.config.bucket_name);
            return Ok(());
        }

        warn!("Bucket '{}' does not exist, creating it", self.config.bucket_name);
        let make_bucket_args = MakeBucketArgs::new(&self.config.bucket_name)
            .map_err(|e| ObjectStoreError::InvalidArguments(e.to_string()))?;

        self.client.make_bucket(&make_bucket_args).await.map_err(|e| {
            error!("Failed to create bucket '{}': {}", self.config.bucket_name, e);
            ObjectStoreError::OperationError(format!("Bucket creation failed: {}", e))
        })?;

        info!("Created bucket '{}'", self.config.bucket_name);
        Ok(())
    }
}

/// Only a missing key is a not-found; anything else is a store failure.
fn get_error(object_name: &str, s3_code: Option<&str>, cause: &dyn std::fmt::Display) -> ObjectStoreError {
    match s3_code {
        Some("NoSuchKey") => {
            warn!("Object '{}' does not exist", object_name);
            ObjectStoreError::ObjectNotFound(object_name.to_string())
        }
        _ => {
            error!("Failed to get object '{}': {}", object_name, cause);
            ObjectStoreError::OperationError(format!("Download of '{}' failed: {}", object_name, cause))
        }
    }
}

#[async_trait]
impl ObjectStore for MinioService {
    #[instrument(skip(self, data), fields(object_name = %object_name, size = data.len()))]
    async fn put_object(
        &self,
        object_name: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), ObjectStoreError> {
        info!("Uploading object '{}' to bucket '{}'", object_name, self.config.bucket_name);

        let bucket_name = self.config.bucket_name.clone();
        let object_name_owned = object_name.to_string();
        let client = self.client.clone();
        let content_type_owned = content_type.map(|ct| ct.to_string());

        // PutObjectArgs borrows the reader, so the upload runs on a blocking thread
        tokio::task::spawn_blocking(move || {
            let mut reader = Cursor::new(data);
            let data_len = reader.get_ref().len();

            let mut args = PutObjectArgs::new(&bucket_name, &object_name_owned, &mut reader, Some(data_len), None)
                .map_err(|e| ObjectStoreError::InvalidArguments(e.to_string()))?;

            if let Some(ref ct) = content_type_owned {
                args.content_type = ct.as_str();
            }

            futures::executor::block_on(client.put_object(&mut args))
                .map_err(|e| ObjectStoreError::OperationError(format!("Upload failed: {}", e)))?;

            Ok::<(), ObjectStoreError>(())
        })
        .await
        .map_err(|e| {
            error!("Failed to join blocking task for put_object: {}", e);
            ObjectStoreError::OperationError(format!("Join error: {}", e))
        })??;

        info!("Uploaded object '{}'", object_name);
        Ok(())
    }

    #[instrument(skip(self), fields(object_name = %object_name))]
    async fn get_object(&self, object_name: &str) -> Result<Bytes, ObjectStoreError> {
        let args = GetObjectArgs::new(&self.config.bucket_name, object_name)
            .map_err(|e| ObjectStoreError::InvalidArguments(e.to_string()))?;

        let response = self.client.get_object(&args).await.map_err(|e| {
            let code = match &e {
                MinioError::S3Error(response) => Some(response.code.as_str()),
                _ => None,
            };
            get_error(object_name, code, &e)
        })?;

        let bytes = response.bytes().await.map_err(|e| {
            error!("Failed to read object data: {}", e);
            ObjectStoreError::OperationError(format!("Read failed: {}", e))
        })?;

        debug!("Downloaded object '{}' ({} bytes)", object_name, bytes.len());
        Ok(bytes)
    }

    #[instrument(skip(self), fields(object_name = %object_name))]
    async fn remove_object(&self, object_name: &str) -> Result<(), ObjectStoreError> {
        let args = RemoveObjectArgs::new(&self.config.bucket_name, object_name)
            .map_err(|e| ObjectStoreError::InvalidArguments(e.to_string()))?;

        self.client.remove_object(&args).await.map_err(|e| {
            error!("Failed to delete object '{}': {}", object_name, e);
            ObjectStoreError::OperationError(format!("Delete failed: {}", e))
        })?;

        info!("Deleted object '{}'", object_name);
        Ok(())
    }

    fn object_url(&self, object_name: &str) -> String {
        self.config.object_url(object_name)
    }
}
