//! Blob storage for uploaded files.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Operation error: {0}")]
    OperationError(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: Option<&str>) -> Result<(), ObjectStoreError>;
    async fn get_object(&self, key: &str) -> Result<Bytes, ObjectStoreError>;
    async fn remove_object(&self, key: &str) -> Result<(), ObjectStoreError>;
    /// Public download link for `key`.
    fn object_url(&self, key: &str) -> String;
}

/// Keeps objects in process memory. Used when MinIO is not configured.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, key: &str, data: Vec<u8>, _content_type: Option<&str>) -> Result<(), ObjectStoreError> {
        if key.is_empty() {
            return Err(ObjectStoreError::InvalidArguments("Object key cannot be empty".to_string()));
        }
        self.objects.write().await.insert(key.to_string(), Bytes::from(data));
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::ObjectNotFound(key.to_string()))
    }

    async fn remove_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ObjectStoreError::ObjectNotFound(key.to_string()))
    }

    fn object_url(&self, key: &str) -> String {
        format!("/files/{}", key.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = InMemoryObjectStore::new();
        store.put_object("storage/a.txt", b"hello".to_vec(), Some("text/plain")).await.unwrap();
        assert_eq!(store.get_object("storage/a.txt").await.unwrap(), Bytes::from_static(b"hello"));
        store.remove_object("storage/a.txt").await.unwrap();
        assert!(matches!(
            store.get_object("storage/a.txt").await,
            Err(ObjectStoreError::ObjectNotFound(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let store = InMemoryObjectStore::new();
        assert!(store.put_object("", vec![1], None).await.is_err());
    }
}
