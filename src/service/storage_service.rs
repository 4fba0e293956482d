use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use crate::dto::storage_dto::{StorageListParams, UpdateStorageRequest, UploadedFile};
use crate::dto::{non_blank, page_query};
use crate::model::storage::{StorageFile, StorageStatus, StorageType};
use crate::model::timestamp;
use crate::repository::record_store::RecordStore;
use crate::repository::Stores;
use crate::util::error::ServiceError;
use crate::util::object_store::{ObjectStore, ObjectStoreError};

pub const STORAGE_PREFIX: &str = "storage";

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn upload_file(&self, file: UploadedFile, name: Option<String>, tags: Vec<String>) -> Result<StorageFile, ServiceError>;
    async fn get_file(&self, id: ObjectId) -> Result<StorageFile, ServiceError>;
    async fn list_files(&self, params: StorageListParams) -> Result<Vec<StorageFile>, ServiceError>;
    async fn update_file(&self, id: ObjectId, request: UpdateStorageRequest) -> Result<StorageFile, ServiceError>;
    async fn delete_file(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn download_file(&self, id: ObjectId) -> Result<(StorageFile, Bytes), ServiceError>;
    async fn fetch_object(&self, key: &str) -> Result<Bytes, ServiceError>;
}

pub struct StorageServiceImpl {
    pub storage_repo: Arc<dyn RecordStore<StorageFile>>,
    pub object_store: Arc<dyn ObjectStore>,
}

/// `storage/<uuid>.<ext>`; the extension is kept when the name has one.
pub fn object_key_for(filename: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    format!("{}/{}{}", STORAGE_PREFIX, uuid, extension)
}

fn object_error(e: ObjectStoreError) -> ServiceError {
    match e {
        ObjectStoreError::ObjectNotFound(key) => ServiceError::NotFound(format!("File content not found: {}", key)),
        ObjectStoreError::InvalidArguments(msg) => ServiceError::InvalidInput(msg),
        other => ServiceError::InternalError(format!("Object store error: {}", other)),
    }
}

impl StorageServiceImpl {
    pub fn new(stores: &Stores, object_store: Arc<dyn ObjectStore>) -> Self {
        StorageServiceImpl {
            storage_repo: stores.storage.clone(),
            object_store,
        }
    }
}

#[async_trait]
impl StorageService for StorageServiceImpl {
    #[instrument(skip(self, file, tags), fields(filename = %file.filename, size = file.content.len()))]
    async fn upload_file(&self, file: UploadedFile, name: Option<String>, tags: Vec<String>) -> Result<StorageFile, ServiceError> {
        if file.content.is_empty() {
            return Err(ServiceError::InvalidInput("No file uploaded".to_string()));
        }
        let key = object_key_for(&file.filename);
        let content_type = non_blank(Some(file.content_type.clone()));
        let size = file.content.len() as u64;
        let file_type = StorageType::detect(&file.content_type, &file.filename);

        info!("Uploading {} bytes to {}", size, key);
        self.object_store
            .put_object(&key, file.content, content_type.as_deref())
            .await
            .map_err(|e| {
                error!("Failed to upload file: {e}");
                object_error(e)
            })?;

        let now = timestamp();
        let record = StorageFile {
            id: None,
            name: non_blank(name).unwrap_or(file.filename),
            file_type,
            size,
            url: self.object_store.object_url(&key),
            object_key: key.clone(),
            content_type,
            status: StorageStatus::Active,
            tags,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        match self.storage_repo.create(record).await {
            Ok(created) => {
                info!("File stored successfully");
                Ok(created)
            }
            Err(e) => {
                error!("Failed to save file metadata: {e}");
                if let Err(cleanup) = self.object_store.remove_object(&key).await {
                    warn!("Could not remove orphaned object {}: {}", key, cleanup);
                }
                Err(ServiceError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_file(&self, id: ObjectId) -> Result<StorageFile, ServiceError> {
        self.storage_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("File not found: {}", id))
            } else {
                ServiceError::from(e)
            }
        })
    }

    #[instrument(skip(self, params))]
    async fn list_files(&self, params: StorageListParams) -> Result<Vec<StorageFile>, ServiceError> {
        let mut filter = doc! {};
        if let Some(raw) = non_blank(params.status) {
            let status = raw.parse::<StorageStatus>().map_err(ServiceError::InvalidInput)?;
            filter.insert("status", status.as_str());
        }
        if let Some(tag) = non_blank(params.tag) {
            filter.insert("tags", tag);
        }
        let res = self.storage_repo.find(filter, page_query(params.page, params.limit)).await;
        match &res {
            Ok(files) => info!("Fetched {} files", files.len()),
            Err(e) => error!("Failed to list files: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_file(&self, id: ObjectId, request: UpdateStorageRequest) -> Result<StorageFile, ServiceError> {
        let mut file = self.get_file(id).await?;
        if let Some(name) = non_blank(request.name) {
            file.name = name;
        }
        if let Some(raw) = non_blank(request.status) {
            file.status = raw.parse::<StorageStatus>().map_err(ServiceError::InvalidInput)?;
        }
        if let Some(tags) = request.tags {
            file.tags = tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        file.updated_at = Some(timestamp());
        let res = self.storage_repo.update(id, file).await;
        if let Err(e) = &res {
            error!("Failed to update file: {e}");
        }
        res.map_err(ServiceError::from)
    }

    /// Removes the object first, then the record. A missing object does not
    /// block deleting the record.
    #[instrument(skip(self), fields(id = %id))]
    async fn delete_file(&self, id: ObjectId) -> Result<(), ServiceError> {
        let file = self.get_file(id).await?;
        match self.object_store.remove_object(&file.object_key).await {
            Ok(()) => {}
            Err(ObjectStoreError::ObjectNotFound(key)) => warn!("Object {} already gone", key),
            Err(e) => {
                error!("Failed to remove object: {e}");
                return Err(object_error(e));
            }
        }
        let res = self.storage_repo.delete(id).await;
        match &res {
            Ok(_) => info!("File deleted successfully"),
            Err(e) => error!("Failed to delete file record: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn download_file(&self, id: ObjectId) -> Result<(StorageFile, Bytes), ServiceError> {
        let file = self.get_file(id).await?;
        let data = self.object_store.get_object(&file.object_key).await.map_err(object_error)?;
        Ok((file, data))
    }

    #[instrument(skip(self))]
    async fn fetch_object(&self, key: &str) -> Result<Bytes, ServiceError> {
        if !key.starts_with(STORAGE_PREFIX) {
            return Err(ServiceError::NotFound(format!("File not found: {}", key)));
        }
        self.object_store.get_object(key).await.map_err(object_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key_for("Floor Plan.PDF");
        assert!(key.starts_with("storage/"));
        assert!(key.ends_with(".pdf"));
        assert_eq!(key.len(), "storage/".len() + 36 + ".pdf".len());
    }

    #[test]
    fn test_object_key_without_extension() {
        let key = object_key_for("README");
        assert_eq!(key.len(), "storage/".len() + 36);
        assert!(!object_key_for("weird.name with space").contains(' '));
    }
}
