use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::{ClientOptions, Credential, FindOptions, IndexOptions, ResolverConfig};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{error, info, instrument};

use crate::config::MongoConfig;
use crate::repository::record_store::{ListQuery, Record, RecordStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Opens a client from `MongoConfig` and returns the configured database.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some(config.app_name.clone());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let client = Client::with_options(client_options)?;
    info!(database = %config.database, "Connected to MongoDB");
    Ok(client.database(&config.database))
}

pub struct MongoRecordStore<T: Record> {
    collection: Collection<T>,
}

impl<T: Record> MongoRecordStore<T> {
    pub fn new(db: &Database) -> Self {
        MongoRecordStore {
            collection: db.collection::<T>(T::COLLECTION),
        }
    }

    /// Creates the unique indexes declared by `T::UNIQUE_FIELDS`.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        for field in T::UNIQUE_FIELDS {
            let mut keys = Document::new();
            keys.insert(*field, 1);
            let options = IndexOptions::builder().unique(true).build();
            let model = IndexModel::builder().keys(keys).options(options).build();
            self.collection.create_index(model, None).await.map_err(|e| {
                error!("Failed to create unique index on {}.{}: {}", T::COLLECTION, field, e);
                RepositoryError::from(e)
            })?;
            info!("Unique index ensured on {}.{}", T::COLLECTION, field);
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MongoRecordStore<T> {
    #[instrument(skip(self, record), fields(collection = T::COLLECTION))]
    async fn create(&self, mut record: T) -> RepositoryResult<T> {
        record.set_id(ObjectId::new());
        match self.collection.insert_one(&record, None).await {
            Ok(_) => {
                info!("Created {} {:?}", T::LABEL, record.id());
                Ok(record)
            }
            Err(e) => {
                error!("Failed to create {}: {}", T::LABEL, e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION, id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<T> {
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(RepositoryError::not_found(format!("{} not found for ID: {}", T::LABEL, id))),
            Err(e) => {
                error!("Failed to fetch {} by ID: {}", T::LABEL, e);
                Err(RepositoryError::database(format!("Failed to fetch {} by ID: {}", T::LABEL, e)))
            }
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find(&self, filter: Document, query: ListQuery) -> RepositoryResult<Vec<T>> {
        let mut options = FindOptions::default();
        if query.limit > 0 {
            options.skip = Some(query.skip());
            options.limit = Some(i64::from(query.limit));
        }
        if let Some(ref field) = query.sort_by {
            let mut sort = Document::new();
            sort.insert(field.as_str(), if query.descending { -1 } else { 1 });
            options.sort = Some(sort);
        }

        let mut cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to query {}: {}", T::COLLECTION, e);
            RepositoryError::database(format!("Failed to query {}: {}", T::COLLECTION, e))
        })?;

        let mut records = Vec::new();
        while let Some(record) = cursor.next().await {
            match record {
                Ok(r) => records.push(r),
                Err(e) => {
                    error!("Failed to deserialize {}: {}", T::LABEL, e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize {}: {}", T::LABEL, e)));
                }
            }
        }
        Ok(records)
    }

    #[instrument(skip(self, record), fields(collection = T::COLLECTION, id = %id))]
    async fn update(&self, id: ObjectId, mut record: T) -> RepositoryResult<T> {
        record.set_id(id);
        let mut changes = bson::to_document(&record)?;
        changes.remove("_id");
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": changes }, None)
            .await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!("Updated {} {}", T::LABEL, id);
                Ok(record)
            }
            Ok(_) => Err(RepositoryError::not_found(format!("No {} found to update for ID: {}", T::LABEL, id))),
            Err(e) => {
                error!("Failed to update {}: {}", T::LABEL, e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn update_many(&self, filter: Document, changes: Document) -> RepositoryResult<u64> {
        let result = self
            .collection
            .update_many(filter, doc! { "$set": changes }, None)
            .await
            .map_err(|e| {
                error!("Failed to update {} records: {}", T::LABEL, e);
                RepositoryError::from(e)
            })?;
        Ok(result.matched_count)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION, id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        match self.collection.delete_one(doc! { "_id": id }, None).await {
            Ok(result) if result.deleted_count > 0 => {
                info!("Deleted {} {}", T::LABEL, id);
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!("No {} found to delete for ID: {}", T::LABEL, id))),
            Err(e) => {
                error!("Failed to delete {}: {}", T::LABEL, e);
                Err(RepositoryError::database(format!("Failed to delete {}: {}", T::LABEL, e)))
            }
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete_many(&self, filter: Document) -> RepositoryResult<u64> {
        let result = self.collection.delete_many(filter, None).await.map_err(|e| {
            error!("Failed to delete {} records: {}", T::LABEL, e);
            RepositoryError::from(e)
        })?;
        Ok(result.deleted_count)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        self.collection.count_documents(filter, None).await.map_err(|e| {
            error!("Failed to count {}: {}", T::COLLECTION, e);
            RepositoryError::database(format!("Failed to count {}: {}", T::COLLECTION, e))
        })
    }
}
