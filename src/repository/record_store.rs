//! Collection-scoped persistence primitives shared by every entity.
//!
//! Each entity implements [`Record`]; services talk to a
//! `dyn RecordStore<T>` and never to the driver directly. Filters are plain
//! BSON documents so the same filter works against MongoDB and the in-memory
//! store.

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::repository::repository_error::RepositoryResult;

/// A persisted entity living in its own collection.
pub trait Record:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + Unpin + 'static
{
    /// Collection name.
    const COLLECTION: &'static str;
    /// Human label used in log lines and error messages.
    const LABEL: &'static str;
    /// Fields backed by a unique index.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);
}

/// Paging and ordering for `find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size; 0 means unlimited.
    pub limit: u32,
    pub sort_by: Option<String>,
    pub descending: bool,
}

impl ListQuery {
    /// Every matching record, unsorted.
    pub fn all() -> Self {
        ListQuery {
            page: 1,
            limit: 0,
            sort_by: None,
            descending: false,
        }
    }

    pub fn page(page: u32, limit: u32) -> Self {
        ListQuery {
            page: page.max(1),
            limit,
            ..ListQuery::all()
        }
    }

    pub fn sorted_by(mut self, field: &str, descending: bool) -> Self {
        self.sort_by = Some(field.to_string());
        self.descending = descending;
        self
    }

    pub fn skip(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            u64::from(self.page.max(1) - 1) * u64::from(self.limit)
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery::page(1, 20).sorted_by("createdAt", true)
    }
}

#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Inserts `record` under a fresh id and returns it.
    async fn create(&self, record: T) -> RepositoryResult<T>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<T>;
    async fn find(&self, filter: Document, query: ListQuery) -> RepositoryResult<Vec<T>>;
    /// Replaces every field of the record with `id`.
    async fn update(&self, id: ObjectId, record: T) -> RepositoryResult<T>;
    /// Applies `$set: changes` to every match and returns how many matched.
    async fn update_many(&self, filter: Document, changes: Document) -> RepositoryResult<u64>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn delete_many(&self, filter: Document) -> RepositoryResult<u64>;
    async fn count(&self, filter: Document) -> RepositoryResult<u64>;

    async fn find_one(&self, filter: Document) -> RepositoryResult<Option<T>> {
        let mut found = self.find(filter, ListQuery::page(1, 1)).await?;
        Ok(if found.is_empty() { None } else { Some(found.remove(0)) })
    }
}
