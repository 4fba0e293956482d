//! Process-local record store used by the test suite and by
//! `STORE_BACKEND=memory` runs. Rows are kept as BSON documents so filters
//! behave the way they do against MongoDB.

use std::cmp::Ordering;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::repository::record_store::{ListQuery, Record, RecordStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

pub struct InMemoryRecordStore<T: Record> {
    rows: RwLock<Vec<T>>,
}

impl<T: Record> InMemoryRecordStore<T> {
    pub fn new() -> Self {
        InMemoryRecordStore { rows: RwLock::new(Vec::new()) }
    }

    fn check_unique(rows: &[T], candidate: &Document, skip_id: Option<ObjectId>) -> RepositoryResult<()> {
        for field in T::UNIQUE_FIELDS {
            let Some(value) = candidate.get(*field) else { continue };
            for row in rows {
                if skip_id.is_some() && row.id() == skip_id {
                    continue;
                }
                let existing = bson::to_document(row)?;
                if existing.get(*field) == Some(value) {
                    return Err(RepositoryError::already_exists(format!(
                        "Duplicate key: {}.{} = {}",
                        T::COLLECTION,
                        field,
                        value
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<T: Record> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryRecordStore<T> {
    async fn create(&self, mut record: T) -> RepositoryResult<T> {
        record.set_id(ObjectId::new());
        let candidate = bson::to_document(&record)?;
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, &candidate, None)?;
        rows.push(record.clone());
        debug!("Created {} {:?} in memory", T::LABEL, record.id());
        Ok(record)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<T> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("{} not found for ID: {}", T::LABEL, id)))
    }

    async fn find(&self, filter: Document, query: ListQuery) -> RepositoryResult<Vec<T>> {
        let rows = self.rows.read().await;
        let mut matched = Vec::new();
        for row in rows.iter() {
            let doc = bson::to_document(row)?;
            if matches(&doc, &filter) {
                matched.push((doc, row.clone()));
            }
        }

        if let Some(ref field) = query.sort_by {
            matched.sort_by(|(a, _), (b, _)| {
                let ordering = compare_values(
                    a.get(field).unwrap_or(&Bson::Null),
                    b.get(field).unwrap_or(&Bson::Null),
                )
                .unwrap_or(Ordering::Equal);
                if query.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let records = matched.into_iter().map(|(_, record)| record);
        Ok(if query.limit == 0 {
            records.collect()
        } else {
            records
                .skip(query.skip() as usize)
                .take(query.limit as usize)
                .collect()
        })
    }

    async fn update(&self, id: ObjectId, mut record: T) -> RepositoryResult<T> {
        record.set_id(id);
        let candidate = bson::to_document(&record)?;
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, &candidate, Some(id))?;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("No {} found to update for ID: {}", T::LABEL, id)))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn update_many(&self, filter: Document, changes: Document) -> RepositoryResult<u64> {
        let mut rows = self.rows.write().await;
        let mut updated = 0;
        for row in rows.iter_mut() {
            let mut doc = bson::to_document(&*row)?;
            if !matches(&doc, &filter) {
                continue;
            }
            for (key, value) in changes.iter() {
                doc.insert(key.clone(), value.clone());
            }
            *row = bson::from_document(doc)?;
            updated += 1;
        }
        info!("Updated {} {} record(s) in memory", updated, T::LABEL);
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != Some(id));
        if rows.len() == before {
            return Err(RepositoryError::not_found(format!("No {} found to delete for ID: {}", T::LABEL, id)));
        }
        Ok(())
    }

    async fn delete_many(&self, filter: Document) -> RepositoryResult<u64> {
        let mut rows = self.rows.write().await;
        let mut kept = Vec::with_capacity(rows.len());
        let mut deleted = 0;
        for row in rows.drain(..) {
            let doc = bson::to_document(&row)?;
            if matches(&doc, &filter) {
                deleted += 1;
            } else {
                kept.push(row);
            }
        }
        *rows = kept;
        Ok(deleted)
    }

    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        let rows = self.rows.read().await;
        let mut count = 0;
        for row in rows.iter() {
            if matches(&bson::to_document(row)?, &filter) {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Evaluates the subset of the MongoDB query language the services use.
pub fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        if key == "$or" {
            return match condition {
                Bson::Array(branches) => branches.iter().any(|branch| match branch {
                    Bson::Document(branch) => matches(doc, branch),
                    _ => false,
                }),
                _ => false,
            };
        }
        let value = doc.get(key).unwrap_or(&Bson::Null);
        match condition {
            Bson::Document(ops) if ops.keys().next().is_some_and(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, operand)| apply_operator(value, op, operand, doc.contains_key(key)))
            }
            _ => field_equals(value, condition),
        }
    })
}

fn apply_operator(value: &Bson, op: &str, operand: &Bson, present: bool) -> bool {
    match op {
        "$eq" => field_equals(value, operand),
        "$ne" => !field_equals(value, operand),
        "$in" => match operand {
            Bson::Array(options) => options.iter().any(|o| field_equals(value, o)),
            _ => false,
        },
        "$nin" => match operand {
            Bson::Array(options) => !options.iter().any(|o| field_equals(value, o)),
            _ => true,
        },
        "$gt" => compare_values(value, operand) == Some(Ordering::Greater),
        "$gte" => matches!(compare_values(value, operand), Some(Ordering::Greater | Ordering::Equal)),
        "$lt" => compare_values(value, operand) == Some(Ordering::Less),
        "$lte" => matches!(compare_values(value, operand), Some(Ordering::Less | Ordering::Equal)),
        "$exists" => present == operand.as_bool().unwrap_or(true),
        _ => false,
    }
}

/// Equality with MongoDB's array semantics: an array field matches a scalar
/// when any element does.
fn field_equals(value: &Bson, expected: &Bson) -> bool {
    if values_equal(value, expected) {
        return true;
    }
    match (value, expected) {
        (Bson::Array(items), expected) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, expected))
        }
        _ => false,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare_values(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.cmp(y)),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        (Bson::Null, _) => Some(Ordering::Less),
        (_, Bson::Null) => Some(Ordering::Greater),
        _ => None,
    }
}
