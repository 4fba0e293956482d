pub mod memory_store;
pub mod mongo_store;
pub mod record_store;
pub mod repository_error;

use std::sync::Arc;

use mongodb::Database;

use crate::model::catalog::ServiceItem;
use crate::model::employee::Employee;
use crate::model::form_field::FormField;
use crate::model::lead::Lead;
use crate::model::note::Note;
use crate::model::quotation::Quotation;
use crate::model::storage::StorageFile;
use crate::repository::memory_store::InMemoryRecordStore;
use crate::repository::mongo_store::MongoRecordStore;
use crate::repository::record_store::RecordStore;
use crate::repository::repository_error::RepositoryResult;

/// One store handle per collection, shared by the services.
#[derive(Clone)]
pub struct Stores {
    pub leads: Arc<dyn RecordStore<Lead>>,
    pub employees: Arc<dyn RecordStore<Employee>>,
    pub quotations: Arc<dyn RecordStore<Quotation>>,
    pub notes: Arc<dyn RecordStore<Note>>,
    pub services: Arc<dyn RecordStore<ServiceItem>>,
    pub form_fields: Arc<dyn RecordStore<FormField>>,
    pub storage: Arc<dyn RecordStore<StorageFile>>,
}

impl Stores {
    /// MongoDB-backed stores; creates the unique indexes before returning.
    pub async fn mongo(db: &Database) -> RepositoryResult<Self> {
        let employees = MongoRecordStore::<Employee>::new(db);
        employees.ensure_indexes().await?;
        Ok(Stores {
            leads: Arc::new(MongoRecordStore::<Lead>::new(db)),
            employees: Arc::new(employees),
            quotations: Arc::new(MongoRecordStore::<Quotation>::new(db)),
            notes: Arc::new(MongoRecordStore::<Note>::new(db)),
            services: Arc::new(MongoRecordStore::<ServiceItem>::new(db)),
            form_fields: Arc::new(MongoRecordStore::<FormField>::new(db)),
            storage: Arc::new(MongoRecordStore::<StorageFile>::new(db)),
        })
    }

    pub fn in_memory() -> Self {
        Stores {
            leads: Arc::new(InMemoryRecordStore::<Lead>::new()),
            employees: Arc::new(InMemoryRecordStore::<Employee>::new()),
            quotations: Arc::new(InMemoryRecordStore::<Quotation>::new()),
            notes: Arc::new(InMemoryRecordStore::<Note>::new()),
            services: Arc::new(InMemoryRecordStore::<ServiceItem>::new()),
            form_fields: Arc::new(InMemoryRecordStore::<FormField>::new()),
            storage: Arc::new(InMemoryRecordStore::<StorageFile>::new()),
        }
    }
}
