use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::{info, warn};

use crate::config::{AppConfig, CompanyConfig, MinioConfig, MongoConfig, StoreBackend};
use crate::repository::mongo_store::connect;
use crate::repository::Stores;
use crate::router::calendar_router::calendar_router;
use crate::router::catalog_router::catalog_router;
use crate::router::dashboard_router::dashboard_router;
use crate::router::employee_router::employee_router;
use crate::router::form_field_router::form_field_router;
use crate::router::lead_router::lead_router;
use crate::router::note_router::note_router;
use crate::router::quotation_router::quotation_router;
use crate::router::storage_router::storage_router;
use crate::service::calendar_service::CalendarServiceImpl;
use crate::service::catalog_service::CatalogServiceImpl;
use crate::service::dashboard_service::DashboardServiceImpl;
use crate::service::employee_service::EmployeeServiceImpl;
use crate::service::form_field_service::FormFieldServiceImpl;
use crate::service::lead_service::LeadServiceImpl;
use crate::service::note_service::NoteServiceImpl;
use crate::service::quotation_service::QuotationServiceImpl;
use crate::service::storage_service::StorageServiceImpl;
use crate::util::minio::MinioService;
use crate::util::object_store::{InMemoryObjectStore, ObjectStore};

/// Every service handle, shared with the routers.
#[derive(Clone)]
pub struct Services {
    pub lead_service: Arc<LeadServiceImpl>,
    pub employee_service: Arc<EmployeeServiceImpl>,
    pub quotation_service: Arc<QuotationServiceImpl>,
    pub note_service: Arc<NoteServiceImpl>,
    pub catalog_service: Arc<CatalogServiceImpl>,
    pub form_field_service: Arc<FormFieldServiceImpl>,
    pub storage_service: Arc<StorageServiceImpl>,
    pub calendar_service: Arc<CalendarServiceImpl>,
    pub dashboard_service: Arc<DashboardServiceImpl>,
}

impl Services {
    pub fn new(stores: &Stores, object_store: Arc<dyn ObjectStore>, company: CompanyConfig) -> Self {
        Services {
            lead_service: Arc::new(LeadServiceImpl::new(stores)),
            employee_service: Arc::new(EmployeeServiceImpl::new(stores)),
            quotation_service: Arc::new(QuotationServiceImpl::new(stores, company)),
            note_service: Arc::new(NoteServiceImpl::new(stores)),
            catalog_service: Arc::new(CatalogServiceImpl::new(stores)),
            form_field_service: Arc::new(FormFieldServiceImpl::new(stores)),
            storage_service: Arc::new(StorageServiceImpl::new(stores, object_store)),
            calendar_service: Arc::new(CalendarServiceImpl::new(stores)),
            dashboard_service: Arc::new(DashboardServiceImpl::new(stores)),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .merge(lead_router(self.lead_service.clone()))
            .merge(note_router(self.note_service.clone()))
            .merge(employee_router(self.employee_service.clone()))
            .merge(quotation_router(self.quotation_service.clone()))
            .merge(catalog_router(self.catalog_service.clone()))
            .merge(form_field_router(self.form_field_service.clone()))
            .merge(storage_router(self.storage_service.clone()))
            .merge(calendar_router(self.calendar_service.clone()))
            .merge(dashboard_router(self.dashboard_service.clone()))
            .route("/health", get(|| async { "OK" }))
    }
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub services: Services,
}

impl App {
    /// Wires stores and services from the environment.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env()?;
        let company = CompanyConfig::from_env()?;

        let stores = match config.store_backend {
            StoreBackend::Mongo => {
                let mongo_config = MongoConfig::from_env()?;
                let db = connect(&mongo_config).await?;
                Stores::mongo(&db).await?
            }
            StoreBackend::Memory => {
                warn!("Using the in-memory record store; data is lost on restart");
                Stores::in_memory()
            }
        };

        let object_store: Arc<dyn ObjectStore> = match MinioConfig::from_env() {
            Ok(minio_config) => Arc::new(MinioService::new(minio_config).await?),
            Err(e) => {
                warn!("MinIO not configured ({}), keeping uploads in memory", e);
                Arc::new(InMemoryObjectStore::new())
            }
        };

        Ok(Self::with_stores(config, &stores, object_store, company))
    }

    pub fn with_stores(config: AppConfig, stores: &Stores, object_store: Arc<dyn ObjectStore>, company: CompanyConfig) -> Self {
        let services = Services::new(stores, object_store, company);
        let router = services.router();
        App { config, router, services }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
