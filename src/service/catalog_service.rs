use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::dto::catalog_dto::{ServiceItemRequest, ServiceListParams};
use crate::dto::non_blank;
use crate::model::catalog::ServiceItem;
use crate::model::timestamp;
use crate::repository::record_store::{ListQuery, RecordStore};
use crate::repository::Stores;
use crate::service::required_text;
use crate::util::error::ServiceError;

/// The priced catalog of services offered to clients.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_service(&self, request: ServiceItemRequest) -> Result<ServiceItem, ServiceError>;
    async fn get_service(&self, id: ObjectId) -> Result<ServiceItem, ServiceError>;
    async fn list_services(&self, params: ServiceListParams) -> Result<Vec<ServiceItem>, ServiceError>;
    async fn update_service(&self, id: ObjectId, request: ServiceItemRequest) -> Result<ServiceItem, ServiceError>;
    async fn delete_service(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct CatalogServiceImpl {
    pub service_repo: Arc<dyn RecordStore<ServiceItem>>,
}

impl CatalogServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        CatalogServiceImpl {
            service_repo: stores.services.clone(),
        }
    }

    fn build_item(request: ServiceItemRequest, existing: Option<&ServiceItem>) -> Result<ServiceItem, ServiceError> {
        request.validate()?;
        let name = required_text(&request.name, "Service name is required")?;
        if !request.price.is_finite() {
            return Err(ServiceError::InvalidInput("Price must be a number".to_string()));
        }
        let now = timestamp();
        Ok(ServiceItem {
            id: existing.and_then(|s| s.id),
            name,
            category: non_blank(request.category),
            unit: non_blank(request.unit),
            price: request.price,
            description: non_blank(request.description),
            active: request.active.or(existing.map(|s| s.active)).unwrap_or(true),
            created_at: existing.and_then(|s| s.created_at.clone()).or_else(|| Some(now.clone())),
            updated_at: Some(now),
        })
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_service(&self, request: ServiceItemRequest) -> Result<ServiceItem, ServiceError> {
        let item = Self::build_item(request, None)?;
        let res = self.service_repo.create(item).await;
        match &res {
            Ok(_) => info!("Service created successfully"),
            Err(e) => error!("Failed to create service: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_service(&self, id: ObjectId) -> Result<ServiceItem, ServiceError> {
        self.service_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("Service not found: {}", id))
            } else {
                ServiceError::from(e)
            }
        })
    }

    #[instrument(skip(self, params))]
    async fn list_services(&self, params: ServiceListParams) -> Result<Vec<ServiceItem>, ServiceError> {
        let mut filter = doc! {};
        if params.active == Some(true) {
            filter.insert("active", true);
        }
        if let Some(category) = non_blank(params.category) {
            filter.insert("category", category);
        }
        let res = self.service_repo.find(filter, ListQuery::all().sorted_by("name", false)).await;
        match &res {
            Ok(items) => info!("Fetched {} services", items.len()),
            Err(e) => error!("Failed to list services: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_service(&self, id: ObjectId, request: ServiceItemRequest) -> Result<ServiceItem, ServiceError> {
        let existing = self.get_service(id).await?;
        let item = Self::build_item(request, Some(&existing))?;
        self.service_repo.update(id, item).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_service(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting service");
        self.service_repo.delete(id).await.map_err(ServiceError::from)
    }
}
