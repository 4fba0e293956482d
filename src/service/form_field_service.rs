use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::dto::form_field_dto::FormFieldRequest;
use crate::model::form_field::FormField;
use crate::model::timestamp;
use crate::repository::record_store::{ListQuery, RecordStore};
use crate::repository::Stores;
use crate::service::required_text;
use crate::util::error::ServiceError;

/// Custom questions appended to the lead intake form.
#[async_trait]
pub trait FormFieldService: Send + Sync {
    async fn create_field(&self, request: FormFieldRequest) -> Result<FormField, ServiceError>;
    async fn get_field(&self, id: ObjectId) -> Result<FormField, ServiceError>;
    async fn list_fields(&self) -> Result<Vec<FormField>, ServiceError>;
    async fn update_field(&self, id: ObjectId, request: FormFieldRequest) -> Result<FormField, ServiceError>;
    async fn delete_field(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct FormFieldServiceImpl {
    pub form_field_repo: Arc<dyn RecordStore<FormField>>,
}

impl FormFieldServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        FormFieldServiceImpl {
            form_field_repo: stores.form_fields.clone(),
        }
    }

    fn build_field(request: FormFieldRequest, sort_order: i32, existing: Option<&FormField>) -> Result<FormField, ServiceError> {
        request.validate()?;
        let label = required_text(&request.label, "Label is required")?;
        let options: Vec<String> = request
            .options
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if request.field_type.uses_options() && options.is_empty() {
            return Err(ServiceError::InvalidInput(format!("{} needs at least one option", label)));
        }
        let now = timestamp();
        Ok(FormField {
            id: existing.and_then(|f| f.id),
            label,
            field_type: request.field_type,
            required: request.required,
            options: if request.field_type.uses_options() { options } else { Vec::new() },
            sort_order,
            created_at: existing.and_then(|f| f.created_at.clone()).or_else(|| Some(now.clone())),
            updated_at: Some(now),
        })
    }
}

#[async_trait]
impl FormFieldService for FormFieldServiceImpl {
    /// New fields without an explicit `sortOrder` go to the end of the form.
    #[instrument(skip(self, request), fields(label = %request.label))]
    async fn create_field(&self, request: FormFieldRequest) -> Result<FormField, ServiceError> {
        let sort_order = match request.sort_order {
            Some(order) => order,
            None => i32::try_from(self.form_field_repo.count(doc! {}).await?).unwrap_or(i32::MAX),
        };
        let field = Self::build_field(request, sort_order, None)?;
        let res = self.form_field_repo.create(field).await;
        match &res {
            Ok(_) => info!("Form field created successfully"),
            Err(e) => error!("Failed to create form field: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_field(&self, id: ObjectId) -> Result<FormField, ServiceError> {
        self.form_field_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("Form field not found: {}", id))
            } else {
                ServiceError::from(e)
            }
        })
    }

    #[instrument(skip(self))]
    async fn list_fields(&self) -> Result<Vec<FormField>, ServiceError> {
        self.form_field_repo
            .find(doc! {}, ListQuery::all().sorted_by("sortOrder", false))
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_field(&self, id: ObjectId, request: FormFieldRequest) -> Result<FormField, ServiceError> {
        let existing = self.get_field(id).await?;
        let sort_order = request.sort_order.unwrap_or(existing.sort_order);
        let field = Self::build_field(request, sort_order, Some(&existing))?;
        let res = self.form_field_repo.update(id, field).await;
        if let Err(e) = &res {
            error!("Failed to update form field: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_field(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting form field");
        self.form_field_repo.delete(id).await.map_err(ServiceError::from)
    }
}
