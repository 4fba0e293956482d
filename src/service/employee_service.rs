use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::dto::employee_dto::{EmployeeListParams, EmployeeRequest};
use crate::dto::{non_blank, page_query};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::lead::Lead;
use crate::model::timestamp;
use crate::repository::record_store::RecordStore;
use crate::repository::Stores;
use crate::service::required_text;
use crate::util::error::ServiceError;

#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn create_employee(&self, request: EmployeeRequest) -> Result<Employee, ServiceError>;
    async fn get_employee(&self, id: ObjectId) -> Result<Employee, ServiceError>;
    async fn list_employees(&self, params: EmployeeListParams) -> Result<Vec<Employee>, ServiceError>;
    async fn update_employee(&self, id: ObjectId, request: EmployeeRequest) -> Result<Employee, ServiceError>;
    async fn delete_employee(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct EmployeeServiceImpl {
    pub employee_repo: Arc<dyn RecordStore<Employee>>,
    pub lead_repo: Arc<dyn RecordStore<Lead>>,
}

impl EmployeeServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        EmployeeServiceImpl {
            employee_repo: stores.employees.clone(),
            lead_repo: stores.leads.clone(),
        }
    }

    fn build_employee(request: EmployeeRequest, existing: Option<&Employee>) -> Result<Employee, ServiceError> {
        request.validate()?;
        let name = required_text(&request.name, "Name is required")?;
        let status = match non_blank(request.status) {
            Some(raw) => raw.parse::<EmployeeStatus>().map_err(ServiceError::InvalidInput)?,
            None => existing.map(|e| e.status).unwrap_or_default(),
        };
        let now = timestamp();
        Ok(Employee {
            id: existing.and_then(|e| e.id),
            name,
            email: request.email.trim().to_ascii_lowercase(),
            phone: non_blank(request.phone),
            role: non_blank(request.role),
            department: non_blank(request.department),
            status,
            notes: non_blank(request.notes),
            created_at: existing.and_then(|e| e.created_at.clone()).or_else(|| Some(now.clone())),
            updated_at: Some(now),
        })
    }
}

#[async_trait]
impl EmployeeService for EmployeeServiceImpl {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn create_employee(&self, request: EmployeeRequest) -> Result<Employee, ServiceError> {
        info!("Creating employee");
        let employee = Self::build_employee(request, None)?;
        let res = self.employee_repo.create(employee).await;
        match &res {
            Ok(_) => info!("Employee created successfully"),
            Err(e) => error!("Failed to create employee: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_employee(&self, id: ObjectId) -> Result<Employee, ServiceError> {
        self.employee_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("Employee not found: {}", id))
            } else {
                ServiceError::from(e)
            }
        })
    }

    #[instrument(skip(self, params))]
    async fn list_employees(&self, params: EmployeeListParams) -> Result<Vec<Employee>, ServiceError> {
        let mut filter = doc! {};
        if let Some(raw) = non_blank(params.status) {
            let status = raw.parse::<EmployeeStatus>().map_err(ServiceError::InvalidInput)?;
            filter.insert("status", status.as_str());
        }
        let res = self.employee_repo.find(filter, page_query(params.page, params.limit)).await;
        match &res {
            Ok(employees) => info!("Fetched {} employees", employees.len()),
            Err(e) => error!("Failed to list employees: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_employee(&self, id: ObjectId, request: EmployeeRequest) -> Result<Employee, ServiceError> {
        let existing = self.get_employee(id).await?;
        let employee = Self::build_employee(request, Some(&existing))?;
        let res = self.employee_repo.update(id, employee).await;
        match &res {
            Ok(_) => info!("Employee updated successfully"),
            Err(e) => error!("Failed to update employee: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    /// Leads assigned to the employee are left unassigned.
    #[instrument(skip(self), fields(id = %id))]
    async fn delete_employee(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting employee");
        self.get_employee(id).await?;
        let unassigned = self
            .lead_repo
            .update_many(doc! { "assignedEmployee": id }, doc! { "assignedEmployee": Bson::Null })
            .await?;
        info!("Unassigned {} leads", unassigned);
        let res = self.employee_repo.delete(id).await;
        if let Err(e) = &res {
            error!("Failed to delete employee: {e}");
        }
        res.map_err(ServiceError::from)
    }
}
