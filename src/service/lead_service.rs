use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::dto::lead_dto::{LeadDetail, LeadListParams, LeadRequest};
use crate::dto::{non_blank, page_query};
use crate::model::employee::Employee;
use crate::model::form_field::FormField;
use crate::model::lead::{Lead, LeadStatus};
use crate::model::note::{sort_for_display, Note};
use crate::model::quotation::Quotation;
use crate::model::timestamp;
use crate::repository::record_store::{ListQuery, RecordStore};
use crate::repository::Stores;
use crate::service::pricing::apply_totals;
use crate::service::{parse_optional_date, parse_optional_id, required_text};
use crate::util::error::ServiceError;

#[async_trait]
pub trait LeadService: Send + Sync {
    async fn create_lead(&self, request: LeadRequest) -> Result<Lead, ServiceError>;
    async fn get_lead(&self, id: ObjectId) -> Result<Lead, ServiceError>;
    async fn get_lead_detail(&self, id: ObjectId) -> Result<LeadDetail, ServiceError>;
    async fn list_leads(&self, params: LeadListParams) -> Result<Vec<Lead>, ServiceError>;
    async fn update_lead(&self, id: ObjectId, request: LeadRequest) -> Result<Lead, ServiceError>;
    async fn update_lead_status(&self, id: ObjectId, status: &str) -> Result<Lead, ServiceError>;
    async fn assign_employee(&self, id: ObjectId, employee: Option<ObjectId>) -> Result<Lead, ServiceError>;
    async fn delete_lead(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct LeadServiceImpl {
    pub lead_repo: Arc<dyn RecordStore<Lead>>,
    pub employee_repo: Arc<dyn RecordStore<Employee>>,
    pub note_repo: Arc<dyn RecordStore<Note>>,
    pub quotation_repo: Arc<dyn RecordStore<Quotation>>,
    pub form_field_repo: Arc<dyn RecordStore<FormField>>,
}

/// Human-readable lead code, e.g. `LEAD-3F9A1C07`.
pub fn generate_lead_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("LEAD-{}", uuid[..8].to_ascii_uppercase())
}

impl LeadServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        LeadServiceImpl {
            lead_repo: stores.leads.clone(),
            employee_repo: stores.employees.clone(),
            note_repo: stores.notes.clone(),
            quotation_repo: stores.quotations.clone(),
            form_field_repo: stores.form_fields.clone(),
        }
    }

    async fn ensure_employee_exists(&self, id: ObjectId) -> Result<(), ServiceError> {
        match self.employee_repo.get_by_id(id).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(ServiceError::InvalidInput(format!("Employee not found: {}", id))),
            Err(e) => Err(ServiceError::from(e)),
        }
    }

    /// Every required custom question answered, every option answer valid.
    async fn check_custom_answers(&self, answers: &BTreeMap<String, String>) -> Result<(), ServiceError> {
        let fields = self
            .form_field_repo
            .find(doc! {}, ListQuery::all().sorted_by("sortOrder", false))
            .await?;
        let problems: Vec<String> = fields
            .iter()
            .filter_map(|field| {
                field
                    .check_answer(answers.get(&field.label).map(String::as_str))
                    .err()
            })
            .collect();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::InvalidInput(problems.join("; ")))
        }
    }

    /// Validates `request` and turns it into a lead; nothing is written here.
    async fn build_lead(&self, request: LeadRequest, existing: Option<&Lead>) -> Result<Lead, ServiceError> {
        request.validate()?;
        let full_name = required_text(&request.full_name, "Full name is required")?;

        // Edits that leave custom answers out keep the stored ones.
        let custom_answers: BTreeMap<String, String> = if request.custom_answers.is_empty() {
            existing.map(|lead| lead.custom_answers.clone()).unwrap_or_default()
        } else {
            request
                .custom_answers
                .into_iter()
                .filter(|(_, answer)| !answer.trim().is_empty())
                .collect()
        };
        self.check_custom_answers(&custom_answers).await?;

        let status = match non_blank(request.status) {
            Some(raw) => raw.parse::<LeadStatus>().map_err(ServiceError::InvalidInput)?,
            None => existing.map(|lead| lead.status).unwrap_or_default(),
        };
        let check_in_date = parse_optional_date(request.check_in_date, "Check-in date")?;
        let check_out_date = parse_optional_date(request.check_out_date, "Check-out date")?;
        if let (Some(check_in), Some(check_out)) = (check_in_date, check_out_date) {
            if check_out < check_in {
                return Err(ServiceError::InvalidInput(
                    "Check-out date cannot be before check-in date".to_string(),
                ));
            }
        }

        // Unassigning goes through `assign_employee`; an edit without an
        // employee keeps the current one.
        let assigned_employee = match parse_optional_id(request.assigned_employee, "employee")? {
            Some(employee) => {
                self.ensure_employee_exists(employee).await?;
                Some(employee)
            }
            None => existing.and_then(|lead| lead.assigned_employee),
        };

        let lead_id = non_blank(request.lead_id)
            .or_else(|| existing.map(|lead| lead.lead_id.clone()))
            .unwrap_or_else(generate_lead_id);
        let now = timestamp();

        Ok(Lead {
            id: existing.and_then(|lead| lead.id),
            lead_id,
            full_name,
            email: request.email.trim().to_string(),
            phone: non_blank(request.phone),
            status,
            check_in_date,
            check_out_date,
            notes: non_blank(request.notes),
            services: request
                .services
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            assigned_employee,
            custom_answers,
            created_at: existing
                .and_then(|lead| lead.created_at.clone())
                .or_else(|| Some(now.clone())),
            updated_at: Some(now),
        })
    }
}

#[async_trait]
impl LeadService for LeadServiceImpl {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn create_lead(&self, request: LeadRequest) -> Result<Lead, ServiceError> {
        info!("Creating lead");
        let lead = self.build_lead(request, None).await?;
        let res = self.lead_repo.create(lead).await;
        match &res {
            Ok(lead) => info!("Lead {} created", lead.lead_id),
            Err(e) => error!("Failed to create lead: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_lead(&self, id: ObjectId) -> Result<Lead, ServiceError> {
        self.lead_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("Lead not found: {}", id))
            } else {
                error!("Failed to fetch lead: {e}");
                ServiceError::from(e)
            }
        })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_lead_detail(&self, id: ObjectId) -> Result<LeadDetail, ServiceError> {
        info!("Getting lead detail");
        let lead = self.get_lead(id).await?;

        let mut notes = self.note_repo.find(doc! { "lead": id }, ListQuery::all()).await?;
        sort_for_display(&mut notes);

        let mut quotations = self
            .quotation_repo
            .find(doc! { "lead": id }, ListQuery::all().sorted_by("createdAt", true))
            .await?;
        for quotation in quotations.iter_mut() {
            apply_totals(quotation);
        }

        let assigned_employee = match lead.assigned_employee {
            Some(employee_id) => match self.employee_repo.get_by_id(employee_id).await {
                Ok(employee) => Some(employee),
                Err(e) if e.is_not_found() => {
                    warn!("Lead {} references missing employee {}", id, employee_id);
                    None
                }
                Err(e) => return Err(ServiceError::from(e)),
            },
            None => None,
        };

        Ok(LeadDetail {
            lead,
            notes,
            quotations,
            assigned_employee,
        })
    }

    #[instrument(skip(self, params))]
    async fn list_leads(&self, params: LeadListParams) -> Result<Vec<Lead>, ServiceError> {
        let mut filter = doc! {};
        match non_blank(params.status) {
            Some(raw) => {
                let status = raw.parse::<LeadStatus>().map_err(ServiceError::InvalidInput)?;
                filter.insert("status", status.as_str());
            }
            None if params.view.as_deref() == Some("all") => {}
            None => {
                let active: Vec<&str> = LeadStatus::ACTIVE.iter().map(LeadStatus::as_str).collect();
                filter.insert("status", doc! { "$in": active });
            }
        }
        if let Some(employee) = parse_optional_id(params.assigned_employee, "employee")? {
            filter.insert("assignedEmployee", employee);
        }

        let res = self.lead_repo.find(filter, page_query(params.page, params.limit)).await;
        match &res {
            Ok(leads) => info!("Fetched {} leads", leads.len()),
            Err(e) => error!("Failed to list leads: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_lead(&self, id: ObjectId, request: LeadRequest) -> Result<Lead, ServiceError> {
        info!("Updating lead");
        let existing = self.get_lead(id).await?;
        let lead = self.build_lead(request, Some(&existing)).await?;
        let res = self.lead_repo.update(id, lead).await;
        if let Err(e) = &res {
            error!("Failed to update lead: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id, status))]
    async fn update_lead_status(&self, id: ObjectId, status: &str) -> Result<Lead, ServiceError> {
        let status = status.parse::<LeadStatus>().map_err(ServiceError::InvalidInput)?;
        let mut lead = self.get_lead(id).await?;
        lead.status = status;
        lead.updated_at = Some(timestamp());
        let res = self.lead_repo.update(id, lead).await;
        match &res {
            Ok(_) => info!("Lead status set to {}", status),
            Err(e) => error!("Failed to update lead status: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id, employee = ?employee))]
    async fn assign_employee(&self, id: ObjectId, employee: Option<ObjectId>) -> Result<Lead, ServiceError> {
        let mut lead = self.get_lead(id).await?;
        if let Some(employee) = employee {
            self.ensure_employee_exists(employee).await?;
        }
        lead.assigned_employee = employee;
        lead.updated_at = Some(timestamp());
        let res = self.lead_repo.update(id, lead).await;
        match &res {
            Ok(_) if employee.is_some() => info!("Employee assigned"),
            Ok(_) => info!("Lead unassigned"),
            Err(e) => error!("Failed to assign employee: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    /// Removes the lead's notes and detaches its quotations before deleting it.
    #[instrument(skip(self), fields(id = %id))]
    async fn delete_lead(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting lead");
        self.get_lead(id).await?;

        let notes = self.note_repo.delete_many(doc! { "lead": id }).await?;
        let quotations = self
            .quotation_repo
            .update_many(doc! { "lead": id }, doc! { "lead": Bson::Null })
            .await?;
        info!("Removed {} notes and detached {} quotations", notes, quotations);

        let res = self.lead_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Lead deleted successfully"),
            Err(e) => error!("Failed to delete lead: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
