use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::config::CompanyConfig;
use crate::dto::quotation_dto::{QuotationListParams, QuotationPreview, QuotationPrint, QuotationRequest};
use crate::dto::{non_blank, page_query};
use crate::model::lead::Lead;
use crate::model::quotation::{Quotation, QuotationStatus};
use crate::model::timestamp;
use crate::repository::record_store::RecordStore;
use crate::repository::Stores;
use crate::service::pricing::{apply_totals, check_fee_percent, compute_totals};
use crate::service::{parse_optional_date, parse_optional_id, required_text};
use crate::util::error::ServiceError;

pub const COPY_SUFFIX: &str = " (Copy)";

#[async_trait]
pub trait QuotationService: Send + Sync {
    async fn create_quotation(&self, request: QuotationRequest) -> Result<Quotation, ServiceError>;
    async fn get_quotation(&self, id: ObjectId) -> Result<Quotation, ServiceError>;
    async fn list_quotations(&self, params: QuotationListParams) -> Result<Vec<Quotation>, ServiceError>;
    async fn update_quotation(&self, id: ObjectId, request: QuotationRequest) -> Result<Quotation, ServiceError>;
    async fn update_quotation_status(&self, id: ObjectId, status: &str) -> Result<Quotation, ServiceError>;
    async fn delete_quotation(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn duplicate_quotation(&self, id: ObjectId) -> Result<Quotation, ServiceError>;
    async fn preview_quotation(&self, request: QuotationRequest) -> Result<QuotationPreview, ServiceError>;
    async fn print_quotation(&self, id: ObjectId) -> Result<QuotationPrint, ServiceError>;
}

pub struct QuotationServiceImpl {
    pub quotation_repo: Arc<dyn RecordStore<Quotation>>,
    pub lead_repo: Arc<dyn RecordStore<Lead>>,
    pub company: CompanyConfig,
}

impl QuotationServiceImpl {
    pub fn new(stores: &Stores, company: CompanyConfig) -> Self {
        QuotationServiceImpl {
            quotation_repo: stores.quotations.clone(),
            lead_repo: stores.leads.clone(),
            company,
        }
    }

    async fn build_quotation(&self, request: QuotationRequest, existing: Option<&Quotation>) -> Result<Quotation, ServiceError> {
        request.validate()?;
        let title = required_text(&request.title, "Title is required")?;
        check_fee_percent(request.agency_fee_percent).map_err(ServiceError::InvalidInput)?;

        let lead = match parse_optional_id(request.lead, "lead")? {
            Some(lead) => {
                match self.lead_repo.get_by_id(lead).await {
                    Ok(_) => {}
                    Err(e) if e.is_not_found() => {
                        return Err(ServiceError::InvalidInput(format!("Lead not found: {}", lead)));
                    }
                    Err(e) => return Err(ServiceError::from(e)),
                }
                Some(lead)
            }
            // An edit without a lead keeps the one already linked.
            None => existing.and_then(|q| q.lead),
        };

        let status = match non_blank(request.status) {
            Some(raw) => raw.parse::<QuotationStatus>().map_err(ServiceError::InvalidInput)?,
            None => existing.map(|q| q.status).unwrap_or_default(),
        };
        let quotation_date = parse_optional_date(request.quotation_date, "Quotation date")?
            .or_else(|| existing.and_then(|q| q.quotation_date))
            .unwrap_or_else(|| Utc::now().date_naive());
        let now = timestamp();

        let mut quotation = Quotation {
            id: existing.and_then(|q| q.id),
            title,
            lead,
            status,
            quotation_date: Some(quotation_date),
            agency_fee_percent: request.agency_fee_percent,
            categories: request.categories,
            sub_total: 0.0,
            agency_fees: 0.0,
            grand_total: 0.0,
            notes: non_blank(request.notes),
            created_at: existing.and_then(|q| q.created_at.clone()).or_else(|| Some(now.clone())),
            updated_at: Some(now),
        };
        apply_totals(&mut quotation);
        Ok(quotation)
    }

    async fn find_quotation(&self, id: ObjectId) -> Result<Quotation, ServiceError> {
        self.quotation_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("Quotation not found: {}", id))
            } else {
                error!("Failed to fetch quotation: {e}");
                ServiceError::from(e)
            }
        })
    }
}

#[async_trait]
impl QuotationService for QuotationServiceImpl {
    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_quotation(&self, request: QuotationRequest) -> Result<Quotation, ServiceError> {
        info!("Creating quotation");
        let quotation = self.build_quotation(request, None).await?;
        let res = self.quotation_repo.create(quotation).await;
        match &res {
            Ok(q) => info!("Quotation created with grand total {}", q.grand_total),
            Err(e) => error!("Failed to create quotation: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    /// Totals are recomputed rather than trusted from storage.
    #[instrument(skip(self), fields(id = %id))]
    async fn get_quotation(&self, id: ObjectId) -> Result<Quotation, ServiceError> {
        let mut quotation = self.find_quotation(id).await?;
        apply_totals(&mut quotation);
        Ok(quotation)
    }

    #[instrument(skip(self, params))]
    async fn list_quotations(&self, params: QuotationListParams) -> Result<Vec<Quotation>, ServiceError> {
        let mut filter = doc! {};
        if let Some(lead) = parse_optional_id(params.lead, "lead")? {
            filter.insert("lead", lead);
        }
        if let Some(raw) = non_blank(params.status) {
            let status = raw.parse::<QuotationStatus>().map_err(ServiceError::InvalidInput)?;
            filter.insert("status", status.as_str());
        }
        let mut quotations = self
            .quotation_repo
            .find(filter, page_query(params.page, params.limit))
            .await
            .map_err(|e| {
                error!("Failed to list quotations: {e}");
                ServiceError::from(e)
            })?;
        for quotation in quotations.iter_mut() {
            apply_totals(quotation);
        }
        info!("Fetched {} quotations", quotations.len());
        Ok(quotations)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_quotation(&self, id: ObjectId, request: QuotationRequest) -> Result<Quotation, ServiceError> {
        info!("Updating quotation");
        let existing = self.find_quotation(id).await?;
        let quotation = self.build_quotation(request, Some(&existing)).await?;
        let res = self.quotation_repo.update(id, quotation).await;
        match &res {
            Ok(_) => info!("Quotation updated successfully"),
            Err(e) => error!("Failed to update quotation: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id, status))]
    async fn update_quotation_status(&self, id: ObjectId, status: &str) -> Result<Quotation, ServiceError> {
        let status = status.parse::<QuotationStatus>().map_err(ServiceError::InvalidInput)?;
        let mut quotation = self.find_quotation(id).await?;
        quotation.status = status;
        quotation.updated_at = Some(timestamp());
        apply_totals(&mut quotation);
        let res = self.quotation_repo.update(id, quotation).await;
        match &res {
            Ok(_) => info!("Quotation status set to {}", status),
            Err(e) => error!("Failed to update quotation status: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_quotation(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting quotation");
        let res = self.quotation_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Quotation deleted successfully"),
            Err(e) => error!("Failed to delete quotation: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    /// Same lead, categories and fee under a new id, back in draft.
    #[instrument(skip(self), fields(id = %id))]
    async fn duplicate_quotation(&self, id: ObjectId) -> Result<Quotation, ServiceError> {
        let original = self.find_quotation(id).await?;
        let now = timestamp();
        let mut copy = Quotation {
            id: None,
            title: format!("{}{}", original.title, COPY_SUFFIX),
            status: QuotationStatus::Draft,
            created_at: Some(now.clone()),
            updated_at: Some(now),
            ..original
        };
        apply_totals(&mut copy);
        let res = self.quotation_repo.create(copy).await;
        match &res {
            Ok(q) => info!("Quotation duplicated as {:?}", q.id),
            Err(e) => error!("Failed to duplicate quotation: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, request))]
    async fn preview_quotation(&self, request: QuotationRequest) -> Result<QuotationPreview, ServiceError> {
        check_fee_percent(request.agency_fee_percent).map_err(ServiceError::InvalidInput)?;
        let mut categories = request.categories;
        for item in categories.iter_mut().flat_map(|c| c.items.iter_mut()) {
            item.total = item.line_total();
        }
        let totals = compute_totals(&categories, request.agency_fee_percent);
        Ok(QuotationPreview { categories, totals })
    }

    /// A quotation whose lead was deleted prints without one.
    #[instrument(skip(self), fields(id = %id))]
    async fn print_quotation(&self, id: ObjectId) -> Result<QuotationPrint, ServiceError> {
        let quotation = self.get_quotation(id).await?;
        let lead = match quotation.lead {
            Some(lead_id) => match self.lead_repo.get_by_id(lead_id).await {
                Ok(lead) => Some(lead),
                Err(e) if e.is_not_found() => {
                    warn!("Quotation {} references missing lead {}", id, lead_id);
                    None
                }
                Err(e) => return Err(ServiceError::from(e)),
            },
            None => None,
        };
        Ok(QuotationPrint {
            quotation,
            lead,
            company: self.company.clone(),
        })
    }
}
