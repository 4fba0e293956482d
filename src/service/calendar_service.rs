use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, Bson};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::model::lead::{Lead, LeadStatus};
use crate::repository::record_store::{ListQuery, RecordStore};
use crate::repository::Stores;
use crate::service::calendar::{build_calendar, view_range, CalendarDay, CalendarView};
use crate::service::in_storable_range;
use crate::util::error::ServiceError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub view: CalendarView,
    pub reference: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<CalendarDay>,
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn get_calendar(&self, view: CalendarView, reference: NaiveDate) -> Result<CalendarResponse, ServiceError>;
}

pub struct CalendarServiceImpl {
    pub lead_repo: Arc<dyn RecordStore<Lead>>,
}

impl CalendarServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        CalendarServiceImpl {
            lead_repo: stores.leads.clone(),
        }
    }
}

/// Active leads with a check-in or check-out between `start` and `end`.
pub fn active_leads_between(start: NaiveDate, end: NaiveDate) -> bson::Document {
    let active: Vec<Bson> = LeadStatus::ACTIVE.iter().map(|s| Bson::from(s.as_str())).collect();
    let range = doc! { "$gte": start.to_string(), "$lte": end.to_string() };
    doc! {
        "status": { "$in": active },
        "$or": [
            { "checkInDate": range.clone() },
            { "checkOutDate": range }
        ]
    }
}

#[async_trait]
impl CalendarService for CalendarServiceImpl {
    #[instrument(skip(self), fields(view = ?view, reference = %reference))]
    async fn get_calendar(&self, view: CalendarView, reference: NaiveDate) -> Result<CalendarResponse, ServiceError> {
        if !in_storable_range(reference) {
            return Err(ServiceError::InvalidInput(format!("Calendar date out of range: {}", reference)));
        }
        let (start, end) = view_range(view, reference);
        if !in_storable_range(start) || !in_storable_range(end) {
            return Err(ServiceError::InvalidInput(format!(
                "Calendar {:?} view around {} runs past year 9999",
                view,
                reference
            )));
        }
        let leads = self
            .lead_repo
            .find(active_leads_between(start, end), ListQuery::all())
            .await
            .map_err(|e| {
                error!("Failed to load calendar leads: {e}");
                ServiceError::from(e)
            })?;
        info!("Placing {} leads on the calendar", leads.len());
        Ok(CalendarResponse {
            view,
            reference,
            start,
            end,
            days: build_calendar(&leads, view, reference),
        })
    }
}
