//! Landing page summary.
//!
//! Every read is fail-soft: a store error is logged and the affected figure
//! falls back to zero or an empty list.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, Bson};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::model::employee::Employee;
use crate::model::lead::{Lead, LeadStatus};
use crate::model::quotation::Quotation;
use crate::repository::record_store::{ListQuery, RecordStore};
use crate::repository::repository_error::RepositoryResult;
use crate::repository::Stores;
use crate::service::pricing::apply_totals;

pub const RECENT_LIMIT: u32 = 5;
pub const UPCOMING_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_leads: u64,
    pub active_leads: u64,
    pub leads_by_status: BTreeMap<String, u64>,
    pub employee_count: u64,
    pub quotation_count: u64,
    pub recent_leads: Vec<Lead>,
    pub recent_quotations: Vec<Quotation>,
    pub upcoming_events: Vec<Lead>,
}

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn summary(&self, today: NaiveDate) -> DashboardSummary;
}

pub struct DashboardServiceImpl {
    pub lead_repo: Arc<dyn RecordStore<Lead>>,
    pub employee_repo: Arc<dyn RecordStore<Employee>>,
    pub quotation_repo: Arc<dyn RecordStore<Quotation>>,
}

impl DashboardServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        DashboardServiceImpl {
            lead_repo: stores.leads.clone(),
            employee_repo: stores.employees.clone(),
            quotation_repo: stores.quotations.clone(),
        }
    }
}

async fn or_default<T: Default>(what: &str, read: impl Future<Output = RepositoryResult<T>>) -> T {
    match read.await {
        Ok(value) => value,
        Err(e) => {
            warn!("Dashboard read '{}' failed: {}", what, e);
            T::default()
        }
    }
}

fn active_statuses() -> Bson {
    Bson::Array(LeadStatus::ACTIVE.iter().map(|s| Bson::from(s.as_str())).collect())
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    #[instrument(skip(self), fields(today = %today))]
    async fn summary(&self, today: NaiveDate) -> DashboardSummary {
        let total_leads = or_default("total leads", self.lead_repo.count(doc! {})).await;
        let active_leads = or_default(
            "active leads",
            self.lead_repo.count(doc! { "status": { "$in": active_statuses() } }),
        )
        .await;

        let mut leads_by_status = BTreeMap::new();
        for status in LeadStatus::ALL {
            let count = or_default(status.as_str(), self.lead_repo.count(doc! { "status": status.as_str() })).await;
            leads_by_status.insert(status.as_str().to_string(), count);
        }

        let employee_count = or_default("employees", self.employee_repo.count(doc! {})).await;
        let quotation_count = or_default("quotations", self.quotation_repo.count(doc! {})).await;

        let recent = ListQuery::page(1, RECENT_LIMIT).sorted_by("createdAt", true);
        let recent_leads = or_default("recent leads", self.lead_repo.find(doc! {}, recent.clone())).await;
        let mut recent_quotations = or_default("recent quotations", self.quotation_repo.find(doc! {}, recent)).await;
        for quotation in recent_quotations.iter_mut() {
            apply_totals(quotation);
        }

        let horizon = today + Duration::days(UPCOMING_DAYS);
        let upcoming_events = or_default(
            "upcoming events",
            self.lead_repo.find(
                doc! {
                    "status": { "$in": active_statuses() },
                    "checkInDate": { "$gte": today.to_string(), "$lte": horizon.to_string() }
                },
                ListQuery::all().sorted_by("checkInDate", false),
            ),
        )
        .await;

        info!("Dashboard built: {} leads, {} upcoming", total_leads, upcoming_events.len());
        DashboardSummary {
            total_leads,
            active_leads,
            leads_by_status,
            employee_count,
            quotation_count,
            recent_leads,
            recent_quotations,
            upcoming_events,
        }
    }
}
