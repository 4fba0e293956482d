use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::CompanyConfig;
use crate::model::lead::Lead;
use crate::model::quotation::{Category, Quotation};
use crate::service::pricing::QuotationTotals;

/// Body of `POST /quotations`, `PUT /quotations/{id}` and
/// `POST /quotations/preview`.
///
/// Totals are never read from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub lead: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub quotation_date: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Agency fee must be between 0 and 100"))]
    pub agency_fee_percent: f64,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuotationStatusRequest {
    #[validate(length(min = 2, max = 50))]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationListParams {
    pub lead: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Everything the print page needs.
#[derive(Debug, Clone)]
pub struct QuotationPrint {
    pub quotation: Quotation,
    pub lead: Option<Lead>,
    pub company: CompanyConfig,
}

/// Live totals for an unsaved quotation form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPreview {
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub totals: QuotationTotals,
}
