use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::record_store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Approved,
    Rejected,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Approved => "approved",
            QuotationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(QuotationStatus::Draft),
            "sent" => Ok(QuotationStatus::Sent),
            "approved" => Ok(QuotationStatus::Approved),
            "rejected" => Ok(QuotationStatus::Rejected),
            other => Err(format!("Unknown quotation status: {}", other)),
        }
    }
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub particulars: String,
    /// Unit price.
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub remarks: Option<String>,
    /// amount × quantity, refreshed by the totals calculator.
    #[serde(default)]
    pub total: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.amount * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_name: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Owning lead; null once the lead has been deleted.
    #[serde(default)]
    pub lead: Option<ObjectId>,
    #[serde(default)]
    pub status: QuotationStatus,
    #[serde(default)]
    pub quotation_date: Option<NaiveDate>,
    #[serde(default)]
    pub agency_fee_percent: f64,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub agency_fees: f64,
    #[serde(default)]
    pub grand_total: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for Quotation {
    const COLLECTION: &'static str = "quotations";
    const LABEL: &'static str = "quotation";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_defaults() {
        let item: LineItem = serde_json::from_str(r#"{"particulars": "Chairs"}"#).unwrap();
        assert_eq!(item.amount, 0.0);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.line_total(), 0.0);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Approved".parse::<QuotationStatus>().unwrap(), QuotationStatus::Approved);
        assert!("pending".parse::<QuotationStatus>().is_err());
    }
}
