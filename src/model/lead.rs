use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::record_store::Record;

/// Sales pipeline position of a lead.
///
/// There is no enforced transition graph: any status may be replaced by any
/// other through the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    #[default]
    Opportunity,
    Prospect,
    InProgress,
    Won,
    Lost,
    NoResponse,
    Disqualified,
    LostProspect,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 8] = [
        LeadStatus::Opportunity,
        LeadStatus::Prospect,
        LeadStatus::InProgress,
        LeadStatus::Won,
        LeadStatus::Lost,
        LeadStatus::NoResponse,
        LeadStatus::Disqualified,
        LeadStatus::LostProspect,
    ];

    /// Statuses shown in the default lead list, the calendar and the dashboard.
    pub const ACTIVE: [LeadStatus; 4] = [
        LeadStatus::Opportunity,
        LeadStatus::Prospect,
        LeadStatus::InProgress,
        LeadStatus::Won,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Opportunity => "opportunity",
            LeadStatus::Prospect => "prospect",
            LeadStatus::InProgress => "in-progress",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
            LeadStatus::NoResponse => "no-response",
            LeadStatus::Disqualified => "disqualified",
            LeadStatus::LostProspect => "lost-prospect",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        LeadStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown lead status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub lead_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub assigned_employee: Option<ObjectId>,
    /// Answers to admin-defined intake questions, keyed by field label.
    #[serde(default)]
    pub custom_answers: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Lead {
    /// True when either the check-in or the check-out date is `day`.
    pub fn touches_day(&self, day: NaiveDate) -> bool {
        self.check_in_date == Some(day) || self.check_out_date == Some(day)
    }
}

impl Record for Lead {
    const COLLECTION: &'static str = "leads";
    const LABEL: &'static str = "lead";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}
