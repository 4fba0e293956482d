use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::employee::Employee;
use crate::model::lead::Lead;
use crate::model::note::Note;
use crate::model::quotation::Quotation;

/// Body of `POST /leads` and `PUT /leads/{id}`.
///
/// Dates are `YYYY-MM-DD` strings and the status is its kebab-case name; both
/// are parsed by the service so a bad value becomes a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    #[serde(default)]
    pub lead_id: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 40))]
    pub phone: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub check_in_date: Option<String>,

    #[serde(default)]
    pub check_out_date: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub services: Vec<String>,

    #[serde(default)]
    pub assigned_employee: Option<String>,

    #[serde(default)]
    pub custom_answers: BTreeMap<String, String>,
}

/// Prefix of intake form keys carrying custom question answers
/// (`custom.<field label>=<answer>`).
pub const CUSTOM_ANSWER_PREFIX: &str = "custom.";

impl LeadRequest {
    /// Builds a request from urlencoded intake form pairs.
    ///
    /// `services` may repeat or hold a comma separated list. Unknown keys are
    /// ignored.
    pub fn from_form(pairs: Vec<(String, String)>) -> Self {
        let mut request = LeadRequest::default();
        for (key, value) in pairs {
            if let Some(label) = key.strip_prefix(CUSTOM_ANSWER_PREFIX) {
                request.custom_answers.insert(label.to_string(), value);
                continue;
            }
            match key.as_str() {
                "leadId" => request.lead_id = Some(value),
                "fullName" => request.full_name = value.trim().to_string(),
                "email" => request.email = value.trim().to_string(),
                "phone" => request.phone = Some(value),
                "status" => request.status = Some(value),
                "checkInDate" => request.check_in_date = Some(value),
                "checkOutDate" => request.check_out_date = Some(value),
                "notes" => request.notes = Some(value),
                "assignedEmployee" => request.assigned_employee = Some(value),
                "services" => request.services.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                ),
                _ => {}
            }
        }
        request
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateLeadStatusRequest {
    #[validate(length(min = 2, max = 50))]
    pub status: String,
}

/// `employee: null` unassigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignEmployeeRequest {
    #[serde(default)]
    pub employee: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListParams {
    pub status: Option<String>,
    pub assigned_employee: Option<String>,
    /// `all` includes inactive statuses.
    pub view: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    pub lead: Lead,
    pub notes: Vec<Note>,
    pub quotations: Vec<Quotation>,
    pub assigned_employee: Option<Employee>,
}
