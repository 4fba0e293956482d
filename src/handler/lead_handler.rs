use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Form, Json,
};
use tracing::info;
use validator::Validate;

use crate::dto::lead_dto::{AssignEmployeeRequest, LeadListParams, LeadRequest, UpdateLeadStatusRequest};
use crate::handler::parse_object_id;
use crate::service::lead_service::{LeadService, LeadServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Json(payload): Json<LeadRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let lead = service
        .create_lead(payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "create lead"))?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// Browser intake form; redirects to the new lead on success.
pub async fn intake_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[intake_lead_handler] Intake form submitted");
    let request = LeadRequest::from_form(pairs);
    let lead = service
        .create_lead(request)
        .await
        .map_err(|e| HandlerError::from_service(e, "submit enquiry"))?;
    let location = match lead.id {
        Some(id) => format!("/leads/{}", id.to_hex()),
        None => "/leads".to_string(),
    };
    Ok(Redirect::to(&location))
}

pub async fn list_leads_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Query(params): Query<LeadListParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let leads = service
        .list_leads(params)
        .await
        .map_err(|e| HandlerError::from_service(e, "list leads"))?;
    Ok(Json(leads))
}

pub async fn get_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "lead")?;
    let detail = service
        .get_lead_detail(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get lead"))?;
    Ok(Json(detail))
}

pub async fn update_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<LeadRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "lead")?;
    let lead = service
        .update_lead(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update lead"))?;
    Ok(Json(lead))
}

pub async fn update_lead_status_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateLeadStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "lead")?;
    if let Err(e) = payload.validate() {
        return Err(HandlerError::validation(format!("Validation error: {}", e)));
    }
    let lead = service
        .update_lead_status(id, &payload.status)
        .await
        .map_err(|e| HandlerError::from_service(e, "update status"))?;
    Ok(Json(lead))
}

pub async fn assign_employee_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<AssignEmployeeRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "lead")?;
    let employee = match payload.employee.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_object_id(raw, "employee")?),
        None => None,
    };
    let lead = service
        .assign_employee(id, employee)
        .await
        .map_err(|e| HandlerError::from_service(e, "assign employee"))?;
    Ok(Json(lead))
}

pub async fn delete_lead_handler(
    State(service): State<Arc<LeadServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "lead")?;
    service
        .delete_lead(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete lead"))?;
    Ok(StatusCode::NO_CONTENT)
}
