use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use tracing::error;
use validator::Validate;

use crate::dto::quotation_dto::{QuotationListParams, QuotationRequest, UpdateQuotationStatusRequest};
use crate::handler::parse_object_id;
use crate::service::quotation_service::{QuotationService, QuotationServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::view::quotation_print::render_quotation;

pub async fn create_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Json(payload): Json<QuotationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotation = service
        .create_quotation(payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "create quotation"))?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

pub async fn preview_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Json(payload): Json<QuotationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let preview = service
        .preview_quotation(payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "calculate totals"))?;
    Ok(Json(preview))
}

pub async fn list_quotations_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Query(params): Query<QuotationListParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotations = service
        .list_quotations(params)
        .await
        .map_err(|e| HandlerError::from_service(e, "list quotations"))?;
    Ok(Json(quotations))
}

pub async fn get_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quotation")?;
    let quotation = service
        .get_quotation(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get quotation"))?;
    Ok(Json(quotation))
}

pub async fn update_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<QuotationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quotation")?;
    let quotation = service
        .update_quotation(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update quotation"))?;
    Ok(Json(quotation))
}

pub async fn update_quotation_status_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateQuotationStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quotation")?;
    if let Err(e) = payload.validate() {
        return Err(HandlerError::validation(format!("Validation error: {}", e)));
    }
    let quotation = service
        .update_quotation_status(id, &payload.status)
        .await
        .map_err(|e| HandlerError::from_service(e, "update status"))?;
    Ok(Json(quotation))
}

pub async fn duplicate_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quotation")?;
    let copy = service
        .duplicate_quotation(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "duplicate quotation"))?;
    Ok((StatusCode::CREATED, Json(copy)))
}

pub async fn delete_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quotation")?;
    service
        .delete_quotation(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete quotation"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn print_quotation_handler(
    State(service): State<Arc<QuotationServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quotation")?;
    let print = service
        .print_quotation(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "print quotation"))?;
    let html = render_quotation(&print).map_err(|e| {
        error!("[print_quotation_handler] Template error: {}", e);
        HandlerError {
            error: HandlerErrorKind::Internal,
            message: "Failed to print quotation".to_string(),
            details: None,
        }
    })?;
    Ok(Html(html))
}
