use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::form_field_dto::FormFieldRequest;
use crate::handler::parse_object_id;
use crate::service::form_field_service::{FormFieldService, FormFieldServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_form_field_handler(
    State(service): State<Arc<FormFieldServiceImpl>>,
    Json(payload): Json<FormFieldRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let field = service
        .create_field(payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "create form field"))?;
    Ok((StatusCode::CREATED, Json(field)))
}

pub async fn list_form_fields_handler(
    State(service): State<Arc<FormFieldServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let fields = service
        .list_fields()
        .await
        .map_err(|e| HandlerError::from_service(e, "list form fields"))?;
    Ok(Json(fields))
}

pub async fn get_form_field_handler(
    State(service): State<Arc<FormFieldServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "form field")?;
    let field = service
        .get_field(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get form field"))?;
    Ok(Json(field))
}

pub async fn update_form_field_handler(
    State(service): State<Arc<FormFieldServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<FormFieldRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "form field")?;
    let field = service
        .update_field(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update form field"))?;
    Ok(Json(field))
}

pub async fn delete_form_field_handler(
    State(service): State<Arc<FormFieldServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "form field")?;
    service
        .delete_field(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete form field"))?;
    Ok(StatusCode::NO_CONTENT)
}
