use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::catalog_dto::{ServiceItemRequest, ServiceListParams};
use crate::handler::parse_object_id;
use crate::service::catalog_service::{CatalogService, CatalogServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_service_handler(
    State(service): State<Arc<CatalogServiceImpl>>,
    Json(payload): Json<ServiceItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let item = service
        .create_service(payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "create service"))?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_services_handler(
    State(service): State<Arc<CatalogServiceImpl>>,
    Query(params): Query<ServiceListParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let items = service
        .list_services(params)
        .await
        .map_err(|e| HandlerError::from_service(e, "list services"))?;
    Ok(Json(items))
}

pub async fn get_service_handler(
    State(service): State<Arc<CatalogServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "service")?;
    let item = service
        .get_service(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get service"))?;
    Ok(Json(item))
}

pub async fn update_service_handler(
    State(service): State<Arc<CatalogServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<ServiceItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "service")?;
    let item = service
        .update_service(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update service"))?;
    Ok(Json(item))
}

pub async fn delete_service_handler(
    State(service): State<Arc<CatalogServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "service")?;
    service
        .delete_service(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete service"))?;
    Ok(StatusCode::NO_CONTENT)
}
