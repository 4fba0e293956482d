use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::employee_dto::{EmployeeListParams, EmployeeRequest};
use crate::handler::parse_object_id;
use crate::service::employee_service::{EmployeeService, EmployeeServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_employee_handler(
    State(service): State<Arc<EmployeeServiceImpl>>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let employee = service
        .create_employee(payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "create employee"))?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list_employees_handler(
    State(service): State<Arc<EmployeeServiceImpl>>,
    Query(params): Query<EmployeeListParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let employees = service
        .list_employees(params)
        .await
        .map_err(|e| HandlerError::from_service(e, "list employees"))?;
    Ok(Json(employees))
}

pub async fn get_employee_handler(
    State(service): State<Arc<EmployeeServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "employee")?;
    let employee = service
        .get_employee(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get employee"))?;
    Ok(Json(employee))
}

pub async fn update_employee_handler(
    State(service): State<Arc<EmployeeServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "employee")?;
    let employee = service
        .update_employee(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update employee"))?;
    Ok(Json(employee))
}

pub async fn delete_employee_handler(
    State(service): State<Arc<EmployeeServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "employee")?;
    service
        .delete_employee(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete employee"))?;
    Ok(StatusCode::NO_CONTENT)
}
