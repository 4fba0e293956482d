use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use crate::service::dashboard_service::{DashboardService, DashboardServiceImpl};

pub async fn dashboard_handler(State(service): State<Arc<DashboardServiceImpl>>) -> impl IntoResponse {
    Json(service.summary(Utc::now().date_naive()).await)
}
