use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::dashboard_handler::dashboard_handler;
use crate::service::dashboard_service::DashboardServiceImpl;

pub fn dashboard_router(service: Arc<DashboardServiceImpl>) -> Router {
    Router::new().route("/dashboard", get(dashboard_handler)).with_state(service)
}
