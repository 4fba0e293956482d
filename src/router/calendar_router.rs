use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::calendar_handler::calendar_handler;
use crate::service::calendar_service::CalendarServiceImpl;

pub fn calendar_router(service: Arc<CalendarServiceImpl>) -> Router {
    Router::new().route("/calendar", get(calendar_handler)).with_state(service)
}
