use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::lead_handler::{
    assign_employee_handler, create_lead_handler, delete_lead_handler, get_lead_handler, intake_lead_handler,
    list_leads_handler, update_lead_handler, update_lead_status_handler,
};
use crate::service::lead_service::LeadServiceImpl;

pub fn lead_router(service: Arc<LeadServiceImpl>) -> Router {
    Router::new()
        .route("/leads", get(list_leads_handler).post(create_lead_handler))
        .route("/leads/intake", post(intake_lead_handler))
        .route(
            "/leads/{id}",
            get(get_lead_handler).put(update_lead_handler).delete(delete_lead_handler),
        )
        .route("/leads/{id}/status", put(update_lead_status_handler))
        .route("/leads/{id}/assign", put(assign_employee_handler))
        .with_state(service)
}
