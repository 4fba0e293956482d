use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handler::quotation_handler::{
    create_quotation_handler, delete_quotation_handler, duplicate_quotation_handler, get_quotation_handler,
    list_quotations_handler, preview_quotation_handler, print_quotation_handler, update_quotation_handler,
    update_quotation_status_handler,
};
use crate::service::quotation_service::QuotationServiceImpl;

pub fn quotation_router(service: Arc<QuotationServiceImpl>) -> Router {
    Router::new()
        .route("/quotations", get(list_quotations_handler).post(create_quotation_handler))
        .route("/quotations/preview", post(preview_quotation_handler))
        .route(
            "/quotations/{id}",
            get(get_quotation_handler)
                .put(update_quotation_handler)
                .delete(delete_quotation_handler),
        )
        .route("/quotations/{id}/status", put(update_quotation_status_handler))
        .route("/quotations/{id}/duplicate", post(duplicate_quotation_handler))
        .route("/quotations/{id}/print", get(print_quotation_handler))
        .with_state(service)
}
