use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::catalog_handler::{
    create_service_handler, delete_service_handler, get_service_handler, list_services_handler,
    update_service_handler,
};
use crate::service::catalog_service::CatalogServiceImpl;

pub fn catalog_router(service: Arc<CatalogServiceImpl>) -> Router {
    Router::new()
        .route("/services", get(list_services_handler).post(create_service_handler))
        .route(
            "/services/{id}",
            get(get_service_handler)
                .put(update_service_handler)
                .delete(delete_service_handler),
        )
        .with_state(service)
}
