use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::form_field_handler::{
    create_form_field_handler, delete_form_field_handler, get_form_field_handler, list_form_fields_handler,
    update_form_field_handler,
};
use crate::service::form_field_service::FormFieldServiceImpl;

pub fn form_field_router(service: Arc<FormFieldServiceImpl>) -> Router {
    Router::new()
        .route("/form-fields", get(list_form_fields_handler).post(create_form_field_handler))
        .route(
            "/form-fields/{id}",
            get(get_form_field_handler)
                .put(update_form_field_handler)
                .delete(delete_form_field_handler),
        )
        .with_state(service)
}
