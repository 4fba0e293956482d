use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::employee_handler::{
    create_employee_handler, delete_employee_handler, get_employee_handler, list_employees_handler,
    update_employee_handler,
};
use crate::service::employee_service::EmployeeServiceImpl;

pub fn employee_router(service: Arc<EmployeeServiceImpl>) -> Router {
    Router::new()
        .route("/employees", get(list_employees_handler).post(create_employee_handler))
        .route(
            "/employees/{id}",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .with_state(service)
}
