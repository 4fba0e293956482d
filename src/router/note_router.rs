use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::handler::note_handler::{
    add_note_handler, delete_note_handler, get_note_handler, list_lead_notes_handler, toggle_pin_handler,
    update_note_handler,
};
use crate::service::note_service::NoteServiceImpl;

pub fn note_router(service: Arc<NoteServiceImpl>) -> Router {
    Router::new()
        .route("/leads/{id}/notes", get(list_lead_notes_handler).post(add_note_handler))
        .route(
            "/notes/{id}",
            get(get_note_handler).put(update_note_handler).delete(delete_note_handler),
        )
        .route("/notes/{id}/pin", put(toggle_pin_handler))
        .with_state(service)
}
