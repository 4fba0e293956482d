use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::note_dto::{AddNoteRequest, UpdateNoteRequest};
use crate::handler::parse_object_id;
use crate::service::note_service::{NoteService, NoteServiceImpl};
use crate::util::error::HandlerError;

pub async fn add_note_handler(
    State(service): State<Arc<NoteServiceImpl>>,
    Path((lead_id,)): Path<(String,)>,
    Json(payload): Json<AddNoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let lead_id = parse_object_id(&lead_id, "lead")?;
    let note = service
        .add_note(lead_id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "add note"))?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn list_lead_notes_handler(
    State(service): State<Arc<NoteServiceImpl>>,
    Path((lead_id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let lead_id = parse_object_id(&lead_id, "lead")?;
    let notes = service
        .list_notes_for_lead(lead_id)
        .await
        .map_err(|e| HandlerError::from_service(e, "list notes"))?;
    Ok(Json(notes))
}

pub async fn get_note_handler(
    State(service): State<Arc<NoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "note")?;
    let note = service
        .get_note(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "get note"))?;
    Ok(Json(note))
}

pub async fn update_note_handler(
    State(service): State<Arc<NoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "note")?;
    let note = service
        .update_note(id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, "update note"))?;
    Ok(Json(note))
}

pub async fn toggle_pin_handler(
    State(service): State<Arc<NoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "note")?;
    let note = service
        .toggle_pin(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "pin note"))?;
    Ok(Json(note))
}

pub async fn delete_note_handler(
    State(service): State<Arc<NoteServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "note")?;
    service
        .delete_note(id)
        .await
        .map_err(|e| HandlerError::from_service(e, "delete note"))?;
    Ok(StatusCode::NO_CONTENT)
}
