use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::dto::non_blank;
use crate::dto::note_dto::{AddNoteRequest, UpdateNoteRequest};
use crate::model::lead::Lead;
use crate::model::note::{sort_for_display, Note};
use crate::model::timestamp;
use crate::repository::record_store::{ListQuery, RecordStore};
use crate::repository::Stores;
use crate::service::required_text;
use crate::util::error::ServiceError;

#[async_trait]
pub trait NoteService: Send + Sync {
    async fn add_note(&self, lead: ObjectId, request: AddNoteRequest) -> Result<Note, ServiceError>;
    async fn get_note(&self, id: ObjectId) -> Result<Note, ServiceError>;
    async fn update_note(&self, id: ObjectId, request: UpdateNoteRequest) -> Result<Note, ServiceError>;
    async fn toggle_pin(&self, id: ObjectId) -> Result<Note, ServiceError>;
    async fn delete_note(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_notes_for_lead(&self, lead: ObjectId) -> Result<Vec<Note>, ServiceError>;
}

pub struct NoteServiceImpl {
    pub note_repo: Arc<dyn RecordStore<Note>>,
    pub lead_repo: Arc<dyn RecordStore<Lead>>,
}

impl NoteServiceImpl {
    pub fn new(stores: &Stores) -> Self {
        NoteServiceImpl {
            note_repo: stores.notes.clone(),
            lead_repo: stores.leads.clone(),
        }
    }

    async fn ensure_lead_exists(&self, lead: ObjectId) -> Result<(), ServiceError> {
        match self.lead_repo.get_by_id(lead).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(ServiceError::NotFound(format!("Lead not found: {}", lead))),
            Err(e) => Err(ServiceError::from(e)),
        }
    }
}

#[async_trait]
impl NoteService for NoteServiceImpl {
    #[instrument(skip(self, request), fields(lead = %lead))]
    async fn add_note(&self, lead: ObjectId, request: AddNoteRequest) -> Result<Note, ServiceError> {
        info!("Adding note to lead");
        request.validate()?;
        let content = required_text(&request.content, "Note content is required")?;
        self.ensure_lead_exists(lead).await?;
        let now = timestamp();
        let note = Note {
            id: None,
            lead,
            content,
            created_by: non_blank(request.created_by),
            pinned: request.pinned,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        let res = self.note_repo.create(note).await;
        match &res {
            Ok(_) => info!("Note added successfully"),
            Err(e) => error!("Failed to add note: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_note(&self, id: ObjectId) -> Result<Note, ServiceError> {
        self.note_repo.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("Note not found: {}", id))
            } else {
                ServiceError::from(e)
            }
        })
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_note(&self, id: ObjectId, request: UpdateNoteRequest) -> Result<Note, ServiceError> {
        request.validate()?;
        let content = required_text(&request.content, "Note content is required")?;
        let mut note = self.get_note(id).await?;
        note.content = content;
        note.updated_at = Some(timestamp());
        let res = self.note_repo.update(id, note).await;
        match &res {
            Ok(_) => info!("Note updated successfully"),
            Err(e) => error!("Failed to update note: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn toggle_pin(&self, id: ObjectId) -> Result<Note, ServiceError> {
        let mut note = self.get_note(id).await?;
        note.pinned = !note.pinned;
        note.updated_at = Some(timestamp());
        info!("Setting pinned = {}", note.pinned);
        self.note_repo.update(id, note).await.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_note(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Deleting note");
        let res = self.note_repo.delete(id).await;
        match &res {
            Ok(_) => info!("Note deleted successfully"),
            Err(e) => error!("Failed to delete note: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    /// Pinned first, then newest first.
    #[instrument(skip(self), fields(lead = %lead))]
    async fn list_notes_for_lead(&self, lead: ObjectId) -> Result<Vec<Note>, ServiceError> {
        self.ensure_lead_exists(lead).await?;
        let mut notes = self.note_repo.find(doc! { "lead": lead }, ListQuery::all()).await?;
        sort_for_display(&mut notes);
        info!("Fetched {} notes", notes.len());
        Ok(notes)
    }
}
