pub mod calendar_handler;
pub mod catalog_handler;
pub mod dashboard_handler;
pub mod employee_handler;
pub mod form_field_handler;
pub mod lead_handler;
pub mod note_handler;
pub mod quotation_handler;
pub mod storage_handler;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

/// Path id -> ObjectId, or `400 Invalid <label> id`.
pub fn parse_object_id(raw: &str, label: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", label)))
}
