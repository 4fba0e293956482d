pub mod calendar_router;
pub mod catalog_router;
pub mod dashboard_router;
pub mod employee_router;
pub mod form_field_router;
pub mod lead_router;
pub mod note_router;
pub mod quotation_router;
pub mod storage_router;
