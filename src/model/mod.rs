pub mod catalog;
pub mod employee;
pub mod form_field;
pub mod lead;
pub mod note;
pub mod quotation;
pub mod storage;

use chrono::{SecondsFormat, Utc};

/// RFC 3339 UTC timestamp used for every `createdAt`/`updatedAt` field.
///
/// Fixed microsecond precision keeps string order equal to time order.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
