use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::service::calendar::CalendarView;
use crate::service::calendar_service::{CalendarService, CalendarServiceImpl};
use crate::util::error::HandlerError;

#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub view: Option<CalendarView>,
    /// Reference day, `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
}

pub async fn calendar_handler(
    State(service): State<Arc<CalendarServiceImpl>>,
    Query(params): Query<CalendarParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let reference = match params.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| HandlerError::bad_request("date must be YYYY-MM-DD"))?,
        None => Utc::now().date_naive(),
    };
    let calendar = service
        .get_calendar(params.view.unwrap_or_default(), reference)
        .await
        .map_err(|e| HandlerError::from_service(e, "load calendar"))?;
    Ok(Json(calendar))
}
