//! Month/week/day grids of lead check-in and check-out dates.
//!
//! A lead shows up on a day only when its check-in or check-out date is that
//! exact day; stays are not spread over the days in between.

use bson::oid::ObjectId;
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::lead::{Lead, LeadStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarEvent {
    CheckIn,
    CheckOut,
    /// Check-in and check-out on the same day.
    CheckInOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: Option<ObjectId>,
    pub lead_id: String,
    pub full_name: String,
    pub status: LeadStatus,
    pub event: CalendarEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub entries: Vec<CalendarEntry>,
}

pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    (first, last)
}

/// First and last day (inclusive) covered by `view` around `reference`.
pub fn view_range(view: CalendarView, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match view {
        CalendarView::Day => (reference, reference),
        CalendarView::Week => {
            let start = week_start(reference);
            (start, start + Duration::days(6))
        }
        CalendarView::Month => {
            let (first, last) = month_bounds(reference);
            (week_start(first), week_start(last) + Duration::days(6))
        }
    }
}

pub fn leads_on_day(leads: &[Lead], day: NaiveDate) -> Vec<&Lead> {
    leads.iter().filter(|lead| lead.touches_day(day)).collect()
}

fn entry_for(lead: &Lead, day: NaiveDate) -> Option<CalendarEntry> {
    let check_in = lead.check_in_date == Some(day);
    let check_out = lead.check_out_date == Some(day);
    let event = match (check_in, check_out) {
        (true, true) => CalendarEvent::CheckInOut,
        (true, false) => CalendarEvent::CheckIn,
        (false, true) => CalendarEvent::CheckOut,
        (false, false) => return None,
    };
    Some(CalendarEntry {
        id: lead.id,
        lead_id: lead.lead_id.clone(),
        full_name: lead.full_name.clone(),
        status: lead.status,
        event,
    })
}

pub fn build_calendar(leads: &[Lead], view: CalendarView, reference: NaiveDate) -> Vec<CalendarDay> {
    let (start, end) = view_range(view, reference);
    let month = (reference.year(), reference.month());
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| CalendarDay {
            date: day,
            in_current_month: (day.year(), day.month()) == month,
            entries: leads.iter().filter_map(|lead| entry_for(lead, day)).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lead(name: &str, check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> Lead {
        Lead {
            id: Some(ObjectId::new()),
            lead_id: format!("LEAD-{}", name.to_uppercase()),
            full_name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: None,
            status: LeadStatus::Won,
            check_in_date: check_in,
            check_out_date: check_out,
            notes: None,
            services: vec![],
            assigned_employee: None,
            custom_answers: Default::default(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_month_view_places_lead_on_single_cell() {
        let leads = vec![lead("ana", Some(date(2024, 8, 15)), None)];
        let days = build_calendar(&leads, CalendarView::Month, date(2024, 8, 1));
        let hits: Vec<NaiveDate> = days.iter().filter(|d| !d.entries.is_empty()).map(|d| d.date).collect();
        assert_eq!(hits, vec![date(2024, 8, 15)]);
    }

    #[test]
    fn test_day_view_shows_only_that_day() {
        let leads = vec![lead("ana", Some(date(2024, 8, 15)), None)];
        let on_day = build_calendar(&leads, CalendarView::Day, date(2024, 8, 15));
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].entries.len(), 1);
        assert_eq!(on_day[0].entries[0].event, CalendarEvent::CheckIn);

        let other_day = build_calendar(&leads, CalendarView::Day, date(2024, 8, 16));
        assert!(other_day[0].entries.is_empty());
    }

    #[test]
    fn test_lead_without_dates_never_appears() {
        let leads = vec![lead("ben", None, None)];
        let days = build_calendar(&leads, CalendarView::Month, date(2024, 8, 1));
        assert!(days.iter().all(|d| d.entries.is_empty()));
    }

    #[test]
    fn test_days_between_check_in_and_out_are_empty() {
        let leads = vec![lead("cai", Some(date(2024, 8, 10)), Some(date(2024, 8, 12)))];
        let days = build_calendar(&leads, CalendarView::Week, date(2024, 8, 10));
        let eleventh = days.iter().find(|d| d.date == date(2024, 8, 11)).unwrap();
        assert!(eleventh.entries.is_empty());
        let twelfth = days.iter().find(|d| d.date == date(2024, 8, 12)).unwrap();
        assert_eq!(twelfth.entries[0].event, CalendarEvent::CheckOut);
    }

    #[test]
    fn test_same_day_stay() {
        let day = date(2024, 8, 20);
        let leads = vec![lead("dee", Some(day), Some(day))];
        assert_eq!(leads_on_day(&leads, day).len(), 1);
        let days = build_calendar(&leads, CalendarView::Day, day);
        assert_eq!(days[0].entries[0].event, CalendarEvent::CheckInOut);
    }

    #[test]
    fn test_month_grid_covers_whole_weeks() {
        // August 2024 starts on a Thursday and ends on a Saturday
        let days = build_calendar(&[], CalendarView::Month, date(2024, 8, 15));
        assert_eq!(days.first().unwrap().date, date(2024, 7, 28));
        assert_eq!(days.last().unwrap().date, date(2024, 8, 31));
        assert_eq!(days.len() % 7, 0);
        assert!(!days[0].in_current_month);
        assert_eq!(days.iter().filter(|d| d.in_current_month).count(), 31);
    }

    #[test]
    fn test_week_view_starts_on_sunday() {
        let (start, end) = view_range(CalendarView::Week, date(2024, 8, 15));
        assert_eq!(start, date(2024, 8, 11));
        assert_eq!(end, date(2024, 8, 17));
    }

    #[test]
    fn test_december_month_bounds() {
        let (start, end) = view_range(CalendarView::Month, date(2024, 12, 5));
        assert_eq!(start, date(2024, 12, 1));
        assert_eq!(end, date(2025, 1, 4));
    }
}
