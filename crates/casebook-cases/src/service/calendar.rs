//! Calendar feed of case and milestone due dates.

use std::collections::BTreeMap;

use rusqlite::Connection;

use super::{CaseService, normalize_date};
use crate::errors::CaseError;
use crate::repository::CaseRepository;
use crate::types::{CalendarEvent, CalendarPeriod, CalendarView};

impl CaseService {
    /// Case and milestone due dates within `[start, end]`, inclusive.
    ///
    /// Bounds accept `YYYY-MM-DD` or RFC 3339 and are compared by calendar
    /// day. Events are ordered by due date, cases before milestones on the
    /// same day.
    pub fn calendar_events(
        conn: &Connection,
        start: &str,
        end: &str,
    ) -> Result<CalendarView, CaseError> {
        let start = normalize_date(start)?;
        let end = normalize_date(end)?;
        if end < start {
            return Err(CaseError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }

        let mut events = CaseRepository::cases_due_between(conn, &start, &end)?;
        events.extend(CaseRepository::milestones_due_between(conn, &start, &end)?);
        events.sort_by(|a, b| a.due_date.cmp(&b.due_date));

        let mut events_by_date: BTreeMap<String, Vec<CalendarEvent>> = BTreeMap::new();
        for event in &events {
            events_by_date
                .entry(event.due_date.clone())
                .or_default()
                .push(event.clone());
        }

        Ok(CalendarView {
            total: events.len(),
            events,
            events_by_date,
            period: CalendarPeriod { start, end },
        })
    }
}
