//! Decide whether a record meets on a given calendar date.
//!
//! Weekly records match on their weekdays and exact-date records match on their
//! date, except on finals days: when the index holds any exact-date record for
//! the date with the canonical final-exam length, weekly records are not
//! active at all on that date. The finals bit is computed once per date, over
//! the whole index, not per room.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::index::ScheduleIndex;
use crate::record::{DayPattern, MeetingRecord};

/// Length of a scheduled final exam in minutes (e.g. 08:00 - 10:59).
pub const FINAL_EXAM_MINUTES: i64 = 179;

/// Day-matching rules resolved for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMatcher {
    date: NaiveDate,
    weekday: Weekday,
    finals_day: bool,
}

impl DayMatcher {
    /// Resolve the rules for `date`, scanning `index` once for final exams.
    pub fn for_date(index: &ScheduleIndex, date: NaiveDate) -> Self {
        let finals_day = index.records().iter().any(|record| is_final_on(record, date));
        if finals_day {
            debug!(%date, "Finals day: weekly meetings suppressed");
        }
        Self::with_finals(date, finals_day)
    }

    /// Build a matcher with an explicit finals bit.
    pub fn with_finals(date: NaiveDate, finals_day: bool) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            finals_day,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn is_finals_day(&self) -> bool {
        self.finals_day
    }

    /// `true` if `record` meets on this matcher's date.
    pub fn is_active(&self, record: &MeetingRecord) -> bool {
        match &record.day_pattern {
            DayPattern::Weekly(days) => !self.finals_day && days.contains(self.weekday),
            DayPattern::ExactDate(date) => *date == self.date,
        }
    }
}

fn is_final_on(record: &MeetingRecord, date: NaiveDate) -> bool {
    record.day_pattern.exact_date() == Some(date)
        && record.duration_minutes() == FINAL_EXAM_MINUTES
}
