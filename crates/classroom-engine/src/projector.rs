//! Weekly schedule reconstruction for a single room.
//!
//! Each day of the reference week gets its own [`DayMatcher`], so a finals day
//! suppresses weekly meetings on that day only. Records are bucketed by their
//! `(start, end)` time slot and deduplicated by identity key.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::day_matcher::DayMatcher;
use crate::index::ScheduleIndex;
use crate::record::{time_label, Location, MeetingRecord};

/// All sessions sharing one start/end pair on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start_minutes: u32,
    pub end_minutes: u32,
    /// `"HH:MM - HH:MM"`.
    pub label: String,
    /// Distinct sessions in this slot, in index order.
    pub records: Vec<MeetingRecord>,
}

/// One room's schedule on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub finals_day: bool,
    /// Sorted by start, then end.
    pub slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Schedule of `room` for the Monday-to-Sunday week containing `reference_date`.
pub fn project_week(
    index: &ScheduleIndex,
    room: &Location,
    reference_date: NaiveDate,
) -> [DaySchedule; 7] {
    let monday = week_start(reference_date);
    std::array::from_fn(|offset| project_day(index, room, monday + Duration::days(offset as i64)))
}

/// Schedule of `room` on `date`. Unknown rooms get an empty day.
pub fn project_day(index: &ScheduleIndex, room: &Location, date: NaiveDate) -> DaySchedule {
    let matcher = DayMatcher::for_date(index, date);

    let mut buckets: BTreeMap<(u32, u32), Vec<&MeetingRecord>> = BTreeMap::new();
    let mut seen = HashSet::new();
    for record in index.records_for(room) {
        if matcher.is_active(record) && seen.insert(record.identity_key()) {
            buckets
                .entry((record.start_minutes, record.end_minutes))
                .or_default()
                .push(record);
        }
    }

    let slots = buckets
        .into_iter()
        .map(|((start_minutes, end_minutes), records)| TimeSlot {
            start_minutes,
            end_minutes,
            label: time_label(start_minutes, end_minutes),
            records: records.into_iter().cloned().collect(),
        })
        .collect();

    DaySchedule {
        date,
        weekday: matcher.weekday(),
        finals_day: matcher.is_finals_day(),
        slots,
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
