//! Rooms that stay free for a requested duration.
//!
//! A room is free for `duration` starting at `now` when classifying it with
//! `lookahead = duration` yields no current and no upcoming sessions.

use chrono::{Duration, NaiveDateTime};

use crate::day_matcher::DayMatcher;
use crate::index::ScheduleIndex;
use crate::occupancy::{classify_records, ClassifyOptions, ScanPolicy};
use crate::record::Location;

/// A free-room request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeRoomQuery {
    /// How long the room must stay free, starting at the query instant.
    pub duration: Duration,
    /// Restrict the search to one building code (ASCII case-insensitive).
    pub building: Option<String>,
    pub scan_policy: ScanPolicy,
}

impl FreeRoomQuery {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            building: None,
            scan_policy: ScanPolicy::default(),
        }
    }

    pub fn in_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    pub fn with_scan_policy(mut self, scan_policy: ScanPolicy) -> Self {
        self.scan_policy = scan_policy;
        self
    }
}

/// All rooms in `index` that are free from `now` through `now + duration`.
pub fn find_free(index: &ScheduleIndex, now: NaiveDateTime, duration: Duration) -> Vec<Location> {
    find_free_with(index, now, &FreeRoomQuery::new(duration))
}

/// Free rooms matching `query`, sorted by building then room.
pub fn find_free_with(
    index: &ScheduleIndex,
    now: NaiveDateTime,
    query: &FreeRoomQuery,
) -> Vec<Location> {
    let matcher = DayMatcher::for_date(index, now.date());
    let options = ClassifyOptions {
        lookahead: query.duration,
        scan_policy: query.scan_policy,
    };

    index
        .rooms()
        .iter()
        .filter(|room| match &query.building {
            Some(building) => room.building.eq_ignore_ascii_case(building),
            None => true,
        })
        .filter(|room| classify_records(index.records_for(room), &matcher, now, &options).is_free())
        .cloned()
        .collect()
}
