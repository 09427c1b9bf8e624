//! Per-room occupancy at a point in time.
//!
//! For each room, records active on the query date are split into sessions in
//! progress (`current`) and sessions starting within the lookahead window
//! (`upcoming`). A room with neither is free through at least the lookahead.
//!
//! ## Scan policy
//!
//! By default both passes stop at the first record that does not qualify. This
//! assumes a room hosts one sequential, non-overlapping track of bookings per
//! day; with overlapping bookings, sessions after the first gap are not
//! reported. [`ScanPolicy::FullScan`] checks every record instead.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::day_matcher::DayMatcher;
use crate::index::ScheduleIndex;
use crate::record::{Location, MeetingRecord};

/// Lookahead used when callers do not pick one.
pub const DEFAULT_LOOKAHEAD_MINUTES: i64 = 10;

/// How far the current/upcoming passes walk a room's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanPolicy {
    /// Stop each pass at the first record that does not qualify.
    #[default]
    EarlyStop,
    /// Check every record in both passes.
    FullScan,
}

/// Tuning for a classification query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Sessions starting at most this far after `now` are `upcoming`.
    pub lookahead: Duration,
    pub scan_policy: ScanPolicy,
}

impl ClassifyOptions {
    pub fn new(lookahead: Duration) -> Self {
        Self {
            lookahead,
            ..Self::default()
        }
    }
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            lookahead: Duration::minutes(DEFAULT_LOOKAHEAD_MINUTES),
            scan_policy: ScanPolicy::default(),
        }
    }
}

/// Occupancy of one room at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Sessions in progress at `now`.
    pub current: Vec<MeetingRecord>,
    /// Sessions starting within the lookahead window.
    pub upcoming: Vec<MeetingRecord>,
}

impl ClassificationResult {
    /// `true` if nothing is in progress or about to start.
    pub fn is_free(&self) -> bool {
        self.current.is_empty() && self.upcoming.is_empty()
    }
}

/// Classify every room in `index` at `now` with the default scan policy.
pub fn classify(
    index: &ScheduleIndex,
    now: NaiveDateTime,
    lookahead: Duration,
) -> BTreeMap<Location, ClassificationResult> {
    classify_with(index, now, &ClassifyOptions::new(lookahead))
}

/// Classify every room in `index` at `now`.
///
/// The finals-day decision for `now`'s date is made once and shared by all rooms.
pub fn classify_with(
    index: &ScheduleIndex,
    now: NaiveDateTime,
    options: &ClassifyOptions,
) -> BTreeMap<Location, ClassificationResult> {
    let matcher = DayMatcher::for_date(index, now.date());
    index
        .rooms()
        .iter()
        .map(|room| {
            let result = classify_records(index.records_for(room), &matcher, now, options);
            (room.clone(), result)
        })
        .collect()
}

/// Classify a single room. Unknown rooms get an empty result.
pub fn classify_room(
    index: &ScheduleIndex,
    room: &Location,
    now: NaiveDateTime,
    options: &ClassifyOptions,
) -> ClassificationResult {
    if !index.contains_room(room) {
        return ClassificationResult::default();
    }
    let matcher = DayMatcher::for_date(index, now.date());
    classify_records(index.records_for(room), &matcher, now, options)
}

/// Run both passes over one room's records.
pub(crate) fn classify_records(
    records: &[MeetingRecord],
    matcher: &DayMatcher,
    now: NaiveDateTime,
    options: &ClassifyOptions,
) -> ClassificationResult {
    let t = minute_of_day(now);

    let mut candidates: Vec<&MeetingRecord> = records
        .iter()
        .filter(|r| matcher.is_active(r) && (r.end_minutes >= t || r.start_minutes >= t))
        .collect();
    candidates.sort_by_key(|r| r.start_minutes);

    let early_stop = options.scan_policy == ScanPolicy::EarlyStop;
    let mut seen = HashSet::new();
    let mut result = ClassificationResult::default();

    // Current pass.
    let mut resume = candidates.len();
    for (i, &record) in candidates.iter().enumerate() {
        let key = record.identity_key();
        if seen.contains(&key) {
            continue;
        }
        if record.start_minutes <= t && t <= record.end_minutes {
            seen.insert(key);
            result.current.push(record.clone());
        } else if early_stop {
            resume = i;
            break;
        }
    }

    // Upcoming pass, continuing where the current pass stopped.
    let from = if early_stop { resume } else { 0 };
    for &record in &candidates[from..] {
        let key = record.identity_key();
        if seen.contains(&key) {
            continue;
        }
        if starts_within(record, now, options.lookahead) {
            seen.insert(key);
            result.upcoming.push(record.clone());
        } else if early_stop {
            break;
        }
    }

    result
}

/// Minutes since midnight of `now`, truncating seconds.
pub(crate) fn minute_of_day(now: NaiveDateTime) -> u32 {
    now.hour() * 60 + now.minute()
}

/// `record` starts on `now`'s date no later than `now + lookahead`.
fn starts_within(record: &MeetingRecord, now: NaiveDateTime, lookahead: Duration) -> bool {
    let start = now.date().and_time(NaiveTime::MIN) + Duration::minutes(i64::from(record.start_minutes));
    start - now <= lookahead
}
