//! Meeting records -- the typed unit every query works on.
//!
//! A [`MeetingRecord`] is one room-usage block of one section: where it meets,
//! from when to when, and on which days. Day patterns are decided once, when the
//! record is built, as either a weekly recurrence or a single calendar date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{EngineError, Result};

/// Building codes used by the registrar for sections without a physical room.
pub const RESERVED_BUILDINGS: [&str; 2] = ["RCLAS", "TBA"];

/// Last valid minute of a day (23:59).
pub const LAST_MINUTE_OF_DAY: u32 = 24 * 60 - 1;

// ── Location ────────────────────────────────────────────────────────────────

/// A physical room, keyed by building code and room code.
///
/// Ordering is by building, then room, which is also the order of the room
/// registry in a [`ScheduleIndex`](crate::index::ScheduleIndex).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub building: String,
    pub room: String,
}

impl Location {
    pub fn new(building: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            building: building.into(),
            room: room.into(),
        }
    }

    /// Parse the display form `"BLDG ROOM"`.
    ///
    /// The building is everything before the first run of whitespace, the room
    /// is the trimmed remainder. Returns `None` when either part is missing.
    pub fn parse(s: &str) -> Option<Self> {
        let (building, room) = s.trim().split_once(char::is_whitespace)?;
        let room = room.trim();
        if building.is_empty() || room.is_empty() {
            return None;
        }
        Some(Self::new(building, room))
    }

    /// `true` for the placeholder buildings of online/unassigned sections.
    pub fn is_reserved(&self) -> bool {
        RESERVED_BUILDINGS
            .iter()
            .any(|b| b.eq_ignore_ascii_case(&self.building))
    }

    fn validate(&self) -> Result<()> {
        if self.building.trim().is_empty() {
            return Err(EngineError::EmptyBuilding);
        }
        if self.is_reserved() {
            return Err(EngineError::ReservedBuilding(self.building.clone()));
        }
        if self.room.trim().is_empty() {
            return Err(EngineError::EmptyRoom);
        }
        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.building, self.room)
    }
}

// ── Weekday sets ────────────────────────────────────────────────────────────

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays stored as a 7-bit mask (bit 0 = Monday).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn from_days(days: &[Weekday]) -> Self {
        let mut set = Self::EMPTY;
        for day in days {
            set.insert(*day);
        }
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Weekdays in the set, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for day in self.iter() {
            seq.serialize_element(&day)?;
        }
        seq.end()
    }
}

// ── Day patterns ────────────────────────────────────────────────────────────

/// When a record meets: every week on some weekdays, or once on a date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DayPattern {
    Weekly(WeekdaySet),
    ExactDate(NaiveDate),
}

impl DayPattern {
    pub fn exact_date(&self) -> Option<NaiveDate> {
        match self {
            DayPattern::ExactDate(date) => Some(*date),
            DayPattern::Weekly(_) => None,
        }
    }

    /// Plain pattern match, ignoring any finals-day override.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self {
            DayPattern::Weekly(days) => days.contains(date.weekday()),
            DayPattern::ExactDate(d) => *d == date,
        }
    }
}

impl FromStr for DayPattern {
    type Err = EngineError;

    /// Parse a day token as supplied by the registrar export.
    ///
    /// Tokens containing `-` are ISO dates (`2026-12-07`). Anything else is a
    /// compact weekday string built from `M Tu W Th F Sa Su` (e.g. `MWF`, `TuTh`).
    fn from_str(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.contains('-') {
            return NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .map(DayPattern::ExactDate)
                .map_err(|_| EngineError::InvalidDate(token.to_string()));
        }

        let invalid = || EngineError::InvalidDays(token.to_string());
        let mut days = WeekdaySet::EMPTY;
        let mut chars = token.chars().peekable();
        while let Some(c) = chars.next() {
            let day = match c {
                'M' => Weekday::Mon,
                'W' => Weekday::Wed,
                'F' => Weekday::Fri,
                'T' => match chars.next() {
                    Some('u') => Weekday::Tue,
                    Some('h') => Weekday::Thu,
                    _ => return Err(invalid()),
                },
                'S' => match chars.next() {
                    Some('a') => Weekday::Sat,
                    Some('u') => Weekday::Sun,
                    _ => return Err(invalid()),
                },
                _ => return Err(invalid()),
            };
            days.insert(day);
        }

        if days.is_empty() {
            return Err(invalid());
        }
        Ok(DayPattern::Weekly(days))
    }
}

// ── Identity ────────────────────────────────────────────────────────────────

/// Composite key identifying one logical session.
///
/// Cross-listed courses and administrative duplicates produce several records
/// with the same key; queries report each key at most once per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityKey<'a> {
    pub course_id: &'a str,
    pub meeting_type: &'a str,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub section_family: &'a str,
}

// ── MeetingRecord ───────────────────────────────────────────────────────────

/// One room-usage block of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingRecord {
    pub location: Location,
    /// Minutes since midnight, 1..=1439.
    pub start_minutes: u32,
    /// Minutes since midnight, 1..=1439. Not required to exceed `start_minutes`.
    pub end_minutes: u32,
    pub day_pattern: DayPattern,
    pub course_id: String,
    /// e.g. `LE`, `DI`, `FI`.
    pub meeting_type: String,
    /// Grouping key derived from the section code (`A01` → `A`).
    pub section_family: String,
    pub instructors: Vec<String>,
}

impl MeetingRecord {
    pub fn identity_key(&self) -> IdentityKey<'_> {
        IdentityKey {
            course_id: &self.course_id,
            meeting_type: &self.meeting_type,
            start_minutes: self.start_minutes,
            end_minutes: self.end_minutes,
            section_family: &self.section_family,
        }
    }

    /// Signed length of the block in minutes.
    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.end_minutes) - i64::from(self.start_minutes)
    }

    /// `"HH:MM - HH:MM"`.
    pub fn time_label(&self) -> String {
        time_label(self.start_minutes, self.end_minutes)
    }

    /// Check the load-time invariants: both bounds set and inside the day, a
    /// real location, and a non-empty weekly pattern.
    pub fn validate(&self) -> Result<()> {
        if self.start_minutes == 0 || self.end_minutes == 0 {
            return Err(EngineError::ZeroTime);
        }
        for minutes in [self.start_minutes, self.end_minutes] {
            if minutes > LAST_MINUTE_OF_DAY {
                return Err(EngineError::TimeOutOfRange {
                    hour: minutes / 60,
                    minute: minutes % 60,
                });
            }
        }
        self.location.validate()?;
        if let DayPattern::Weekly(days) = &self.day_pattern {
            if days.is_empty() {
                return Err(EngineError::InvalidDays(String::new()));
            }
        }
        Ok(())
    }
}

/// Section family of a section code: its leading letters, or the whole code
/// when it starts with a digit.
pub fn section_family(section_code: &str) -> &str {
    let code = section_code.trim();
    let letters = code
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(code.len(), |(i, _)| i);
    if letters == 0 {
        code
    } else {
        &code[..letters]
    }
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Format a start/end pair as `HH:MM - HH:MM`.
pub fn time_label(start_minutes: u32, end_minutes: u32) -> String {
    format!(
        "{} - {}",
        format_minutes(start_minutes),
        format_minutes(end_minutes)
    )
}
