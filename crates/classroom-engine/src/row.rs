//! The ingestion boundary: raw string rows → validated [`MeetingRecord`]s.
//!
//! Rows arrive as tab-delimited lines from the registrar export. Splitting and
//! numeric parsing happen here, once, so nothing downstream inspects strings to
//! decide what a field means.
//!
//! Column order:
//!
//! ```text
//! course_id  section  type  days  start_hr  start_min  end_hr  end_min  building  room  instructors
//! ```

use crate::error::{EngineError, Result};
use crate::record::{section_family, DayPattern, Location, MeetingRecord};

/// Number of tab-separated columns in one export row.
pub const FIELD_COUNT: usize = 11;

/// Separator between names in the instructors column.
pub const INSTRUCTOR_SEPARATOR: char = ';';

/// One unparsed export row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub course_id: String,
    pub section_code: String,
    pub meeting_type: String,
    pub days: String,
    pub start_hour: String,
    pub start_minute: String,
    pub end_hour: String,
    pub end_minute: String,
    pub building: String,
    pub room: String,
    pub instructors: String,
}

impl RawRow {
    /// Split a tab-delimited line into its columns.
    ///
    /// A trailing `\r` is tolerated.
    pub fn from_tsv_line(line: &str) -> Result<Self> {
        Self::from_fields(line.trim_end_matches(['\r', '\n']).split('\t'))
    }

    /// Build a row from already-split columns, in export order.
    ///
    /// Any column count other than [`FIELD_COUNT`] is an error.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        let [course_id, section_code, meeting_type, days, start_hour, start_minute, end_hour, end_minute, building, room, instructors] =
            fields.as_slice()
        else {
            return Err(EngineError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        };

        Ok(Self {
            course_id: course_id.to_string(),
            section_code: section_code.to_string(),
            meeting_type: meeting_type.to_string(),
            days: days.to_string(),
            start_hour: start_hour.to_string(),
            start_minute: start_minute.to_string(),
            end_hour: end_hour.to_string(),
            end_minute: end_minute.to_string(),
            building: building.to_string(),
            room: room.to_string(),
            instructors: instructors.to_string(),
        })
    }
}

impl TryFrom<RawRow> for MeetingRecord {
    type Error = EngineError;

    fn try_from(row: RawRow) -> Result<Self> {
        let building = row.building.trim();
        if building.is_empty() {
            return Err(EngineError::EmptyBuilding);
        }

        let start_minutes = minutes_of_day(
            parse_number("start_hour", &row.start_hour)?,
            parse_number("start_minute", &row.start_minute)?,
        )?;
        let end_minutes = minutes_of_day(
            parse_number("end_hour", &row.end_hour)?,
            parse_number("end_minute", &row.end_minute)?,
        )?;
        let day_pattern: DayPattern = row.days.parse()?;

        let record = MeetingRecord {
            location: Location::new(building, row.room.trim()),
            start_minutes,
            end_minutes,
            day_pattern,
            course_id: row.course_id.trim().to_string(),
            meeting_type: row.meeting_type.trim().to_string(),
            section_family: section_family(&row.section_code).to_string(),
            instructors: split_instructors(&row.instructors),
        };
        record.validate()?;
        Ok(record)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn minutes_of_day(hour: u32, minute: u32) -> Result<u32> {
    if hour >= 24 || minute >= 60 {
        return Err(EngineError::TimeOutOfRange { hour, minute });
    }
    Ok(hour * 60 + minute)
}

fn split_instructors(raw: &str) -> Vec<String> {
    raw.split(INSTRUCTOR_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
