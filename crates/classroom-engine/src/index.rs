//! The immutable schedule index every query reads from.
//!
//! Built once from ingestion rows, sorted by `(location, start_minutes)`, with a
//! registry of distinct rooms. Nothing mutates an index after construction; a
//! reload builds a new one (see [`IndexHandle`](crate::handle::IndexHandle)).

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::{info, warn};

use crate::record::{Location, MeetingRecord};
use crate::row::RawRow;

/// Validated meeting records plus the derived room registry.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    /// Sorted by location, then start time.
    records: Vec<MeetingRecord>,
    /// Distinct locations, sorted.
    rooms: Vec<Location>,
    /// Slice of `records` belonging to each room.
    spans: BTreeMap<Location, Range<usize>>,
    skipped: usize,
}

impl ScheduleIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from raw export rows.
    ///
    /// Rows that fail validation are logged and skipped; construction itself
    /// never fails.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut records = Vec::new();
        let mut skipped = 0;

        for (i, row) in rows.into_iter().enumerate() {
            match MeetingRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(row = i + 1, error = %err, "Skipping schedule row");
                    skipped += 1;
                }
            }
        }

        Self::assemble(records, skipped)
    }

    /// Build an index from already-typed records, applying the same validation
    /// as [`ScheduleIndex::build`].
    pub fn from_records(records: Vec<MeetingRecord>) -> Self {
        let total = records.len();
        let valid: Vec<MeetingRecord> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match record.validate() {
                Ok(()) => Some(record),
                Err(err) => {
                    warn!(record = i, location = %record.location, error = %err, "Skipping meeting record");
                    None
                }
            })
            .collect();
        let skipped = total - valid.len();

        Self::assemble(valid, skipped)
    }

    fn assemble(mut records: Vec<MeetingRecord>, skipped: usize) -> Self {
        // Stable: records with equal keys keep their input order.
        records.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then(a.start_minutes.cmp(&b.start_minutes))
        });

        let mut spans: BTreeMap<Location, Range<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            spans
                .entry(record.location.clone())
                .and_modify(|span| span.end = i + 1)
                .or_insert(i..i + 1);
        }
        let rooms: Vec<Location> = spans.keys().cloned().collect();

        info!(
            records = records.len(),
            rooms = rooms.len(),
            skipped,
            "Built schedule index"
        );

        Self {
            records,
            rooms,
            spans,
            skipped,
        }
    }

    /// All distinct rooms, sorted by building then room.
    pub fn rooms(&self) -> &[Location] {
        &self.rooms
    }

    /// Records held in `room`, sorted by start time. Empty for unknown rooms.
    pub fn records_for(&self, room: &Location) -> &[MeetingRecord] {
        match self.spans.get(room) {
            Some(span) => &self.records[span.clone()],
            None => &[],
        }
    }

    /// Every record in the index, in index order.
    pub fn records(&self) -> &[MeetingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of input rows dropped during construction.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn contains_room(&self, room: &Location) -> bool {
        self.spans.contains_key(room)
    }

    /// Rooms whose building code matches `building`, ignoring ASCII case.
    pub fn rooms_in_building<'a>(&'a self, building: &'a str) -> impl Iterator<Item = &'a Location> + 'a {
        self.rooms
            .iter()
            .filter(move |room| room.building.eq_ignore_ascii_case(building))
    }

    /// Look up a room by its display form (`"CENTR 115"`), ignoring ASCII case.
    pub fn find_room(&self, name: &str) -> Option<&Location> {
        let wanted = Location::parse(name)?;
        self.rooms.iter().find(|room| {
            room.building.eq_ignore_ascii_case(&wanted.building)
                && room.room.eq_ignore_ascii_case(&wanted.room)
        })
    }
}
