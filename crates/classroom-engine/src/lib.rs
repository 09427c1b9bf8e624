//! # classroom-engine
//!
//! Classroom occupancy over a static term schedule.
//!
//! Given the registrar's meeting records and a point in time, the engine tells
//! which rooms are in use, which are about to be, and which stay free for a
//! requested duration. It also rebuilds a room's weekly schedule. Every query is
//! a pure function over an immutable [`ScheduleIndex`].
//!
//! ## Modules
//!
//! - [`record`] - `MeetingRecord`, `Location`, `DayPattern`, identity keys
//! - [`row`] - raw export rows → validated records
//! - [`index`] - the sorted, immutable `ScheduleIndex`
//! - [`day_matcher`] - weekly vs exact-date matching with the finals-day override
//! - [`occupancy`] - current/upcoming classification per room
//! - [`availability`] - rooms free for a whole duration
//! - [`projector`] - one room's week, grouped by time slot
//! - [`handle`] - construct-and-swap reloads of a shared index
//! - [`error`] - Error types

pub mod availability;
pub mod day_matcher;
pub mod error;
pub mod handle;
pub mod index;
pub mod occupancy;
pub mod projector;
pub mod record;
pub mod row;

pub use availability::{find_free, find_free_with, FreeRoomQuery};
pub use day_matcher::{DayMatcher, FINAL_EXAM_MINUTES};
pub use error::EngineError;
pub use handle::IndexHandle;
pub use index::ScheduleIndex;
pub use occupancy::{classify, classify_room, classify_with, ClassificationResult, ClassifyOptions, ScanPolicy};
pub use projector::{project_day, project_week, DaySchedule, TimeSlot};
pub use record::{DayPattern, IdentityKey, Location, MeetingRecord, WeekdaySet};
pub use row::RawRow;
