//! Tests for weekly/exact-date matching and the finals-day override.

use chrono::{NaiveDate, Weekday};
use classroom_engine::record::{DayPattern, Location, MeetingRecord, WeekdaySet};
use classroom_engine::{DayMatcher, ScheduleIndex, FINAL_EXAM_MINUTES};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(room: &str, start: u32, end: u32, day_pattern: DayPattern) -> MeetingRecord {
    MeetingRecord {
        location: Location::new("CENTR", room),
        start_minutes: start,
        end_minutes: end,
        day_pattern,
        course_id: "CSE 100".to_string(),
        meeting_type: "LE".to_string(),
        section_family: "A".to_string(),
        instructors: vec![],
    }
}

fn mondays() -> DayPattern {
    DayPattern::Weekly(WeekdaySet::from_days(&[Weekday::Mon]))
}

// 2026-12-07 is a Monday.
const FINALS_MONDAY: (i32, u32, u32) = (2026, 12, 7);

// ── Default rules ───────────────────────────────────────────────────────────

#[test]
fn weekly_record_matches_its_weekdays() {
    let lecture = record("115", 600, 650, mondays());
    let index = ScheduleIndex::from_records(vec![lecture.clone()]);

    let monday = DayMatcher::for_date(&index, date(2026, 10, 19));
    let tuesday = DayMatcher::for_date(&index, date(2026, 10, 20));

    assert_eq!(monday.weekday(), Weekday::Mon);
    assert!(monday.is_active(&lecture));
    assert!(!tuesday.is_active(&lecture));
}

#[test]
fn exact_date_record_matches_only_its_date() {
    let makeup = record("115", 600, 650, DayPattern::ExactDate(date(2026, 10, 21)));
    let index = ScheduleIndex::from_records(vec![makeup.clone()]);

    assert!(DayMatcher::for_date(&index, date(2026, 10, 21)).is_active(&makeup));
    assert!(!DayMatcher::for_date(&index, date(2026, 10, 28)).is_active(&makeup));
}

#[test]
fn short_exact_date_record_does_not_trigger_finals() {
    let (y, m, d) = FINALS_MONDAY;
    let lecture = record("115", 600, 650, mondays());
    let makeup = record("120", 480, 530, DayPattern::ExactDate(date(y, m, d)));
    let index = ScheduleIndex::from_records(vec![lecture.clone(), makeup.clone()]);

    let matcher = DayMatcher::for_date(&index, date(y, m, d));
    assert!(!matcher.is_finals_day());
    assert!(matcher.is_active(&lecture));
    assert!(matcher.is_active(&makeup));
}

// ── Finals-day override ─────────────────────────────────────────────────────

#[test]
fn final_exam_suppresses_weekly_records_everywhere() {
    let (y, m, d) = FINALS_MONDAY;
    let lecture = record("101", 600, 650, mondays());
    let other_room_lecture = record("119", 900, 950, mondays());
    let final_exam = record(
        "115",
        480,
        480 + FINAL_EXAM_MINUTES as u32,
        DayPattern::ExactDate(date(y, m, d)),
    );
    let index = ScheduleIndex::from_records(vec![
        lecture.clone(),
        other_room_lecture.clone(),
        final_exam.clone(),
    ]);

    let matcher = DayMatcher::for_date(&index, date(y, m, d));
    assert!(matcher.is_finals_day());
    assert!(matcher.is_active(&final_exam));
    assert!(!matcher.is_active(&lecture));
    assert!(!matcher.is_active(&other_room_lecture));
}

#[test]
fn finals_override_applies_only_to_that_date() {
    let (y, m, d) = FINALS_MONDAY;
    let lecture = record("115", 600, 650, mondays());
    let final_exam = record("115", 480, 659, DayPattern::ExactDate(date(y, m, d)));
    let index = ScheduleIndex::from_records(vec![lecture.clone(), final_exam]);

    let next_monday = DayMatcher::for_date(&index, date(2026, 12, 14));
    assert!(!next_monday.is_finals_day());
    assert!(next_monday.is_active(&lecture));
}

#[test]
fn explicit_finals_bit() {
    let lecture = record("115", 600, 650, mondays());
    let matcher = DayMatcher::with_finals(date(2026, 10, 19), true);
    assert!(matcher.is_finals_day());
    assert!(!matcher.is_active(&lecture));
}

#[test]
fn empty_index_is_never_a_finals_day() {
    let matcher = DayMatcher::for_date(&ScheduleIndex::empty(), date(2026, 12, 7));
    assert!(!matcher.is_finals_day());
}
