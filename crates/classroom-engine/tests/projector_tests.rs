//! Tests for weekly schedule projection of a single room.

use chrono::{NaiveDate, Weekday};
use classroom_engine::projector::week_start;
use classroom_engine::record::{DayPattern, Location, MeetingRecord, WeekdaySet};
use classroom_engine::{project_day, project_week, ScheduleIndex};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(course: &str, family: &str, start: u32, end: u32, day_pattern: DayPattern) -> MeetingRecord {
    MeetingRecord {
        location: Location::new("CENTR", "115"),
        start_minutes: start,
        end_minutes: end,
        day_pattern,
        course_id: course.to_string(),
        meeting_type: "LE".to_string(),
        section_family: family.to_string(),
        instructors: vec![],
    }
}

fn days(days: &[Weekday]) -> DayPattern {
    DayPattern::Weekly(WeekdaySet::from_days(days))
}

fn centr_115() -> Location {
    Location::new("CENTR", "115")
}

// ── Week layout ─────────────────────────────────────────────────────────────

#[test]
fn week_runs_monday_to_sunday() {
    // Thursday 2026-10-22.
    let week = project_week(&ScheduleIndex::empty(), &centr_115(), date(2026, 10, 22));

    assert_eq!(week[0].date, date(2026, 10, 19));
    assert_eq!(week[0].weekday, Weekday::Mon);
    assert_eq!(week[6].date, date(2026, 10, 25));
    assert_eq!(week[6].weekday, Weekday::Sun);
    assert!(week.iter().all(|day| day.is_empty()));
}

#[test]
fn week_start_of_a_sunday_is_the_previous_monday() {
    assert_eq!(week_start(date(2026, 10, 25)), date(2026, 10, 19));
    assert_eq!(week_start(date(2026, 10, 19)), date(2026, 10, 19));
}

#[test]
fn weekly_records_land_on_their_days() {
    let index = ScheduleIndex::from_records(vec![
        record("CSE 100", "A", 540, 590, days(&[Weekday::Mon, Weekday::Wed, Weekday::Fri])),
        record("MATH 20C", "B", 660, 740, days(&[Weekday::Tue, Weekday::Thu])),
    ]);

    let week = project_week(&index, &centr_115(), date(2026, 10, 19));
    let per_day: Vec<usize> = week.iter().map(|d| d.slots.len()).collect();
    assert_eq!(per_day, vec![1, 1, 1, 1, 1, 0, 0]);
    assert_eq!(week[1].slots[0].label, "11:00 - 12:20");
    assert_eq!(week[1].slots[0].records[0].course_id, "MATH 20C");
}

// ── Slots ───────────────────────────────────────────────────────────────────

#[test]
fn slots_group_by_time_and_dedup_by_identity() {
    let lecture = record("CSE 100", "A", 540, 590, days(&[Weekday::Mon]));
    let duplicate = MeetingRecord {
        instructors: vec!["Cross Listed".to_string()],
        ..lecture.clone()
    };
    let shared_slot = record("CSE 100R", "A", 540, 590, days(&[Weekday::Mon]));
    let later = record("CSE 110", "A", 600, 650, days(&[Weekday::Mon]));
    let index = ScheduleIndex::from_records(vec![later, lecture, duplicate, shared_slot]);

    let day = project_day(&index, &centr_115(), date(2026, 10, 19));

    assert_eq!(day.slots.len(), 2);
    assert_eq!(day.slots[0].label, "09:00 - 09:50");
    let courses: Vec<&str> = day.slots[0].records.iter().map(|r| r.course_id.as_str()).collect();
    assert_eq!(courses, vec!["CSE 100", "CSE 100R"]);
    assert_eq!(day.slots[1].label, "10:00 - 10:50");
}

#[test]
fn slots_with_same_start_sort_by_end() {
    let index = ScheduleIndex::from_records(vec![
        record("CSE 100", "A", 540, 650, days(&[Weekday::Mon])),
        record("CSE 101", "A", 540, 590, days(&[Weekday::Mon])),
    ]);
    let day = project_day(&index, &centr_115(), date(2026, 10, 19));
    let labels: Vec<&str> = day.slots.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["09:00 - 09:50", "09:00 - 10:50"]);
}

// ── Finals ──────────────────────────────────────────────────────────────────

#[test]
fn finals_override_is_evaluated_per_day() {
    // Finals on Monday 2026-12-07 only.
    let index = ScheduleIndex::from_records(vec![
        record("CSE 100", "A", 540, 590, days(&[Weekday::Mon, Weekday::Wed])),
        record("CSE 100", "A", 480, 659, DayPattern::ExactDate(date(2026, 12, 7))),
    ]);

    let week = project_week(&index, &centr_115(), date(2026, 12, 9));

    assert!(week[0].finals_day);
    assert_eq!(week[0].slots.len(), 1);
    assert_eq!(week[0].slots[0].label, "08:00 - 10:59");

    assert!(!week[2].finals_day);
    assert_eq!(week[2].slots.len(), 1);
    assert_eq!(week[2].slots[0].label, "09:00 - 09:50");
}

#[test]
fn unknown_room_projects_empty_week() {
    let index = ScheduleIndex::from_records(vec![record(
        "CSE 100",
        "A",
        540,
        590,
        days(&[Weekday::Mon]),
    )]);
    let week = project_week(&index, &Location::new("WLH", "2001"), date(2026, 10, 19));
    assert!(week.iter().all(|day| day.is_empty()));
}
