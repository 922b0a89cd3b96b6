//! Statistics derived from the roster and the history log.
//!
//! Everything here is a pure function over data that has already been
//! loaded. Records whose status is not `present` or `absent` never count as
//! a present or absent day.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{ReportConfig, StatsOrder};
use crate::history::History;
use crate::model::{AttendanceRecord, AttendanceStatus, DailyAttendance, Student};
use crate::roster::Roster;

/// Number of recent dates summarized when nothing else is configured.
pub const DEFAULT_RECENT_DATES: usize = 7;

/// Attendance totals for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    /// The student these totals belong to.
    pub student: Student,
    /// `present_days + absent_days`.
    pub total_days: usize,
    /// Days marked present.
    pub present_days: usize,
    /// Days marked absent.
    pub absent_days: usize,
    /// Percentage of days present, 0 when there are no days.
    pub attendance_rate: f64,
}

/// Totals over the whole history log.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    /// Every record in the log.
    pub total_records: usize,
    /// Records marked present.
    pub present_records: usize,
    /// `total_records - present_records`.
    pub absent_records: usize,
    /// Percentage of records present, 0 when the log is empty.
    pub overall_rate: f64,
}

/// Counts for one date in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSummary {
    /// The date summarized.
    pub date: NaiveDate,
    /// Records on that date marked present.
    pub present_count: usize,
    /// All records on that date.
    pub total_count: usize,
}

/// Counts of one day's marks against the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// The date summarized.
    pub date: NaiveDate,
    /// Students marked present.
    pub present: usize,
    /// Students marked absent.
    pub absent: usize,
    /// Roster students with no mark yet.
    pub unmarked: usize,
}

/// Everything shown on a report: overall totals, per-student totals and
/// the most recent dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Totals over the whole log.
    pub overall: OverallStats,
    /// One entry per roster student, ordered per configuration.
    pub students: Vec<StudentStats>,
    /// Summaries of the most recent dates, newest first.
    pub recent: Vec<DateSummary>,
}

impl Report {
    /// Build a report from loaded data.
    #[must_use]
    pub fn build(roster: &Roster, history: &History, config: &ReportConfig) -> Self {
        let records = history.records();

        let mut students = per_student_stats(roster.students(), records);
        if config.order == StatsOrder::Rate {
            sort_by_rate(&mut students);
        }

        let recent = recent_dates(records, config.recent_dates_limit)
            .into_iter()
            .map(|date| per_date_summary(records, date))
            .collect();

        Self {
            overall: overall_stats(records),
            students,
            recent,
        }
    }
}

/// Percentage of `part` in `total`, or 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Totals for every roster student, in roster order.
///
/// Students without records get zero totals. Records for ids not on the
/// roster are ignored.
#[must_use]
pub fn per_student_stats(roster: &[Student], history: &[AttendanceRecord]) -> Vec<StudentStats> {
    roster
        .iter()
        .map(|student| {
            let (present_days, absent_days) = history
                .iter()
                .filter(|r| r.student_id == student.id)
                .fold((0, 0), |(present, absent), r| match r.status.known() {
                    Some(AttendanceStatus::Present) => (present + 1, absent),
                    Some(AttendanceStatus::Absent) => (present, absent + 1),
                    None => (present, absent),
                });
            let total_days = present_days + absent_days;

            StudentStats {
                student: student.clone(),
                total_days,
                present_days,
                absent_days,
                attendance_rate: rate(present_days, total_days),
            }
        })
        .collect()
}

/// Order by attendance rate, highest first. Ties keep their current order.
pub fn sort_by_rate(stats: &mut [StudentStats]) {
    stats.sort_by(|a, b| b.attendance_rate.total_cmp(&a.attendance_rate));
}

/// Totals over every record in the log.
#[must_use]
pub fn overall_stats(history: &[AttendanceRecord]) -> OverallStats {
    let total_records = history.len();
    let present_records = history.iter().filter(|r| r.is_present()).count();

    OverallStats {
        total_records,
        present_records,
        absent_records: total_records - present_records,
        overall_rate: rate(present_records, total_records),
    }
}

/// Distinct dates in the log, newest first, at most `limit` of them.
#[must_use]
pub fn recent_dates(history: &[AttendanceRecord], limit: usize) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = history.iter().map(|r| r.date).collect();
    dates.into_iter().rev().take(limit).collect()
}

/// Present and total record counts for one date.
#[must_use]
pub fn per_date_summary(history: &[AttendanceRecord], date: NaiveDate) -> DateSummary {
    let (present_count, total_count) = history
        .iter()
        .filter(|r| r.date == date)
        .fold((0, 0), |(present, total), r| {
            (present + usize::from(r.is_present()), total + 1)
        });

    DateSummary {
        date,
        present_count,
        total_count,
    }
}

/// Present, absent and unmarked counts for one day's marks.
#[must_use]
pub fn daily_summary(roster: &Roster, date: NaiveDate, marks: &DailyAttendance) -> DailySummary {
    let present = marks
        .values()
        .filter(|s| **s == AttendanceStatus::Present)
        .count();
    let absent = marks.len() - present;
    let unmarked = roster
        .students()
        .iter()
        .filter(|s| !marks.contains_key(&s.id))
        .count();

    DailySummary {
        date,
        present,
        absent,
        unmarked,
    }
}
