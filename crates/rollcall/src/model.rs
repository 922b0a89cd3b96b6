//! Core data types for rollcall.
//!
//! These are the shapes persisted in the key-value store. Field names follow
//! the stored JSON contract (`studentId`, `createdAt`), so every struct here
//! is serialized in camelCase.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::Validate;

/// Date format used for attendance keys and records.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A student on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique, stable identifier assigned at creation.
    pub id: String,

    /// Display name, never blank.
    pub name: String,

    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// When the student was added.
    pub created_at: DateTime<Utc>,
}

impl Validate for Student {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.id.is_empty() {
            return Err("student has an empty id".to_string());
        }
        if self.name.trim().is_empty() {
            return Err(format!("student {} has a blank name", self.id));
        }
        Ok(())
    }
}

/// Whether a student attended on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// The student was there.
    Present,
    /// The student was not.
    Absent,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// Status field of a stored history record.
///
/// History written by other tools may carry values other than `present` and
/// `absent`. Those are kept verbatim so rewriting the log does not drop
/// them, and aggregation ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordStatus {
    /// `present` or `absent`.
    Known(AttendanceStatus),
    /// Anything else.
    Other(String),
}

impl RecordStatus {
    /// The recognised status, if any.
    #[must_use]
    pub fn known(&self) -> Option<AttendanceStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Other(_) => None,
        }
    }
}

impl From<AttendanceStatus> for RecordStatus {
    fn from(status: AttendanceStatus) -> Self {
        Self::Known(status)
    }
}

/// One entry of the cumulative attendance history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Id of the student this record belongs to.
    pub student_id: String,
    /// Calendar date of the mark.
    pub date: NaiveDate,
    /// The mark itself.
    pub status: RecordStatus,
}

impl AttendanceRecord {
    /// Create a record with a recognised status.
    #[must_use]
    pub fn new(student_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            student_id: student_id.into(),
            date,
            status: status.into(),
        }
    }

    /// Check if this record marks the student present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.status.known() == Some(AttendanceStatus::Present)
    }

    /// Check if this record marks the student absent.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.status.known() == Some(AttendanceStatus::Absent)
    }
}

impl Validate for AttendanceRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.student_id.is_empty() {
            return Err(format!("record on {} has an empty studentId", self.date));
        }
        Ok(())
    }
}

impl Validate for AttendanceStatus {}

/// Marks for a single calendar date, keyed by student id.
///
/// Students who have not been marked are simply missing from the map.
pub type DailyAttendance = BTreeMap<String, AttendanceStatus>;

/// Format a date the way keys and records store it.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
