//! Store keys used by rollcall.

use chrono::NaiveDate;

use crate::model::format_date;

/// Key holding the roster.
pub const STUDENTS: &str = "students";

/// Key holding the cumulative attendance history.
pub const HISTORY: &str = "attendance_history";

/// Prefix of the per-date attendance keys.
pub const DAILY_PREFIX: &str = "attendance_";

/// Key holding the marks for `date`, e.g. `attendance_2024-01-01`.
#[must_use]
pub fn daily(date: NaiveDate) -> String {
    format!("{DAILY_PREFIX}{}", format_date(date))
}
