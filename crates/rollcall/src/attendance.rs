//! Daily attendance tracking.
//!
//! An [`AttendanceTracker`] holds the marks for one calendar date. Every
//! change is written to the date's own key first and then mirrored into the
//! history log by replacing that date's records wholesale, so the log for
//! the date always equals the tracker's marks after a successful call.
//!
//! The two writes are not atomic. If the history log cannot be read or
//! written, the date key is already updated and the log is left as it was;
//! the next successful [`AttendanceTracker::mark`] for the same date brings
//! the log back in line. An unreadable log is never replaced.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::codec;
use crate::error::Result;
use crate::history::History;
use crate::keys;
use crate::model::{AttendanceStatus, DailyAttendance};
use crate::report::{self, DailySummary};
use crate::roster::Roster;
use crate::store::KeyValueStore;

/// The device's current local date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Marks for a single calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTracker {
    date: NaiveDate,
    marks: DailyAttendance,
}

impl AttendanceTracker {
    /// Load today's marks.
    pub fn load_today<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::load(store, today())
    }

    /// Load the marks stored for `date`.
    ///
    /// Missing or unreadable data yields an empty mapping.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, date: NaiveDate) -> Self {
        let marks: DailyAttendance = codec::load_map(store, &keys::daily(date));
        debug!("Loaded {} mark(s) for {}", marks.len(), date);
        Self { date, marks }
    }

    /// The date these marks belong to.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// All marks for the date.
    #[must_use]
    pub fn marks(&self) -> &DailyAttendance {
        &self.marks
    }

    /// The mark for one student, if any.
    #[must_use]
    pub fn status_of(&self, student_id: &str) -> Option<AttendanceStatus> {
        self.marks.get(student_id).copied()
    }

    /// Mark a student and persist.
    ///
    /// # Errors
    ///
    /// Returns a store error if either write fails or if the history log
    /// cannot be read back for the rewrite. The in-memory mark is kept
    /// regardless.
    pub fn mark<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        student_id: &str,
        status: AttendanceStatus,
    ) -> Result<()> {
        self.marks.insert(student_id.to_string(), status);
        info!("Marked {} {} on {}", student_id, status, self.date);

        codec::save(store, &keys::daily(self.date), &self.marks)?;

        let mut history = History::load_for_update(&*store)?;
        history.replace_date(self.date, &self.marks);
        history.save(store)
    }

    /// Drop every mark for the date, from the date key and from the history log.
    ///
    /// Returns the number of history records removed. Callers must confirm
    /// with the user before calling this.
    ///
    /// # Errors
    ///
    /// Returns a store error if the key removal fails or the history log
    /// cannot be read or written. The in-memory marks are cleared regardless.
    pub fn clear_today<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<usize> {
        self.marks.clear();
        store.remove(&keys::daily(self.date))?;

        let mut history = History::load_for_update(&*store)?;
        let removed = history.remove_date(self.date);
        if removed > 0 {
            history.save(store)?;
        }

        info!("Cleared attendance for {} ({} record(s))", self.date, removed);
        Ok(removed)
    }

    /// Present, absent and unmarked counts against `roster`.
    #[must_use]
    pub fn summary(&self, roster: &Roster) -> DailySummary {
        report::daily_summary(roster, self.date, &self.marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttendanceRecord;
    use crate::store::MemoryStore;
    use std::collections::BTreeSet;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn records_for(store: &MemoryStore, day: NaiveDate) -> BTreeSet<AttendanceRecord> {
        History::load(store).for_date(day).cloned().collect()
    }

    fn as_records(tracker: &AttendanceTracker) -> BTreeSet<AttendanceRecord> {
        tracker
            .marks()
            .iter()
            .map(|(id, status)| AttendanceRecord::new(id.clone(), tracker.date(), *status))
            .collect()
    }

    #[test]
    fn test_load_empty() {
        let store = MemoryStore::new();
        let tracker = AttendanceTracker::load(&store, date(1));
        assert!(tracker.marks().is_empty());
        assert_eq!(tracker.date(), date(1));
    }

    #[test]
    fn test_load_today_uses_local_date() {
        let store = MemoryStore::new();
        let tracker = AttendanceTracker::load_today(&store);
        assert_eq!(tracker.date(), today());
    }

    #[test]
    fn test_mark_persists_daily_and_history() {
        let mut store = MemoryStore::new();
        let mut tracker = AttendanceTracker::load(&store, date(1));

        tracker
            .mark(&mut store, "alice", AttendanceStatus::Present)
            .unwrap();

        assert_eq!(
            store.get("attendance_2024-01-01").unwrap().as_deref(),
            Some(r#"{"alice":"present"}"#)
        );
        assert_eq!(records_for(&store, date(1)), as_records(&tracker));
        assert_eq!(
            AttendanceTracker::load(&store, date(1)).status_of("alice"),
            Some(AttendanceStatus::Present)
        );
    }

    #[test]
    fn test_history_matches_marks_after_any_sequence() {
        let mut store = MemoryStore::new();
        let mut tracker = AttendanceTracker::load(&store, date(4));
        let sequence = [
            ("a", AttendanceStatus::Present),
            ("b", AttendanceStatus::Absent),
            ("a", AttendanceStatus::Absent),
            ("c", AttendanceStatus::Present),
            ("b", AttendanceStatus::Present),
            ("a", AttendanceStatus::Present),
        ];

        for (id, status) in sequence {
            tracker.mark(&mut store, id, status).unwrap();
            assert_eq!(records_for(&store, date(4)), as_records(&tracker));
        }

        assert_eq!(History::load(&store).records().len(), 3);
    }

    #[test]
    fn test_mark_twice_is_idempotent() {
        let mut once = MemoryStore::new();
        let mut twice = MemoryStore::new();

        let mut t1 = AttendanceTracker::load(&once, date(1));
        t1.mark(&mut once, "a", AttendanceStatus::Present).unwrap();

        let mut t2 = AttendanceTracker::load(&twice, date(1));
        t2.mark(&mut twice, "a", AttendanceStatus::Present).unwrap();
        t2.mark(&mut twice, "a", AttendanceStatus::Present).unwrap();

        assert_eq!(t1.marks(), t2.marks());
        assert_eq!(
            once.get(keys::HISTORY).unwrap(),
            twice.get(keys::HISTORY).unwrap()
        );
    }

    #[test]
    fn test_mark_leaves_other_dates_alone() {
        let mut store = MemoryStore::new();
        let mut yesterday = AttendanceTracker::load(&store, date(1));
        yesterday.mark(&mut store, "a", AttendanceStatus::Absent).unwrap();

        let mut current = AttendanceTracker::load(&store, date(2));
        current.mark(&mut store, "a", AttendanceStatus::Present).unwrap();

        assert_eq!(records_for(&store, date(1)), as_records(&yesterday));
        assert_eq!(records_for(&store, date(2)), as_records(&current));
    }

    #[test]
    fn test_clear_today_removes_only_that_date() {
        let mut store = MemoryStore::new();
        let mut earlier = AttendanceTracker::load(&store, date(1));
        earlier.mark(&mut store, "a", AttendanceStatus::Present).unwrap();

        let mut tracker = AttendanceTracker::load(&store, date(2));
        tracker.mark(&mut store, "a", AttendanceStatus::Present).unwrap();
        tracker.mark(&mut store, "b", AttendanceStatus::Absent).unwrap();

        let removed = tracker.clear_today(&mut store).unwrap();

        assert_eq!(removed, 2);
        assert!(tracker.marks().is_empty());
        assert!(!store.contains_key("attendance_2024-01-02"));
        assert!(records_for(&store, date(2)).is_empty());
        assert_eq!(records_for(&store, date(1)), as_records(&earlier));
    }

    #[test]
    fn test_clear_without_history_writes_nothing() {
        let mut store = MemoryStore::new();
        let mut tracker = AttendanceTracker::load(&store, date(1));

        assert_eq!(tracker.clear_today(&mut store).unwrap(), 0);
        assert!(!store.contains_key(keys::HISTORY));
    }

    #[test]
    fn test_failed_history_write_leaves_stores_diverged_until_next_mark() {
        let mut store = MemoryStore::new();
        let mut tracker = AttendanceTracker::load(&store, date(1));
        tracker.mark(&mut store, "a", AttendanceStatus::Present).unwrap();

        store.fail_writes_for(keys::HISTORY);
        let err = tracker
            .mark(&mut store, "b", AttendanceStatus::Absent)
            .unwrap_err();
        assert!(err.is_store_write_error());

        // The date key has both marks, the log still only has the first.
        assert_eq!(AttendanceTracker::load(&store, date(1)).marks().len(), 2);
        assert_eq!(records_for(&store, date(1)).len(), 1);
        assert_eq!(tracker.marks().len(), 2);

        store.heal();
        tracker.mark(&mut store, "a", AttendanceStatus::Present).unwrap();
        assert_eq!(records_for(&store, date(1)), as_records(&tracker));
    }

    #[test]
    fn test_failed_daily_write_skips_history() {
        let mut store = MemoryStore::new();
        store.fail_writes_for("attendance_2024-01-01");
        let mut tracker = AttendanceTracker::load(&store, date(1));

        assert!(tracker
            .mark(&mut store, "a", AttendanceStatus::Present)
            .is_err());
        assert_eq!(tracker.status_of("a"), Some(AttendanceStatus::Present));
        assert!(!store.contains_key(keys::HISTORY));
    }

    #[test]
    fn test_unreadable_daily_key_starts_empty() {
        let mut store = MemoryStore::new();
        store.set("attendance_2024-01-01", "][").unwrap();
        let tracker = AttendanceTracker::load(&store, date(1));
        assert!(tracker.marks().is_empty());
    }

    #[test]
    fn test_unreadable_history_is_not_overwritten_by_mark() {
        let mut store = MemoryStore::new();
        let mut earlier = AttendanceTracker::load(&store, date(1));
        earlier.mark(&mut store, "a", AttendanceStatus::Present).unwrap();
        earlier.mark(&mut store, "b", AttendanceStatus::Absent).unwrap();
        let logged = store.get(keys::HISTORY).unwrap();

        store.fail_reads_for(keys::HISTORY);
        let mut current = AttendanceTracker::load(&store, date(2));
        let err = current
            .mark(&mut store, "a", AttendanceStatus::Present)
            .unwrap_err();
        assert!(matches!(err, crate::Error::StoreRead { .. }));

        store.heal();
        assert_eq!(store.get(keys::HISTORY).unwrap(), logged);
        assert_eq!(records_for(&store, date(1)), as_records(&earlier));
        assert_eq!(
            AttendanceTracker::load(&store, date(2)).status_of("a"),
            Some(AttendanceStatus::Present)
        );

        current.mark(&mut store, "a", AttendanceStatus::Present).unwrap();
        assert_eq!(records_for(&store, date(1)), as_records(&earlier));
        assert_eq!(records_for(&store, date(2)), as_records(&current));
    }

    #[test]
    fn test_corrupt_history_is_not_overwritten_by_mark() {
        let mut store = MemoryStore::new();
        store.set(keys::HISTORY, "[{\"studentId\":").unwrap();

        let mut tracker = AttendanceTracker::load(&store, date(1));
        assert!(tracker
            .mark(&mut store, "a", AttendanceStatus::Present)
            .is_err());
        assert_eq!(
            store.get(keys::HISTORY).unwrap().as_deref(),
            Some("[{\"studentId\":")
        );
    }

    #[test]
    fn test_clear_today_fails_on_unreadable_history() {
        let mut store = MemoryStore::new();
        let mut tracker = AttendanceTracker::load(&store, date(1));
        tracker.mark(&mut store, "a", AttendanceStatus::Present).unwrap();

        store.fail_reads_for(keys::HISTORY);
        assert!(tracker.clear_today(&mut store).is_err());
        assert!(!store.contains_key("attendance_2024-01-01"));

        store.heal();
        assert_eq!(records_for(&store, date(1)).len(), 1);
        assert_eq!(tracker.clear_today(&mut store).unwrap(), 1);
        assert!(records_for(&store, date(1)).is_empty());
    }

    #[test]
    fn test_clear_today_fails_on_corrupt_history() {
        let mut store = MemoryStore::new();
        store.set(keys::HISTORY, "{not json").unwrap();

        let mut tracker = AttendanceTracker::load(&store, date(1));
        assert!(tracker.clear_today(&mut store).is_err());
        assert_eq!(
            store.get(keys::HISTORY).unwrap().as_deref(),
            Some("{not json")
        );
    }
}
