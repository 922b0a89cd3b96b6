//! The cumulative attendance history log.
//!
//! The log is one JSON array under `attendance_history`. It is never
//! patched in place: callers load it, replace or drop one date's records,
//! and write the whole array back.
//!
//! Rewrites keep the content of what they do not touch. Records are written
//! back as the JSON they were read from, and entries that do not decode as a
//! record are carried through after the decoded ones. Only entries for the
//! date being replaced or removed are ever dropped.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::codec;
use crate::error::Result;
use crate::keys;
use crate::model::{format_date, AttendanceRecord, DailyAttendance};
use crate::store::KeyValueStore;

/// All attendance records across all dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<AttendanceRecord>,
    /// Stored form of each record, index-aligned with `records`. `None` for
    /// records added since the load.
    stored: Vec<Option<Value>>,
    undecoded: Vec<Value>,
}

impl History {
    /// Load the history log for display.
    ///
    /// Missing or unreadable data yields an empty log.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::load_for_update(store).unwrap_or_else(|e| {
            warn!("Treating '{}' as absent: {}", keys::HISTORY, e);
            Self::default()
        })
    }

    /// Load the history log ahead of rewriting it.
    ///
    /// A missing key is an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreRead`](crate::Error::StoreRead) if the key
    /// cannot be read, is not JSON or is not an array.
    pub fn load_for_update<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        let mut history = Self::default();
        for (index, item) in codec::read_array_strict(store, keys::HISTORY)?
            .into_iter()
            .enumerate()
        {
            let entry = index.to_string();
            match codec::decode_entry::<AttendanceRecord>(keys::HISTORY, &entry, item.clone()) {
                Some(record) => {
                    history.records.push(record);
                    history.stored.push(Some(item));
                }
                None => history.undecoded.push(item),
            }
        }
        debug!(
            "Loaded {} history record(s), {} undecoded",
            history.records.len(),
            history.undecoded.len()
        );
        Ok(history)
    }

    /// Build a log from records already in memory.
    #[must_use]
    pub fn from_records(records: Vec<AttendanceRecord>) -> Self {
        Self {
            stored: vec![None; records.len()],
            records,
            undecoded: Vec::new(),
        }
    }

    /// Write the full log back to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let mut entries = Vec::with_capacity(self.records.len() + self.undecoded.len());
        for (record, stored) in self.records.iter().zip(&self.stored) {
            entries.push(match stored {
                Some(value) => value.clone(),
                None => serde_json::to_value(record)?,
            });
        }
        entries.extend(self.undecoded.iter().cloned());
        codec::save(store, keys::HISTORY, &entries)
    }

    /// All decoded records, in log order.
    #[must_use]
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Number of stored entries that are not usable records.
    #[must_use]
    pub fn undecoded_len(&self) -> usize {
        self.undecoded.len()
    }

    /// Records for one date.
    pub fn for_date(&self, date: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> {
        self.records.iter().filter(move |r| r.date == date)
    }

    /// Make the records for `date` exactly match `daily`.
    ///
    /// Every existing record for the date is dropped, then one record per
    /// entry of `daily` is appended. Other dates are untouched.
    pub fn replace_date(&mut self, date: NaiveDate, daily: &DailyAttendance) {
        self.remove_date(date);
        for (student_id, status) in daily {
            self.records
                .push(AttendanceRecord::new(student_id.clone(), date, *status));
            self.stored.push(None);
        }
    }

    /// Drop every entry for `date`, returning how many were removed.
    ///
    /// Undecoded entries whose `date` field is exactly the date's
    /// `YYYY-MM-DD` form are dropped too.
    pub fn remove_date(&mut self, date: NaiveDate) -> usize {
        let before = self.records.len() + self.undecoded.len();

        let (records, stored) = std::mem::take(&mut self.records)
            .into_iter()
            .zip(std::mem::take(&mut self.stored))
            .filter(|(record, _)| record.date != date)
            .unzip();
        self.records = records;
        self.stored = stored;

        let day = format_date(date);
        self.undecoded
            .retain(|entry| entry.get("date").and_then(Value::as_str) != Some(day.as_str()));

        before - (self.records.len() + self.undecoded.len())
    }
}
