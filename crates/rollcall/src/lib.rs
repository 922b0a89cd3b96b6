//! `rollcall` - classroom attendance tracking over a local key-value store
//!
//! A roster of students is marked present or absent once per calendar day.
//! Each day's marks are mirrored into a cumulative history log, from which
//! per-student and overall statistics are derived.
//!
//! State lives in a [`KeyValueStore`] passed explicitly to every operation:
//!
//! ```
//! use rollcall::{AttendanceStatus, AttendanceTracker, History, MemoryStore, Roster};
//! use rollcall::report::overall_stats;
//!
//! let mut store = MemoryStore::new();
//! let mut roster = Roster::load(&store);
//! let alice = roster.add_student(&mut store, "Alice", None)?;
//!
//! let mut today = AttendanceTracker::load_today(&store);
//! today.mark(&mut store, &alice.id, AttendanceStatus::Present)?;
//!
//! let stats = overall_stats(History::load(&store).records());
//! assert_eq!(stats.present_records, 1);
//! # Ok::<(), rollcall::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod attendance;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod keys;
pub mod logging;
pub mod model;
pub mod report;
pub mod roster;
pub mod store;

pub use attendance::{today, AttendanceTracker};
pub use config::Config;
pub use error::{Error, Result};
pub use history::History;
pub use logging::init_logging;
pub use model::{AttendanceRecord, AttendanceStatus, DailyAttendance, RecordStatus, Student};
pub use report::{OverallStats, Report, StudentStats};
pub use roster::Roster;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
