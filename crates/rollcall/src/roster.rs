//! The student roster.
//!
//! A [`Roster`] is loaded once from the `students` key and written back in
//! full after every change. Validation happens before any state changes;
//! a failed write leaves the in-memory roster updated so the caller can
//! retry by saving again.
//!
//! Load with [`Roster::load_for_update`] before adding or deleting, so an
//! unreadable roster is reported instead of being replaced. Student entries
//! that do not decode are dropped by the next write.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::codec;
use crate::error::{Error, Result};
use crate::keys;
use crate::model::Student;
use crate::store::KeyValueStore;

/// The list of students, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    /// Load the roster from the store.
    ///
    /// Missing or unreadable data yields an empty roster.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let students: Vec<Student> = codec::load_list(store, keys::STUDENTS);
        debug!("Loaded {} student(s)", students.len());
        Self { students }
    }

    /// Load the roster ahead of changing it.
    ///
    /// A missing key is an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreRead`] if the key cannot be read, is not JSON or
    /// is not an array.
    pub fn load_for_update<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        let students: Vec<Student> = codec::load_list_strict(store, keys::STUDENTS)?;
        debug!("Loaded {} student(s) for update", students.len());
        Ok(Self { students })
    }

    /// Build a roster from students already in memory.
    #[must_use]
    pub fn from_students(students: Vec<Student>) -> Self {
        Self { students }
    }

    /// Write the full roster back to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        codec::save(store, keys::STUDENTS, &self.students)
    }

    /// All students, in roster order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Number of students on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Check if the roster has no students.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Look up a student by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Add a student and persist the roster.
    ///
    /// `name` and `email` are trimmed; an email that is empty after trimming
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `name` is blank, in which case
    /// nothing changes. Returns a store error if the write fails; the
    /// student stays in the in-memory roster.
    pub fn add_student<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
        email: Option<&str>,
    ) -> Result<Student> {
        self.add_student_at(store, name, email, Utc::now())
    }

    /// Same as [`add_student`](Self::add_student) with an explicit creation time.
    ///
    /// # Errors
    ///
    /// See [`add_student`](Self::add_student).
    pub fn add_student_at<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
        email: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Student> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "student name must not be empty"));
        }
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        let student = Student {
            id: self.next_id(created_at),
            name: name.to_string(),
            email,
            created_at,
        };

        self.students.push(student.clone());
        info!("Added student {} ({})", student.name, student.id);
        self.save(store)?;
        Ok(student)
    }

    /// Remove the student with `id` and persist the roster.
    ///
    /// Returns `true` if a student was removed. Attendance history is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write fails.
    pub fn delete_student<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: &str,
    ) -> Result<bool> {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        let removed = self.students.len() != before;

        if removed {
            info!("Deleted student {}", id);
        } else {
            debug!("No student {} to delete", id);
        }
        self.save(store)?;
        Ok(removed)
    }

    /// Creation time in milliseconds, bumped until it is unused.
    fn next_id(&self, created_at: DateTime<Utc>) -> String {
        let mut candidate = created_at.timestamp_millis();
        while self.find(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}
