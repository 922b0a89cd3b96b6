//! Error types for rollcall.
//!
//! Every fallible operation in the crate returns [`Result`]. Read failures
//! from the key-value store are produced here as [`Error::StoreRead`]. Loads
//! for display recover from them by treating the value as absent; loads that
//! precede a rewrite surface them, as does everything else.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rollcall operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Domain Errors ===
    /// User input failed validation. Nothing was changed.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// A student id was not found on the roster.
    #[error("no student with id '{id}' on the roster")]
    UnknownStudent {
        /// The id that was looked up.
        id: String,
    },

    // === Store Errors ===
    /// Reading a key from the store failed.
    #[error("failed to read '{key}' from store: {message}")]
    StoreRead {
        /// The key being read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Writing or removing a key in the store failed.
    #[error("failed to write '{key}' to store: {message}")]
    StoreWrite {
        /// The key being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed outside of a keyed read or write.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rollcall operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a store read error.
    #[must_use]
    pub fn store_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a store write error.
    #[must_use]
    pub fn store_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an unknown student error.
    #[must_use]
    pub fn unknown_student(id: impl Into<String>) -> Self {
        Self::UnknownStudent { id: id.into() }
    }

    /// Check if this error is a rejected user input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error came from a failed store write.
    #[must_use]
    pub fn is_store_write_error(&self) -> bool {
        matches!(self, Self::StoreWrite { .. })
    }
}
