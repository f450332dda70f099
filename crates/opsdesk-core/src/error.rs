//! Error types for the reconciliation console.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{ReservationId, ReservationStatus, ResourceField};

/// Comprehensive error type for all console operations.
///
/// Lock, validation and selection errors are raised before any request is
/// made. Network and server errors come back from the reservation source.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Edit attempted on a reconfirmed or completed reservation
    #[error("Reservation {id} is {status} and can no longer be edited")]
    LockedRecord {
        id: ReservationId,
        status: ReservationStatus,
    },
    /// Reconfirm attempted without every resource assigned
    #[error("Cannot reconfirm {id}: missing {}", join_fields(missing_fields))]
    Validation {
        id: ReservationId,
        missing_fields: Vec<ResourceField>,
    },
    /// Status change the lifecycle does not allow
    #[error("Cannot change status of {id} from {from} to {to}")]
    InvalidTransition {
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    },
    /// A request for the same reservation or batch action is still running
    #[error("An operation on {scope} is already in progress")]
    OperationInFlight { scope: String },
    /// Batch action invoked with nothing selected
    #[error("No reservations selected for {action}")]
    EmptySelection { action: String },
    /// Reservation not present in the loaded list
    #[error("Reservation {id} not found")]
    ReservationNotFound { id: ReservationId },
    /// Transport failure talking to the reservation service
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// Non-2xx response; `message` is the server's own text
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Preference database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn join_fields(fields: &[ResourceField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ConsoleError {
        ConsoleError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ConsoleError {
        ConsoleError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ConsoleError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a transport-level failure.
    pub fn network(context: &str, source: reqwest::Error) -> Self {
        Self::Network {
            message: format!("{context}: {source}"),
            source: Some(source),
        }
    }

    /// True for errors that never left the process: lock, validation,
    /// transition and selection checks.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::LockedRecord { .. }
                | Self::Validation { .. }
                | Self::InvalidTransition { .. }
                | Self::OperationInFlight { .. }
                | Self::EmptySelection { .. }
                | Self::ReservationNotFound { .. }
                | Self::InvalidInput { .. }
        )
    }

    /// True for failures reported by or on the way to the reservation service.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ConsoleError::database(message).with_source(e))
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
