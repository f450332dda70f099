//! Core library of the opsdesk daily operations reconciliation console.
//!
//! The console takes one day's reservations from the reservation service,
//! flags drivers and guides booked twice, holds field edits until they are
//! saved, locks reservations once they are reconfirmed and runs batch actions
//! (service orders, confirmation emails) for a selection.
//!
//! # Layout
//!
//! - [`models`]: reservations, editable fields, conflicts, filters, columns
//! - [`lifecycle`]: status transitions and edit permissions
//! - [`conflicts`]: double-booking detection
//! - [`staging`]: unsaved field edits
//! - [`console`]: the orchestrator and its builder
//! - [`batch`]: multi-reservation actions
//! - [`source`]: the reservation service boundary (REST or in-memory)
//! - [`preferences`] and [`db`]: local column preferences in SQLite
//! - [`display`]: markdown renderings for the terminal
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jiff::civil::date;
//! use opsdesk_core::{
//!     models::{ColumnPreferences, ConsoleFilter, EditableField, FieldValue, Reservation},
//!     source::InMemoryReservationSource,
//!     ReconciliationConsole,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut first = Reservation::new("A", "101", date(2024, 6, 1));
//! first.driver = Some("Carlos".to_string());
//! let second = Reservation::new("B", "102", date(2024, 6, 1));
//!
//! let source = Arc::new(InMemoryReservationSource::new(vec![first, second]));
//! let console = ReconciliationConsole::new(
//!     source,
//!     ColumnPreferences::default(),
//!     ConsoleFilter::for_date(date(2024, 6, 1)),
//! );
//! console.refresh().await?;
//!
//! // Staging Carlos on B double-books him before anything is saved.
//! console.update(&"B".into(), EditableField::Driver, FieldValue::text("Carlos"))?;
//! assert_eq!(console.conflicts().len(), 1);
//!
//! console.commit(&"B".into()).await?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod conflicts;
pub mod console;
pub mod db;
pub mod display;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod notifications;
pub mod params;
pub mod preferences;
pub mod source;
pub mod staging;

// Re-export commonly used types
pub use batch::{BatchAction, BatchActionCoordinator, BatchOutcome};
pub use conflicts::detect_conflicts;
pub use console::{
    CommitOutcome, ConsoleBuilder, ConsoleRow, ConsoleSession, ConsoleSummary,
    ReconciliationConsole,
};
pub use db::Database;
pub use display::{
    BatchResult, ColumnSettings, CommitResult, Conflicts, ConsoleTable, Notifications,
    OperationStatus, ReconfirmResult,
};
pub use error::{ConsoleError, Result};
pub use lifecycle::TransitionMode;
pub use models::{
    BookingId, Column, ColumnPreferences, ConflictDescriptor, ConsoleFilter, EditableField,
    EditedFieldSet, FieldValue, Reservation, ReservationId, ReservationStatus,
};
pub use notifications::{Notification, NotificationLevel};
pub use params::{BatchTarget, EditReservation, PageRequest};
pub use preferences::PreferenceStore;
pub use source::{HttpReservationSource, HttpSourceConfig, InMemoryReservationSource, ReservationSource};
pub use staging::EditStagingBuffer;
