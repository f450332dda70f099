//! Display formatting for the console.
//!
//! Domain types carry their own compact `Display` (ids, statuses, field
//! values). Anything shaped for a screen goes through the wrappers here, which
//! all produce markdown for the terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Console rows,  │    │ Display Wrapper │    │    Markdown     │
//! │ conflicts, etc. │───▶│      Types      │───▶│     Output      │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: the console table, the conflict banner, notification
//!   lists and column settings
//! - [`results`]: outcomes of commit, reconfirm and batch actions
//! - [`status`]: one-line success/failure messages
//! - [`datetime`]: dates and clock times
//! - [`models`]: reservation detail cards
//!
//! ## Usage
//!
//! ```rust
//! use opsdesk_core::display::{Conflicts, OperationStatus};
//! use opsdesk_core::models::{ConflictDescriptor, ResourceType};
//!
//! let banner = Conflicts(vec![ConflictDescriptor::new(
//!     ResourceType::Driver,
//!     "Carlos",
//!     "A".into(),
//!     "B".into(),
//! )]);
//! assert!(banner.to_string().contains("Driver Carlos is assigned to both A and B"));
//!
//! let status = OperationStatus::failure("Reservation A is reconfirmed".to_string());
//! assert!(status.to_string().starts_with("Error:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{ColumnSettings, Conflicts, ConsoleTable, Notifications};
pub use datetime::{ClockTime, OperationDay};
pub use results::{BatchResult, CommitResult, ReconfirmResult};
pub use status::OperationStatus;
