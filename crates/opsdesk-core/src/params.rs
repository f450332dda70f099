//! Parameter structures for console operations.
//!
//! Framework-free inputs shared by the CLI and tests. Interface layers add
//! their own derives on wrapper types and convert with `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │    CLI Args     │───▶│   Core Params   │
//! │ (clap derives)  │    │ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘
//! ```

use crate::models::{EditableField, FieldValue, ReservationId};

/// A set of field changes to stage on one reservation and save in a single
/// write.
#[derive(Debug, Clone, PartialEq)]
pub struct EditReservation {
    pub id: ReservationId,
    pub changes: Vec<(EditableField, FieldValue)>,
}

impl EditReservation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ReservationId::new(id),
            changes: Vec::new(),
        }
    }

    pub fn with_change(mut self, field: EditableField, value: FieldValue) -> Self {
        self.changes.push((field, value));
        self
    }
}

/// Which reservations a batch action runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchTarget {
    /// Every reservation in the current view
    AllVisible,
    /// Specific reservations by display id
    Ids(Vec<ReservationId>),
}

/// One page of the console table; `page` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: usize = 25;

    pub fn index(&self) -> usize {
        self.page.saturating_sub(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}
