//! Data models for the reconciliation console.
//!
//! This module contains the domain types the console works with:
//! reservations and their two identifiers, the whitelisted editable fields,
//! conflict descriptors, filters and column preferences. Display
//! implementations for table rendering live in [`crate::display`].
//!
//! # Identifiers
//!
//! A reservation is displayed and selected under its [`ReservationId`] but
//! written under its [`BookingId`]. Both live in one [`ReservationKey`]:
//!
//! ```rust
//! use jiff::civil::date;
//! use opsdesk_core::models::Reservation;
//!
//! let reservation = Reservation::new("R-7#2", "7", date(2024, 6, 1));
//! assert_eq!(reservation.id().as_str(), "R-7#2");
//! assert_eq!(reservation.booking_id().as_str(), "7");
//! ```

pub mod columns;
pub mod conflict;
pub mod fields;
pub mod filters;
pub mod requests;
pub mod reservation;
pub mod status;

#[cfg(test)]
mod tests;

pub use columns::{Column, ColumnPreferences, ColumnSetting};
pub use conflict::{ConflictDescriptor, ResourceType};
pub use fields::{EditableField, EditedFieldSet, FieldAccessor, FieldKind, FieldValue, ResourceField};
pub use filters::ConsoleFilter;
pub use requests::{BatchRequest, ReservationList, ServiceOrderResponse, StatusUpdate};
pub use reservation::{
    assigned, BookingId, Passengers, Pricing, Reservation, ReservationId, ReservationKey,
};
pub use status::ReservationStatus;
