//! Boundary to the reservation service.
//!
//! The console never talks to the backend directly. It goes through a
//! [`ReservationSource`], which is either the REST client in [`http`] or the
//! in-process store in [`memory`] used for fixtures and tests.
//!
//! Every write takes a [`BookingId`]; the display id of a reservation cannot
//! be passed to a write by mistake.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{BookingId, EditedFieldSet, Reservation, ReservationStatus, ServiceOrderResponse},
};

pub mod http;
pub mod memory;

pub use http::{HttpReservationSource, HttpSourceConfig};
pub use memory::{InMemoryReservationSource, SourceCall, SourceOperation};

/// Reads and writes reservations on behalf of the console.
#[async_trait]
pub trait ReservationSource: Send + Sync {
    /// Every reservation visible to the current user.
    async fn list_reservations(&self) -> Result<Vec<Reservation>>;

    /// Writes only the changed fields of one reservation.
    async fn update_reservation(&self, booking_id: &BookingId, changes: &EditedFieldSet)
        -> Result<()>;

    /// Writes a new status. Used for the reconfirm transition.
    async fn update_status(&self, booking_id: &BookingId, status: ReservationStatus) -> Result<()>;

    /// Generates service orders for a set of bookings.
    async fn generate_service_orders(&self, booking_ids: &[BookingId])
        -> Result<ServiceOrderResponse>;

    /// Sends confirmation emails for a set of bookings.
    async fn send_confirmations(&self, booking_ids: &[BookingId]) -> Result<()>;
}
