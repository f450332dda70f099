//! Request and response bodies exchanged with the reservation service.

use serde::{Deserialize, Serialize};

use super::{BookingId, Reservation, ReservationStatus};

/// Body of the status update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
}

/// Body of both batch calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub reservation_ids: Vec<BookingId>,
}

/// Response of the service-order call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderResponse {
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// The list endpoint answers with a bare array or a wrapped one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReservationList {
    Bare(Vec<Reservation>),
    Wrapped { reservations: Vec<Reservation> },
}

impl From<ReservationList> for Vec<Reservation> {
    fn from(list: ReservationList) -> Self {
        match list {
            ReservationList::Bare(reservations) => reservations,
            ReservationList::Wrapped { reservations } => reservations,
        }
    }
}
