//! In-process reservation store.
//!
//! Used for offline fixtures and as the test double of the REST API: it
//! applies writes to its own list, records every call it receives, can be
//! told to fail the next call of a given operation, and can hold writes open
//! to exercise in-flight behavior.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::watch;

use super::ReservationSource;
use crate::{
    error::{ConsoleError, Result},
    models::{
        BookingId, EditedFieldSet, Reservation, ReservationList, ReservationStatus,
        ServiceOrderResponse,
    },
};

/// Operations a failure can be scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOperation {
    List,
    Update,
    Status,
    ServiceOrders,
    Confirmations,
}

/// A call received by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    List,
    Update {
        booking_id: BookingId,
        body: serde_json::Value,
    },
    Status {
        booking_id: BookingId,
        status: ReservationStatus,
    },
    ServiceOrders {
        booking_ids: Vec<BookingId>,
    },
    Confirmations {
        booking_ids: Vec<BookingId>,
    },
}

#[derive(Debug, Default)]
struct MemoryState {
    reservations: Vec<Reservation>,
    calls: Vec<SourceCall>,
    failures: HashMap<SourceOperation, (u16, String)>,
    service_order_url: Option<String>,
}

/// Reservation source holding its data in memory.
#[derive(Debug)]
pub struct InMemoryReservationSource {
    state: Mutex<MemoryState>,
    gate: watch::Sender<bool>,
}

impl Default for InMemoryReservationSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryReservationSource {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Mutex::new(MemoryState {
                reservations,
                ..Default::default()
            }),
            gate,
        }
    }

    /// Loads a JSON fixture in the same shape the list endpoint returns.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConsoleError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        let list: ReservationList = serde_json::from_str(&contents)?;
        Ok(Self::new(list.into()))
    }

    /// Document URL returned by the service-order call.
    pub fn with_service_order_url(self, url: impl Into<String>) -> Self {
        self.state().service_order_url = Some(url.into());
        self
    }

    /// Makes the next call of `operation` fail with a server error.
    pub fn fail_next(&self, operation: SourceOperation, status: u16, message: impl Into<String>) {
        self.state()
            .failures
            .insert(operation, (status, message.into()));
    }

    /// Writes wait until [`release_writes`](Self::release_writes) is called.
    pub fn hold_writes(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_writes(&self) {
        self.gate.send_replace(true);
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<SourceCall> {
        self.state().calls.clone()
    }

    /// Calls other than list reads.
    pub fn write_calls(&self) -> Vec<SourceCall> {
        self.state()
            .calls
            .iter()
            .filter(|call| !matches!(call, SourceCall::List))
            .cloned()
            .collect()
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.state().reservations.clone()
    }

    /// Replaces the stored list, as another user editing the backend would.
    pub fn replace_reservations(&self, reservations: Vec<Reservation>) {
        self.state().reservations = reservations;
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: SourceCall, operation: SourceOperation) -> Result<()> {
        let mut state = self.state();
        state.calls.push(call);
        match state.failures.remove(&operation) {
            Some((status, message)) => Err(ConsoleError::Server { status, message }),
            None => Ok(()),
        }
    }

    async fn wait_for_gate(&self) {
        let mut open = self.gate.subscribe();
        // The sender lives in self, so the channel cannot close here.
        let _ = open.wait_for(|open| *open).await;
    }

    fn with_booking<T>(
        &self,
        booking_id: &BookingId,
        apply: impl FnOnce(&mut Reservation) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state();
        let reservation = state
            .reservations
            .iter_mut()
            .find(|r| r.booking_id() == booking_id)
            .ok_or_else(|| ConsoleError::Server {
                status: 404,
                message: format!("Reservation {booking_id} not found"),
            })?;
        apply(reservation)
    }
}

#[async_trait]
impl ReservationSource for InMemoryReservationSource {
    async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        self.record(SourceCall::List, SourceOperation::List)?;
        Ok(self.reservations())
    }

    async fn update_reservation(
        &self,
        booking_id: &BookingId,
        changes: &EditedFieldSet,
    ) -> Result<()> {
        self.wait_for_gate().await;
        let body = serde_json::to_value(changes)?;
        self.record(
            SourceCall::Update {
                booking_id: booking_id.clone(),
                body,
            },
            SourceOperation::Update,
        )?;
        self.with_booking(booking_id, |reservation| {
            for (field, value) in changes.iter() {
                field.set(reservation, value.clone())?;
            }
            Ok(())
        })
    }

    async fn update_status(&self, booking_id: &BookingId, status: ReservationStatus) -> Result<()> {
        self.wait_for_gate().await;
        self.record(
            SourceCall::Status {
                booking_id: booking_id.clone(),
                status,
            },
            SourceOperation::Status,
        )?;
        self.with_booking(booking_id, |reservation| {
            reservation.status = status;
            Ok(())
        })
    }

    async fn generate_service_orders(
        &self,
        booking_ids: &[BookingId],
    ) -> Result<ServiceOrderResponse> {
        self.wait_for_gate().await;
        self.record(
            SourceCall::ServiceOrders {
                booking_ids: booking_ids.to_vec(),
            },
            SourceOperation::ServiceOrders,
        )?;
        Ok(ServiceOrderResponse {
            pdf_url: self.state().service_order_url.clone(),
        })
    }

    async fn send_confirmations(&self, booking_ids: &[BookingId]) -> Result<()> {
        self.wait_for_gate().await;
        self.record(
            SourceCall::Confirmations {
                booking_ids: booking_ids.to_vec(),
            },
            SourceOperation::Confirmations,
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::models::{EditableField, FieldValue};

    fn source() -> InMemoryReservationSource {
        InMemoryReservationSource::new(vec![Reservation::new("R-1", "1001", date(2024, 6, 1))])
    }

    #[tokio::test]
    async fn test_update_applies_changes_by_booking_id() {
        let source = source();
        let changes: EditedFieldSet = [(EditableField::Driver, FieldValue::text("Ana"))]
            .into_iter()
            .collect();

        source
            .update_reservation(&BookingId::new("1001"), &changes)
            .await
            .unwrap();

        assert_eq!(source.reservations()[0].driver.as_deref(), Some("Ana"));
        assert_eq!(
            source.write_calls(),
            vec![SourceCall::Update {
                booking_id: BookingId::new("1001"),
                body: serde_json::json!({ "driver": "Ana" }),
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_booking_is_not_found() {
        let source = source();
        let err = source
            .update_status(&BookingId::new("R-1"), ReservationStatus::Reconfirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Server { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_scheduled_failure_fires_once() {
        let source = source();
        source.fail_next(SourceOperation::Confirmations, 502, "Mail relay down");

        let err = source
            .send_confirmations(&[BookingId::new("1001")])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Mail relay down");
        assert!(source
            .send_confirmations(&[BookingId::new("1001")])
            .await
            .is_ok());
    }
}
