//! Batch actions over a selection of reservations.
//!
//! Each action is a single call to the reservation service. There is no
//! per-item result and no rollback: the batch either succeeds as a whole or
//! is reported as failed as a whole.

use std::{fmt, sync::Arc};

use log::{info, warn};

use crate::{
    error::{ConsoleError, Result},
    models::BookingId,
    source::ReservationSource,
};

/// Actions that operate on many reservations at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BatchAction {
    /// Generate service orders for drivers and guides
    ServiceOrders,
    /// Email confirmations to customers
    Confirmations,
}

impl BatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchAction::ServiceOrders => "service orders",
            BatchAction::Confirmations => "confirmation emails",
        }
    }
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful batch call.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub action: BatchAction,
    pub booking_ids: Vec<BookingId>,
    /// Generated document, opened by the caller when present
    pub document_url: Option<String>,
}

impl BatchOutcome {
    pub fn summary(&self) -> String {
        let count = self.booking_ids.len();
        let noun = if count == 1 { "reservation" } else { "reservations" };
        match self.action {
            BatchAction::ServiceOrders => format!("Generated service orders for {count} {noun}"),
            BatchAction::Confirmations => format!("Sent confirmation emails for {count} {noun}"),
        }
    }
}

/// Runs batch actions against the reservation source.
#[derive(Clone)]
pub struct BatchActionCoordinator {
    source: Arc<dyn ReservationSource>,
}

impl BatchActionCoordinator {
    pub fn new(source: Arc<dyn ReservationSource>) -> Self {
        Self { source }
    }

    /// Runs `action` for the given bookings.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::EmptySelection` without calling the service when
    /// `booking_ids` is empty, and the source's error when the call fails.
    pub async fn run(&self, action: BatchAction, booking_ids: &[BookingId]) -> Result<BatchOutcome> {
        if booking_ids.is_empty() {
            return Err(ConsoleError::EmptySelection {
                action: action.to_string(),
            });
        }

        info!("Requesting {action} for {} reservations", booking_ids.len());
        let document_url = match action {
            BatchAction::ServiceOrders => {
                self.source
                    .generate_service_orders(booking_ids)
                    .await
                    .inspect_err(|e| warn!("Service order generation failed: {e}"))?
                    .pdf_url
            }
            BatchAction::Confirmations => {
                self.source
                    .send_confirmations(booking_ids)
                    .await
                    .inspect_err(|e| warn!("Sending confirmations failed: {e}"))?;
                None
            }
        };

        Ok(BatchOutcome {
            action,
            booking_ids: booking_ids.to_vec(),
            document_url,
        })
    }

    pub async fn generate_service_orders(&self, booking_ids: &[BookingId]) -> Result<BatchOutcome> {
        self.run(BatchAction::ServiceOrders, booking_ids).await
    }

    pub async fn send_confirmations(&self, booking_ids: &[BookingId]) -> Result<BatchOutcome> {
        self.run(BatchAction::Confirmations, booking_ids).await
    }
}
