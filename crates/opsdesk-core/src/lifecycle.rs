//! Reservation status lifecycle.
//!
//! ```text
//! pending ──▶ confirmed ──▶ reconfirmed ──▶ completed
//!    │            │              ┆
//!    └────────────┴──────────────┴┄┄▶ cancelled | no-show
//! ```
//!
//! Solid edges are always allowed. The dotted edge from `reconfirmed` is only
//! taken in [`TransitionMode::Override`]. `completed`, `cancelled` and
//! `no-show` are terminal. Field edits are refused once a reservation is
//! `reconfirmed` or `completed`.

use crate::{
    error::{ConsoleError, Result},
    models::{Reservation, ReservationStatus, ResourceField},
};

/// How strictly a status transition is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionMode {
    /// Operations staff rules
    #[default]
    Standard,
    /// Allows cancelling or marking no-show on a reconfirmed reservation
    Override,
}

/// Whether fields of the reservation may still be edited.
pub fn can_edit(reservation: &Reservation) -> bool {
    !reservation.status.is_locked()
}

/// Fails with [`ConsoleError::LockedRecord`] when the reservation is locked.
pub fn ensure_editable(reservation: &Reservation) -> Result<()> {
    if can_edit(reservation) {
        Ok(())
    } else {
        Err(ConsoleError::LockedRecord {
            id: reservation.id().clone(),
            status: reservation.status,
        })
    }
}

/// Whether the lifecycle permits moving from `from` to `to`.
pub fn is_transition_allowed(
    from: ReservationStatus,
    to: ReservationStatus,
    mode: TransitionMode,
) -> bool {
    use ReservationStatus::*;

    if from == to || from.is_terminal() {
        return false;
    }
    match (from, to) {
        (Pending, Confirmed) | (Confirmed, Reconfirmed) | (Reconfirmed, Completed) => true,
        (Pending | Confirmed, Cancelled | NoShow) => true,
        (Reconfirmed, Cancelled | NoShow) => mode == TransitionMode::Override,
        _ => false,
    }
}

/// Checks a status transition for one reservation.
pub fn check_transition(
    reservation: &Reservation,
    to: ReservationStatus,
    mode: TransitionMode,
) -> Result<()> {
    if is_transition_allowed(reservation.status, to, mode) {
        Ok(())
    } else {
        Err(ConsoleError::InvalidTransition {
            id: reservation.id().clone(),
            from: reservation.status,
            to,
        })
    }
}

/// Resources still unassigned, in operator/driver/guide order.
pub fn missing_reconfirm_fields(reservation: &Reservation) -> Vec<ResourceField> {
    ResourceField::ALL
        .into_iter()
        .filter(|field| field.value(reservation).is_none())
        .collect()
}

/// Preconditions of the reconfirm transition.
///
/// A locked reservation reports [`ConsoleError::LockedRecord`]; otherwise
/// every missing resource is listed in [`ConsoleError::Validation`].
pub fn validate_reconfirm(reservation: &Reservation) -> Result<()> {
    ensure_editable(reservation)?;
    let missing_fields = missing_reconfirm_fields(reservation);
    if !missing_fields.is_empty() {
        return Err(ConsoleError::Validation {
            id: reservation.id().clone(),
            missing_fields,
        });
    }
    check_transition(reservation, ReservationStatus::Reconfirmed, TransitionMode::Standard)
}
