//! Reservation status enumeration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of reservation statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Booked but not yet confirmed; never shown on the console
    Pending,

    /// Confirmed and still editable by operations staff
    Confirmed,

    /// Resources locked in for the day
    Reconfirmed,

    /// Service delivered
    Completed,

    /// Cancelled by the customer or the office
    Cancelled,

    /// Customer did not show up
    #[serde(rename = "no-show", alias = "no_show", alias = "noshow")]
    NoShow,
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "reconfirmed" => Ok(ReservationStatus::Reconfirmed),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" | "canceled" => Ok(ReservationStatus::Cancelled),
            "no-show" | "no_show" | "noshow" => Ok(ReservationStatus::NoShow),
            _ => Err(format!("Invalid reservation status: {s}")),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReservationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [ReservationStatus; 6] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Reconfirmed,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
        ReservationStatus::NoShow,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Reconfirmed => "reconfirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "no-show",
        }
    }

    /// Reconfirmed and completed reservations reject field edits.
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Reconfirmed | ReservationStatus::Completed
        )
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled | ReservationStatus::NoShow
        )
    }

    /// Whether the reservation belongs on the operations console at all.
    pub fn is_operational(&self) -> bool {
        !matches!(self, ReservationStatus::Pending)
    }

    /// Status with a consistent icon for table cells.
    ///
    /// ```rust
    /// use opsdesk_core::models::ReservationStatus;
    ///
    /// assert_eq!(ReservationStatus::Reconfirmed.with_icon(), "🔒 Reconfirmed");
    /// assert_eq!(ReservationStatus::Confirmed.with_icon(), "○ Confirmed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "… Pending",
            ReservationStatus::Confirmed => "○ Confirmed",
            ReservationStatus::Reconfirmed => "🔒 Reconfirmed",
            ReservationStatus::Completed => "✓ Completed",
            ReservationStatus::Cancelled => "✗ Cancelled",
            ReservationStatus::NoShow => "∅ No-show",
        }
    }
}
