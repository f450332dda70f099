//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    batch::BatchOutcome,
    console::CommitOutcome,
    models::Reservation,
};

/// Outcome of saving staged changes.
///
/// ```rust
/// use opsdesk_core::{
///     console::CommitOutcome,
///     display::CommitResult,
///     models::{BookingId, EditableField, EditedFieldSet, FieldValue},
/// };
///
/// let mut fields = EditedFieldSet::new();
/// fields.insert(EditableField::Driver, FieldValue::text("Carlos"));
/// let outcome = CommitOutcome {
///     id: "A".into(),
///     booking_id: BookingId::new("7"),
///     fields,
///     refreshed: true,
/// };
///
/// let output = CommitResult(&outcome).to_string();
/// assert!(output.starts_with("Saved 1 change to A (booking 7)"));
/// assert!(output.contains("- driver: Carlos"));
/// ```
pub struct CommitResult<'a>(pub &'a CommitOutcome);

impl fmt::Display for CommitResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        let count = outcome.fields.len();
        writeln!(
            f,
            "Saved {count} {} to {} (booking {})",
            if count == 1 { "change" } else { "changes" },
            outcome.id,
            outcome.booking_id
        )?;

        writeln!(f)?;
        writeln!(f, "Changes made:")?;
        for (field, value) in outcome.fields.iter() {
            writeln!(f, "- {field}: {value}")?;
        }

        if !outcome.refreshed {
            writeln!(f)?;
            writeln!(f, "*Reservations could not be reloaded; the list may be stale.*")?;
        }
        Ok(())
    }
}

/// A reservation that was just locked.
pub struct ReconfirmResult<'a>(pub &'a Reservation);

impl fmt::Display for ReconfirmResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reconfirmed {}; it is now locked for editing.", self.0.id())?;
        writeln!(f)?;
        write!(f, "{}", self.0)
    }
}

/// Outcome of a batch action.
pub struct BatchResult<'a>(pub &'a BatchOutcome);

impl fmt::Display for BatchResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        writeln!(f, "{}", outcome.summary())?;
        if let Some(url) = &outcome.document_url {
            writeln!(f)?;
            writeln!(f, "Document: {url}")?;
        }
        writeln!(f)?;
        let ids: Vec<&str> = outcome.booking_ids.iter().map(|id| id.as_str()).collect();
        writeln!(f, "Bookings: {}", ids.join(", "))
    }
}
