//! Staged field edits awaiting commit.
//!
//! The buffer keeps two views in step: the value each open cell displays and
//! the per-reservation set of changes that the next commit sends. Both are
//! keyed by [`ReservationId`] across every date, so changing the console
//! filter never drops edits.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::{
    error::{ConsoleError, Result},
    lifecycle::{self, TransitionMode},
    models::{EditableField, EditedFieldSet, FieldValue, Reservation, ReservationId, ReservationStatus},
};

/// Uncommitted edits for any number of reservations.
#[derive(Debug, Default)]
pub struct EditStagingBuffer {
    editing: HashMap<(ReservationId, EditableField), FieldValue>,
    pending: HashMap<ReservationId, EditedFieldSet>,
}

impl EditStagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a cell for editing and returns the value it should display.
    ///
    /// Locked reservations are refused and nothing is recorded.
    pub fn start_edit(
        &mut self,
        reservation: &Reservation,
        field: EditableField,
    ) -> Result<FieldValue> {
        lifecycle::ensure_editable(reservation)?;
        let current = self.staged_or_source(reservation, field);
        self.editing
            .insert((reservation.id().clone(), field), current.clone());
        Ok(current)
    }

    /// Overwrites the pending value of a field and the cell showing it.
    pub fn update(
        &mut self,
        reservation: &Reservation,
        field: EditableField,
        value: FieldValue,
    ) -> Result<()> {
        lifecycle::ensure_editable(reservation)?;
        if value.kind() != field.kind() {
            return Err(ConsoleError::invalid_input(field.as_str()).with_reason(format!(
                "expected a {:?} value, got {:?}",
                field.kind(),
                value.kind()
            )));
        }
        if let FieldValue::Status(status) = &value {
            check_staged_status(reservation, *status)?;
        }

        let id = reservation.id().clone();
        debug!("Staging {field} = {value} for {id}");
        self.editing.insert((id.clone(), field), value.clone());
        self.pending.entry(id).or_default().insert(field, value);
        Ok(())
    }

    /// Value a cell displays: open cell, then pending edit, then source.
    pub fn displayed_value(&self, reservation: &Reservation, field: EditableField) -> FieldValue {
        self.editing
            .get(&(reservation.id().clone(), field))
            .cloned()
            .unwrap_or_else(|| self.staged_or_source(reservation, field))
    }

    /// Whether a cell is currently open.
    pub fn is_editing(&self, id: &ReservationId, field: EditableField) -> bool {
        self.editing.contains_key(&(id.clone(), field))
    }

    pub fn pending(&self, id: &ReservationId) -> Option<&EditedFieldSet> {
        self.pending.get(id).filter(|set| !set.is_empty())
    }

    pub fn has_unsaved(&self, id: &ReservationId) -> bool {
        self.pending(id).is_some()
    }

    /// Reservations with uncommitted changes, sorted.
    pub fn unsaved_ids(&self) -> BTreeSet<ReservationId> {
        self.pending
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Source reservation with its pending values applied.
    pub fn overlay(&self, reservation: &Reservation) -> Reservation {
        match self.pending(reservation.id()) {
            Some(set) => set.overlay(reservation),
            None => reservation.clone(),
        }
    }

    /// Drops every pending change and open cell of a reservation.
    pub fn discard(&mut self, id: &ReservationId) -> Option<EditedFieldSet> {
        self.editing.retain(|(edited_id, _), _| edited_id != id);
        self.pending.remove(id).filter(|set| !set.is_empty())
    }

    /// Clears what a successful commit wrote.
    ///
    /// Entries changed again while the write was in flight no longer match
    /// `sent` and stay pending.
    pub fn settle_commit(&mut self, id: &ReservationId, sent: &EditedFieldSet) {
        if let Some(set) = self.pending.get_mut(id) {
            for (field, value) in sent.iter() {
                if set.get(field) == Some(value) {
                    set.remove(field);
                    self.editing.remove(&(id.clone(), field));
                }
            }
            if set.is_empty() {
                self.pending.remove(id);
            }
        }
    }

    /// Clears staged state of every reservation that is now locked.
    ///
    /// Returns the ids whose pending changes were dropped.
    pub fn drop_locked<'a, I>(&mut self, reservations: I) -> Vec<ReservationId>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let mut dropped = Vec::new();
        for reservation in reservations {
            if !lifecycle::can_edit(reservation) && self.discard(reservation.id()).is_some() {
                dropped.push(reservation.id().clone());
            }
        }
        dropped
    }

    fn staged_or_source(&self, reservation: &Reservation, field: EditableField) -> FieldValue {
        self.pending
            .get(reservation.id())
            .and_then(|set| set.get(field))
            .cloned()
            .unwrap_or_else(|| field.get(reservation))
    }
}

/// Staged status changes follow the standard lifecycle, and reconfirming
/// goes through its own validated operation.
fn check_staged_status(reservation: &Reservation, status: ReservationStatus) -> Result<()> {
    if status == reservation.status {
        return Ok(());
    }
    if status == ReservationStatus::Reconfirmed {
        return Err(ConsoleError::invalid_input(EditableField::Status.as_str())
            .with_reason("use reconfirm to lock a reservation"));
    }
    lifecycle::check_transition(reservation, status, TransitionMode::Standard)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn reservation(status: ReservationStatus) -> Reservation {
        let mut reservation = Reservation::new("R-1", "1001", date(2024, 6, 1));
        reservation.status = status;
        reservation.driver = Some("Carlos".to_string());
        reservation.pickup_time = Some("08:30".to_string());
        reservation
    }

    #[test]
    fn test_start_edit_shows_source_value() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        let value = buffer.start_edit(&source, EditableField::Driver).unwrap();
        assert_eq!(value, FieldValue::text("Carlos"));
        assert!(buffer.is_editing(source.id(), EditableField::Driver));
        assert!(!buffer.has_unsaved(source.id()));
    }

    #[test]
    fn test_start_edit_on_locked_reservation_is_refused() {
        let mut buffer = EditStagingBuffer::new();
        for status in [ReservationStatus::Reconfirmed, ReservationStatus::Completed] {
            let source = reservation(status);
            let err = buffer.start_edit(&source, EditableField::Driver).unwrap_err();
            assert!(matches!(err, ConsoleError::LockedRecord { .. }));
            assert!(!buffer.is_editing(source.id(), EditableField::Driver));
            assert!(buffer.unsaved_ids().is_empty());
        }
    }

    #[test]
    fn test_update_keeps_both_views_consistent() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        buffer.start_edit(&source, EditableField::Driver).unwrap();
        buffer
            .update(&source, EditableField::Driver, FieldValue::text("Ana"))
            .unwrap();

        assert_eq!(
            buffer.displayed_value(&source, EditableField::Driver),
            FieldValue::text("Ana")
        );
        assert_eq!(
            buffer.pending(source.id()).unwrap().get(EditableField::Driver),
            Some(&FieldValue::text("Ana"))
        );
    }

    #[test]
    fn test_update_on_locked_reservation_is_refused() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Reconfirmed);
        assert!(buffer
            .update(&source, EditableField::Guide, FieldValue::text("Marta"))
            .is_err());
        assert!(!buffer.has_unsaved(source.id()));
    }

    #[test]
    fn test_update_rejects_wrong_value_kind() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);
        let err = buffer
            .update(&source, EditableField::OperationDate, FieldValue::text("soon"))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidInput { .. }));
    }

    #[test]
    fn test_staged_status_follows_lifecycle() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        buffer
            .update(
                &source,
                EditableField::Status,
                FieldValue::Status(ReservationStatus::Cancelled),
            )
            .unwrap();
        assert!(buffer
            .update(
                &source,
                EditableField::Status,
                FieldValue::Status(ReservationStatus::Reconfirmed),
            )
            .is_err());
        assert!(matches!(
            buffer.update(
                &source,
                EditableField::Status,
                FieldValue::Status(ReservationStatus::Completed),
            ),
            Err(ConsoleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_discard_restores_source_value() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        buffer
            .update(&source, EditableField::PickupTime, FieldValue::text("09:15"))
            .unwrap();
        let discarded = buffer.discard(source.id()).unwrap();

        assert_eq!(discarded.len(), 1);
        assert!(buffer.pending(source.id()).is_none());
        assert_eq!(
            buffer.displayed_value(&source, EditableField::PickupTime),
            FieldValue::text("08:30")
        );
    }

    #[test]
    fn test_multiple_fields_accumulate() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        buffer
            .update(&source, EditableField::Driver, FieldValue::text("Ana"))
            .unwrap();
        buffer
            .update(&source, EditableField::Guide, FieldValue::text("Marta"))
            .unwrap();
        buffer
            .update(&source, EditableField::Driver, FieldValue::text("Luis"))
            .unwrap();

        let pending = buffer.pending(source.id()).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.get(EditableField::Driver), Some(&FieldValue::text("Luis")));
        assert_eq!(buffer.overlay(&source).guide.as_deref(), Some("Marta"));
    }

    #[test]
    fn test_settle_commit_keeps_newer_edits() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        buffer
            .update(&source, EditableField::Driver, FieldValue::text("Ana"))
            .unwrap();
        buffer
            .update(&source, EditableField::Guide, FieldValue::text("Marta"))
            .unwrap();
        let sent = buffer.pending(source.id()).cloned().unwrap();

        // Guide changes again while the write is in flight.
        buffer
            .update(&source, EditableField::Guide, FieldValue::text("Luis"))
            .unwrap();
        buffer.settle_commit(source.id(), &sent);

        let pending = buffer.pending(source.id()).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.get(EditableField::Guide), Some(&FieldValue::text("Luis")));
    }

    #[test]
    fn test_settle_commit_clears_everything_sent() {
        let mut buffer = EditStagingBuffer::new();
        let source = reservation(ReservationStatus::Confirmed);

        buffer.start_edit(&source, EditableField::Driver).unwrap();
        buffer
            .update(&source, EditableField::Driver, FieldValue::text("Ana"))
            .unwrap();
        let sent = buffer.pending(source.id()).cloned().unwrap();
        buffer.settle_commit(source.id(), &sent);

        assert!(!buffer.has_unsaved(source.id()));
        assert!(!buffer.is_editing(source.id(), EditableField::Driver));
    }

    #[test]
    fn test_drop_locked_clears_locked_reservations_only() {
        let mut buffer = EditStagingBuffer::new();
        let editable = reservation(ReservationStatus::Confirmed);
        let mut other = Reservation::new("R-2", "1002", date(2024, 6, 1));
        other.status = ReservationStatus::Confirmed;

        buffer
            .update(&editable, EditableField::Driver, FieldValue::text("Ana"))
            .unwrap();
        buffer
            .update(&other, EditableField::Guide, FieldValue::text("Marta"))
            .unwrap();

        other.status = ReservationStatus::Reconfirmed;
        let dropped = buffer.drop_locked([&editable, &other]);

        assert_eq!(dropped, vec![ReservationId::new("R-2")]);
        assert!(buffer.has_unsaved(editable.id()));
        assert!(!buffer.has_unsaved(other.id()));
    }
}
