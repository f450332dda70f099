//! The daily operations reconciliation console.
//!
//! [`ReconciliationConsole`] ties the pieces together:
//!
//! ```text
//! ┌──────────────────┐   ┌─────────────┐   ┌──────────────────┐
//! │ ReservationSource│──▶│ apply_filters│──▶│ detect_conflicts │──▶ rows + banner
//! └──────────────────┘   └─────────────┘   └──────────────────┘
//!          ▲                                        ▲
//!          │ commit / reconfirm / batch             │ staged values
//!          └──────────── EditStagingBuffer ─────────┘
//! ```
//!
//! The console is shared by reference: commits for different reservations
//! may run concurrently, while each reservation and each batch action has at
//! most one request in flight. State sits behind a mutex that is never held
//! across a request. After every successful write the whole list is fetched
//! again rather than patched locally.
//!
//! Every failed operation queues exactly one notification, including
//! operations whose row is no longer visible.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use log::{debug, info, warn};

pub mod builder;
pub mod filter;
pub mod selection;

pub use builder::{ConsoleBuilder, ConsoleSession};
pub use filter::apply_filters;
pub use selection::Selection;

use crate::{
    batch::{BatchAction, BatchActionCoordinator, BatchOutcome},
    conflicts::{conflict_counts, detect_conflicts},
    error::{ConsoleError, Result},
    lifecycle,
    models::{
        BookingId, ColumnPreferences, ConflictDescriptor, ConsoleFilter, EditableField,
        EditedFieldSet, FieldValue, Reservation, ReservationId, ReservationStatus,
    },
    notifications::{Notification, NotificationLevel},
    params::{BatchTarget, EditReservation},
    source::ReservationSource,
    staging::EditStagingBuffer,
};

/// One row of the console table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleRow {
    /// Reservation with pending edits applied
    pub reservation: Reservation,
    /// Lifecycle allows field edits
    pub editable: bool,
    /// Fields whose cells accept input, honoring column preferences
    pub editable_fields: Vec<EditableField>,
    /// Has staged changes that are not saved yet
    pub unsaved: bool,
    /// A save or reconfirm for this row is in flight
    pub busy: bool,
    pub selected: bool,
    pub conflict_count: usize,
    pub confirmation_sent: bool,
}

impl ConsoleRow {
    pub fn id(&self) -> &ReservationId {
        self.reservation.id()
    }

    pub fn is_cell_editable(&self, field: EditableField) -> bool {
        self.editable_fields.contains(&field)
    }

    pub fn is_locked(&self) -> bool {
        !self.editable
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub id: ReservationId,
    pub booking_id: BookingId,
    /// Fields sent in the single write call
    pub fields: EditedFieldSet,
    /// Whether the list was fetched again afterwards
    pub refreshed: bool,
}

/// Counts shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleSummary {
    pub visible: usize,
    pub locked: usize,
    pub unsaved: usize,
    pub conflicts: usize,
    pub selected: usize,
}

#[derive(Debug)]
struct ConsoleState {
    reservations: Vec<Reservation>,
    filter: ConsoleFilter,
    view: Vec<Reservation>,
    conflicts: Vec<ConflictDescriptor>,
    staging: EditStagingBuffer,
    selection: Selection,
    columns: ColumnPreferences,
    busy_rows: HashSet<ReservationId>,
    busy_batches: HashSet<BatchAction>,
    confirmations_sent: HashSet<ReservationId>,
    notifications: Vec<Notification>,
}

impl ConsoleState {
    /// Filters the cached list and replaces the conflict set.
    fn recompute(&mut self) {
        self.view = apply_filters(&self.reservations, &self.filter);
        let displayed: Vec<Reservation> =
            self.view.iter().map(|r| self.staging.overlay(r)).collect();
        self.conflicts = detect_conflicts(&displayed);
        debug!(
            "Console view for {}: {} reservations, {} conflicts",
            self.filter.date,
            self.view.len(),
            self.conflicts.len()
        );
    }

    fn find(&self, id: &ReservationId) -> Result<&Reservation> {
        self.reservations
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| ConsoleError::ReservationNotFound { id: id.clone() })
    }

    /// Marks the cached reservation as reconfirmed and returns it.
    fn lock_reconfirmed(&mut self, id: &ReservationId) -> Result<Reservation> {
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| ConsoleError::ReservationNotFound { id: id.clone() })?;
        reservation.status = ReservationStatus::Reconfirmed;
        Ok(reservation.clone())
    }

    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => warn!("{}", notification.message),
            _ => info!("{}", notification.message),
        }
        self.notifications.push(notification);
    }

    /// Queues the notice for a refused local action and hands the error back.
    fn refuse(&mut self, error: ConsoleError) -> ConsoleError {
        self.notify(Notification::warning(error.to_string()));
        error
    }

    fn check_cell(&self, reservation: &Reservation, field: EditableField) -> Result<()> {
        lifecycle::ensure_editable(reservation)?;
        if !self.columns.is_field_editable(field) {
            return Err(ConsoleError::invalid_input(field.as_str())
                .with_reason("column is not editable"));
        }
        Ok(())
    }

    fn replace_reservations(&mut self, reservations: Vec<Reservation>) {
        let dropped = self.staging.drop_locked(&reservations);
        for id in dropped {
            self.notify(Notification::warning(format!(
                "Unsaved changes to {id} were discarded because it is now locked"
            )));
        }
        self.reservations = reservations;
        self.recompute();
    }
}

/// Orchestrates filtering, conflict detection, staged editing, selection
/// and batch actions for one operations desk.
pub struct ReconciliationConsole {
    source: Arc<dyn ReservationSource>,
    batch: BatchActionCoordinator,
    state: Mutex<ConsoleState>,
}

impl ReconciliationConsole {
    /// Creates an empty console; call [`refresh`](Self::refresh) to load.
    pub fn new(
        source: Arc<dyn ReservationSource>,
        columns: ColumnPreferences,
        filter: ConsoleFilter,
    ) -> Self {
        let batch = BatchActionCoordinator::new(source.clone());
        Self {
            source,
            batch,
            state: Mutex::new(ConsoleState {
                reservations: Vec::new(),
                filter,
                view: Vec::new(),
                conflicts: Vec::new(),
                staging: EditStagingBuffer::new(),
                selection: Selection::new(),
                columns,
                busy_rows: HashSet::new(),
                busy_batches: HashSet::new(),
                confirmations_sent: HashSet::new(),
                notifications: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConsoleState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ------------------------------------------------------------------
    // Loading and filtering
    // ------------------------------------------------------------------

    /// Fetches the full list from the source and rebuilds the view.
    ///
    /// Returns the number of reservations loaded. Pending edits survive a
    /// refresh unless their reservation became locked.
    pub async fn refresh(&self) -> Result<usize> {
        match self.source.list_reservations().await {
            Ok(reservations) => {
                let count = reservations.len();
                self.state().replace_reservations(reservations);
                Ok(count)
            }
            Err(e) => {
                self.state()
                    .notify(Notification::error(format!("Failed to load reservations: {e}")));
                Err(e)
            }
        }
    }

    /// Refetch after a successful write; a failure is reported but does not
    /// undo the write.
    async fn refresh_after_write(&self) -> bool {
        match self.source.list_reservations().await {
            Ok(reservations) => {
                self.state().replace_reservations(reservations);
                true
            }
            Err(e) => {
                self.state().notify(Notification::warning(format!(
                    "Saved, but reloading reservations failed: {e}"
                )));
                false
            }
        }
    }

    pub fn filter(&self) -> ConsoleFilter {
        self.state().filter.clone()
    }

    /// Replaces the filter. Staged edits and the selection are kept.
    pub fn set_filter(&self, filter: ConsoleFilter) {
        let mut state = self.state();
        state.filter = filter;
        state.recompute();
    }

    pub fn columns(&self) -> ColumnPreferences {
        self.state().columns.clone()
    }

    pub fn set_columns(&self, columns: ColumnPreferences) {
        self.state().columns = columns;
    }

    /// Source reservation by display id, without pending edits.
    pub fn reservation(&self, id: &ReservationId) -> Option<Reservation> {
        self.state().find(id).ok().cloned()
    }

    /// Rows of the current view, sorted by pickup time.
    pub fn rows(&self) -> Vec<ConsoleRow> {
        let state = self.state();
        let counts = conflict_counts(&state.conflicts);
        state
            .view
            .iter()
            .map(|source| {
                let id = source.id();
                let editable = lifecycle::can_edit(source);
                let editable_fields = if editable {
                    EditableField::ALL
                        .into_iter()
                        .filter(|field| state.columns.is_field_editable(*field))
                        .collect()
                } else {
                    Vec::new()
                };
                ConsoleRow {
                    reservation: state.staging.overlay(source),
                    editable,
                    editable_fields,
                    unsaved: state.staging.has_unsaved(id),
                    busy: state.busy_rows.contains(id),
                    selected: state.selection.contains(id),
                    conflict_count: counts.get(id).copied().unwrap_or(0),
                    confirmation_sent: state.confirmations_sent.contains(id),
                }
            })
            .collect()
    }

    /// One page of rows; `index` starts at zero.
    pub fn page(&self, index: usize, per_page: usize) -> Vec<ConsoleRow> {
        if per_page == 0 {
            return Vec::new();
        }
        self.rows()
            .into_iter()
            .skip(index.saturating_mul(per_page))
            .take(per_page)
            .collect()
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 {
            return 0;
        }
        self.state().view.len().div_ceil(per_page)
    }

    /// Conflicts among the visible reservations, pending edits included.
    pub fn conflicts(&self) -> Vec<ConflictDescriptor> {
        self.state().conflicts.clone()
    }

    pub fn summary(&self) -> ConsoleSummary {
        let state = self.state();
        ConsoleSummary {
            visible: state.view.len(),
            locked: state.view.iter().filter(|r| !lifecycle::can_edit(r)).count(),
            unsaved: state
                .view
                .iter()
                .filter(|r| state.staging.has_unsaved(r.id()))
                .count(),
            conflicts: state.conflicts.len(),
            selected: state.selection.len(),
        }
    }

    // ------------------------------------------------------------------
    // Staged editing
    // ------------------------------------------------------------------

    /// Opens a cell and returns the value it displays.
    ///
    /// Locked reservations and read-only columns are refused with a notice
    /// and nothing is staged.
    pub fn start_edit(&self, id: &ReservationId, field: EditableField) -> Result<FieldValue> {
        let mut state = self.state();
        let reservation = state.find(id)?.clone();
        if let Err(e) = state.check_cell(&reservation, field) {
            return Err(state.refuse(e));
        }
        match state.staging.start_edit(&reservation, field) {
            Ok(value) => Ok(value),
            Err(e) => Err(state.refuse(e)),
        }
    }

    /// Stages a new value for one field. No request is made.
    pub fn update(&self, id: &ReservationId, field: EditableField, value: FieldValue) -> Result<()> {
        let mut state = self.state();
        let reservation = state.find(id)?.clone();
        if let Err(e) = state.check_cell(&reservation, field) {
            return Err(state.refuse(e));
        }
        if let Err(e) = state.staging.update(&reservation, field, value) {
            return Err(state.refuse(e));
        }
        state.recompute();
        Ok(())
    }

    /// Value a cell displays right now.
    pub fn displayed_value(&self, id: &ReservationId, field: EditableField) -> Result<FieldValue> {
        let state = self.state();
        let reservation = state.find(id)?;
        Ok(state.staging.displayed_value(reservation, field))
    }

    pub fn pending(&self, id: &ReservationId) -> Option<EditedFieldSet> {
        self.state().staging.pending(id).cloned()
    }

    /// Every reservation with unsaved changes, on any date.
    pub fn unsaved_ids(&self) -> Vec<ReservationId> {
        self.state().staging.unsaved_ids().into_iter().collect()
    }

    /// Drops staged changes of one reservation without a request.
    pub fn discard(&self, id: &ReservationId) -> Option<EditedFieldSet> {
        let mut state = self.state();
        let discarded = state.staging.discard(id);
        state.recompute();
        discarded
    }

    /// Sends the staged changes of one reservation in a single write.
    ///
    /// On failure the staged changes stay in place so the operator can
    /// retry, and an error notification carries the server's message.
    ///
    /// # Errors
    ///
    /// * `ConsoleError::LockedRecord` - the reservation is locked
    /// * `ConsoleError::OperationInFlight` - a save for it is still running
    /// * `ConsoleError::InvalidInput` - nothing is staged
    /// * `ConsoleError::Network` / `ConsoleError::Server` - the write failed
    pub async fn commit(&self, id: &ReservationId) -> Result<CommitOutcome> {
        let (booking_id, sent) = {
            let mut state = self.state();
            let reservation = state.find(id)?.clone();
            if let Err(e) = lifecycle::ensure_editable(&reservation) {
                return Err(state.refuse(e));
            }
            if state.busy_rows.contains(id) {
                return Err(ConsoleError::OperationInFlight {
                    scope: id.to_string(),
                });
            }
            let sent = match state.staging.pending(id) {
                Some(set) => set.clone(),
                None => {
                    return Err(ConsoleError::invalid_input("changes")
                        .with_reason(format!("no unsaved changes for {id}")))
                }
            };
            state.busy_rows.insert(id.clone());
            (reservation.booking_id().clone(), sent)
        };

        info!("Saving {} field(s) of {id} as booking {booking_id}", sent.len());
        let result = self.source.update_reservation(&booking_id, &sent).await;

        {
            let mut state = self.state();
            state.busy_rows.remove(id);
            match &result {
                Ok(()) => {
                    state.staging.settle_commit(id, &sent);
                    state.notify(Notification::success(format!("Saved changes to {id}")));
                }
                Err(e) => {
                    state.notify(Notification::error(format!(
                        "Failed to save changes to {id}: {e}"
                    )));
                }
            }
            state.recompute();
        }
        result?;

        let refreshed = self.refresh_after_write().await;
        Ok(CommitOutcome {
            id: id.clone(),
            booking_id,
            fields: sent,
            refreshed,
        })
    }

    /// Stages every change of `edit` and saves them in one write.
    ///
    /// If any change is refused, everything staged for the reservation is
    /// discarded and nothing is sent.
    pub async fn apply_edit(&self, edit: &EditReservation) -> Result<CommitOutcome> {
        if edit.changes.is_empty() {
            return Err(ConsoleError::invalid_input("changes")
                .with_reason(format!("no fields given for {}", edit.id)));
        }
        for (field, value) in &edit.changes {
            if let Err(e) = self.update(&edit.id, *field, value.clone()) {
                self.discard(&edit.id);
                return Err(e);
            }
        }
        self.commit(&edit.id).await
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Locks a reservation by moving it to `reconfirmed`.
    ///
    /// Operator, driver and guide must be assigned in the saved record;
    /// otherwise no request is made. On success any staged changes of the
    /// reservation are dropped and the list is fetched again. On failure the
    /// row stays editable.
    pub async fn reconfirm(&self, id: &ReservationId) -> Result<Reservation> {
        let booking_id = {
            let mut state = self.state();
            let reservation = state.find(id)?.clone();
            if let Err(e) = lifecycle::validate_reconfirm(&reservation) {
                return Err(state.refuse(e));
            }
            if state.busy_rows.contains(id) {
                return Err(ConsoleError::OperationInFlight {
                    scope: id.to_string(),
                });
            }
            state.busy_rows.insert(id.clone());
            reservation.booking_id().clone()
        };

        info!("Reconfirming {id} as booking {booking_id}");
        let result = self
            .source
            .update_status(&booking_id, ReservationStatus::Reconfirmed)
            .await;

        let locked = {
            let mut state = self.state();
            state.busy_rows.remove(id);
            if let Err(e) = result {
                state.notify(Notification::error(format!("Failed to reconfirm {id}: {e}")));
                return Err(e);
            }
            if let Some(discarded) = state.staging.discard(id) {
                state.notify(Notification::warning(format!(
                    "Discarded {} unsaved change(s) to {id} on reconfirm",
                    discarded.len()
                )));
            }
            // The cached copy is locked now so the row stays read-only even
            // if the refetch below fails.
            let locked = state.lock_reconfirmed(id)?;
            state.notify(Notification::success(format!("Reconfirmed {id}")));
            state.recompute();
            locked
        };

        if self.refresh_after_write().await {
            Ok(self.reservation(id).unwrap_or(locked))
        } else {
            Ok(locked)
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flips selection of one reservation; returns whether it is selected.
    pub fn toggle_selection(&self, id: &ReservationId) -> bool {
        self.state().selection.toggle(id)
    }

    pub fn select(&self, id: &ReservationId) {
        self.state().selection.select(id.clone());
    }

    /// Selects every reservation of the current view, and only those.
    pub fn select_all(&self) {
        let mut state = self.state();
        let ids: Vec<ReservationId> = state.view.iter().map(|r| r.id().clone()).collect();
        state.selection.select_all(&ids);
    }

    /// Replaces the selection with `target`.
    ///
    /// Explicit ids must be loaded, but need not be in the current view.
    pub fn select_targets(&self, target: &BatchTarget) -> Result<()> {
        match target {
            BatchTarget::AllVisible => self.select_all(),
            BatchTarget::Ids(ids) => {
                let mut state = self.state();
                for id in ids {
                    state.find(id)?;
                }
                state.selection.select_all(ids);
            }
        }
        Ok(())
    }

    pub fn clear_selection(&self) {
        self.state().selection.clear();
    }

    pub fn selected(&self) -> Vec<ReservationId> {
        self.state().selection.ids().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Batch actions
    // ------------------------------------------------------------------

    /// Whether the control for `action` should be enabled.
    pub fn batch_enabled(&self, action: BatchAction) -> bool {
        let state = self.state();
        !state.selection.is_empty() && !state.busy_batches.contains(&action)
    }

    pub fn is_batch_running(&self, action: BatchAction) -> bool {
        self.state().busy_batches.contains(&action)
    }

    pub fn confirmation_sent(&self, id: &ReservationId) -> bool {
        self.state().confirmations_sent.contains(id)
    }

    /// Runs `action` for the current selection as one external call.
    ///
    /// Either outcome queues a single aggregate notification. Selected ids
    /// that are no longer loaded are skipped.
    pub async fn run_batch(&self, action: BatchAction) -> Result<BatchOutcome> {
        let (selected, booking_ids) = {
            let mut state = self.state();
            if state.selection.is_empty() {
                return Err(ConsoleError::EmptySelection {
                    action: action.to_string(),
                });
            }
            if state.busy_batches.contains(&action) {
                return Err(ConsoleError::OperationInFlight {
                    scope: action.to_string(),
                });
            }
            let mut selected = Vec::new();
            let mut booking_ids: Vec<BookingId> = Vec::new();
            for id in state.selection.ids() {
                match state.find(id) {
                    Ok(reservation) => {
                        selected.push(id.clone());
                        if !booking_ids.contains(reservation.booking_id()) {
                            booking_ids.push(reservation.booking_id().clone());
                        }
                    }
                    Err(_) => warn!("Skipping {id}: no longer loaded"),
                }
            }
            if booking_ids.is_empty() {
                return Err(ConsoleError::EmptySelection {
                    action: action.to_string(),
                });
            }
            state.busy_batches.insert(action);
            (selected, booking_ids)
        };

        let result = self.batch.run(action, &booking_ids).await;

        let mut state = self.state();
        state.busy_batches.remove(&action);
        match &result {
            Ok(outcome) => {
                if action == BatchAction::Confirmations {
                    state.confirmations_sent.extend(selected);
                }
                let message = match &outcome.document_url {
                    Some(url) => format!("{} ({url})", outcome.summary()),
                    None => outcome.summary(),
                };
                state.notify(Notification::success(message));
            }
            Err(e) => {
                state.notify(Notification::error(format!(
                    "Failed to request {action} for {} reservation(s): {e}",
                    booking_ids.len()
                )));
            }
        }
        result
    }

    pub async fn generate_service_orders(&self) -> Result<BatchOutcome> {
        self.run_batch(BatchAction::ServiceOrders).await
    }

    pub async fn send_confirmations(&self) -> Result<BatchOutcome> {
        self.run_batch(BatchAction::Confirmations).await
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Hands queued notifications to the caller, oldest first.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state().notifications)
    }
}
