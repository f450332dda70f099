mod common;

use common::{create_test_console, reservation, DAY};
use jiff::civil::date;
use opsdesk_core::{
    lifecycle,
    models::ResourceField,
    source::{SourceCall, SourceOperation},
    BatchTarget, BookingId, ConsoleError, ConsoleFilter, EditReservation, EditableField,
    FieldValue, NotificationLevel, ReconciliationConsole, ReservationId, ReservationStatus,
};
use serde_json::json;

async fn wait_until_busy(console: &ReconciliationConsole, id: &ReservationId) {
    for _ in 0..1_000 {
        if console.rows().iter().any(|row| row.id() == id && row.busy) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("{id} never became busy");
}

#[tokio::test]
async fn test_shared_driver_yields_single_conflict() {
    let (_source, console) = create_test_console(vec![
        reservation("A", "Carlos"),
        reservation("B", "Carlos"),
        reservation("C", "Ana"),
    ])
    .await;

    let conflicts = console.conflicts();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(
        conflicts[0].reservation_ids,
        [ReservationId::new("A"), ReservationId::new("B")]
    );
    assert!(!conflicts[0].involves(&"C".into()));

    let rows = console.rows();
    let counts: Vec<usize> = rows.iter().map(|row| row.conflict_count).collect();
    assert_eq!(counts, vec![1, 1, 0]);
}

#[tokio::test]
async fn test_staged_driver_assignment_updates_conflicts() {
    let (_source, console) =
        create_test_console(vec![reservation("A", "Carlos"), reservation("B", "Ana")]).await;
    assert!(console.conflicts().is_empty());

    console
        .update(&"B".into(), EditableField::Driver, FieldValue::text("Carlos"))
        .expect("Failed to stage driver");
    assert_eq!(console.conflicts().len(), 1);

    console.discard(&"B".into());
    assert!(console.conflicts().is_empty());
}

#[tokio::test]
async fn test_pending_reservations_never_shown() {
    let mut pending = reservation("P", "Carlos");
    pending.status = ReservationStatus::Pending;
    let (_source, console) =
        create_test_console(vec![pending, reservation("A", "Carlos")]).await;

    assert_eq!(console.rows().len(), 1);
    assert!(console.conflicts().is_empty());

    console.set_filter(ConsoleFilter::for_date(DAY).with_status(ReservationStatus::Pending));
    assert!(console.rows().is_empty());

    console.set_filter(ConsoleFilter::for_date(DAY).with_search("bk-P"));
    assert!(console.rows().is_empty());
}

#[tokio::test]
async fn test_locked_reservations_refuse_edits() {
    for status in [ReservationStatus::Reconfirmed, ReservationStatus::Completed] {
        let mut locked = reservation("A", "Carlos");
        locked.status = status;
        assert!(!lifecycle::can_edit(&locked));
        let (source, console) = create_test_console(vec![locked]).await;

        let err = console
            .start_edit(&"A".into(), EditableField::Guide)
            .unwrap_err();
        assert!(matches!(err, ConsoleError::LockedRecord { .. }));
        assert!(console.pending(&"A".into()).is_none());
        assert!(!console.rows()[0].unsaved);

        let err = console.commit(&"A".into()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::LockedRecord { .. }));
        assert!(source.write_calls().is_empty());
    }
}

#[tokio::test]
async fn test_reconfirm_with_blank_guide_fails_locally() {
    let mut incomplete = reservation("A", "Carlos");
    incomplete.guide = Some(String::new());
    let (source, console) = create_test_console(vec![incomplete]).await;

    let err = console.reconfirm(&"A".into()).await.unwrap_err();

    match &err {
        ConsoleError::Validation { missing_fields, .. } => {
            assert_eq!(missing_fields, &vec![ResourceField::Guide]);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Cannot reconfirm A: missing guide");
    assert!(source.write_calls().is_empty());
    assert_eq!(
        console.reservation(&"A".into()).map(|r| r.status),
        Some(ReservationStatus::Confirmed)
    );
    assert!(console.rows()[0].editable);
}

#[tokio::test]
async fn test_reconfirm_locks_and_drops_staged_edits() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    console
        .update(&"A".into(), EditableField::PickupTime, FieldValue::text("10:30"))
        .expect("Failed to stage pickup time");

    let locked = console
        .reconfirm(&"A".into())
        .await
        .expect("Failed to reconfirm");

    assert_eq!(locked.status, ReservationStatus::Reconfirmed);
    assert_eq!(
        source.write_calls(),
        vec![SourceCall::Status {
            booking_id: BookingId::new("bk-A"),
            status: ReservationStatus::Reconfirmed,
        }]
    );
    assert!(console.pending(&"A".into()).is_none());
    assert!(console.rows()[0].is_locked());

    let levels: Vec<NotificationLevel> = console
        .drain_notifications()
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Warning, NotificationLevel::Success]
    );
}

#[tokio::test]
async fn test_failed_reconfirm_keeps_row_editable() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    source.fail_next(SourceOperation::Status, 409, "Reservation changed by another user");

    let err = console.reconfirm(&"A".into()).await.unwrap_err();

    assert_eq!(err.to_string(), "Reservation changed by another user");
    assert!(console.rows()[0].editable);
    let notifications = console.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_error());
}

#[tokio::test]
async fn test_reconfirm_locks_row_even_when_reload_fails() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");
    source.fail_next(SourceOperation::List, 503, "maintenance");

    let locked = console.reconfirm(&id).await.expect("Failed to reconfirm");

    assert_eq!(locked.status, ReservationStatus::Reconfirmed);
    assert!(console.rows()[0].is_locked());
    assert_eq!(
        console.reservation(&id).map(|r| r.status),
        Some(ReservationStatus::Reconfirmed)
    );

    let err = console
        .update(&id, EditableField::Driver, FieldValue::text("Ana"))
        .unwrap_err();
    assert!(matches!(err, ConsoleError::LockedRecord { .. }));
    assert!(console.commit(&id).await.is_err());
    assert_eq!(source.write_calls().len(), 1);

    let levels: Vec<NotificationLevel> = console
        .drain_notifications()
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert!(levels.contains(&NotificationLevel::Success));
    assert!(levels.contains(&NotificationLevel::Warning));
}

#[tokio::test]
async fn test_stage_then_discard_restores_source_value() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");

    console
        .start_edit(&id, EditableField::Driver)
        .expect("Failed to open cell");
    console
        .update(&id, EditableField::Driver, FieldValue::text("Ana"))
        .expect("Failed to stage driver");
    assert_eq!(
        console.displayed_value(&id, EditableField::Driver).unwrap(),
        FieldValue::text("Ana")
    );

    console.discard(&id);

    assert!(console.pending(&id).is_none());
    assert_eq!(
        console.displayed_value(&id, EditableField::Driver).unwrap(),
        FieldValue::text("Carlos")
    );
    assert!(source.write_calls().is_empty());
}

#[tokio::test]
async fn test_two_fields_are_sent_in_one_write() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");
    console
        .update(&id, EditableField::Driver, FieldValue::text("Ana"))
        .expect("Failed to stage driver");
    console
        .update(&id, EditableField::PickupTime, FieldValue::text("10:30"))
        .expect("Failed to stage pickup time");

    let outcome = console.commit(&id).await.expect("Failed to commit");

    assert_eq!(outcome.booking_id, BookingId::new("bk-A"));
    assert!(outcome.refreshed);
    assert_eq!(
        source.write_calls(),
        vec![SourceCall::Update {
            booking_id: BookingId::new("bk-A"),
            body: json!({ "driver": "Ana", "pickup_time": "10:30" }),
        }]
    );
    assert!(console.pending(&id).is_none());

    let saved = console.reservation(&id).expect("Reservation still loaded");
    assert_eq!(saved.driver.as_deref(), Some("Ana"));
    assert_eq!(saved.pickup_time.as_deref(), Some("10:30"));
}

#[tokio::test]
async fn test_failed_commit_keeps_staged_edits() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");
    console
        .update(&id, EditableField::PickupTime, FieldValue::text("04:00"))
        .expect("Failed to stage pickup time");
    let before = console.pending(&id);
    source.fail_next(SourceOperation::Update, 422, "Pickup time outside service window");

    let err = console.commit(&id).await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(console.pending(&id), before);
    assert!(console.rows()[0].unsaved);
    let notifications = console.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0]
        .message
        .contains("Pickup time outside service window"));
}

#[tokio::test]
async fn test_second_commit_while_in_flight_is_refused() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");
    console
        .update(&id, EditableField::Guide, FieldValue::text("Lina"))
        .expect("Failed to stage guide");

    source.hold_writes();
    let first = tokio::spawn({
        let console = console.clone();
        let id = id.clone();
        async move { console.commit(&id).await }
    });
    wait_until_busy(&console, &id).await;

    let err = console.commit(&id).await.unwrap_err();
    assert!(matches!(err, ConsoleError::OperationInFlight { .. }));

    source.release_writes();
    first
        .await
        .expect("Commit task panicked")
        .expect("First commit failed");
    assert_eq!(source.write_calls().len(), 1);
    assert!(!console.rows()[0].busy);
}

#[tokio::test]
async fn test_edits_made_during_save_survive() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");
    console
        .update(&id, EditableField::Driver, FieldValue::text("Ana"))
        .expect("Failed to stage driver");

    source.hold_writes();
    let commit = tokio::spawn({
        let console = console.clone();
        let id = id.clone();
        async move { console.commit(&id).await }
    });
    wait_until_busy(&console, &id).await;
    console
        .update(&id, EditableField::Guide, FieldValue::text("Lina"))
        .expect("Failed to stage guide");
    source.release_writes();
    commit
        .await
        .expect("Commit task panicked")
        .expect("Commit failed");

    let pending = console.pending(&id).expect("Guide edit kept");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.get(EditableField::Guide), Some(&FieldValue::text("Lina")));
}

#[tokio::test]
async fn test_changing_filters_keeps_staged_edits() {
    let (_source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let id = ReservationId::new("A");
    console
        .update(&id, EditableField::Guide, FieldValue::text("Lina"))
        .expect("Failed to stage guide");

    console.set_filter(ConsoleFilter::for_date(date(2024, 6, 2)));
    assert!(console.rows().is_empty());
    assert_eq!(console.unsaved_ids(), vec![id.clone()]);

    console.set_filter(ConsoleFilter::for_date(DAY));
    assert!(console.rows()[0].unsaved);
}

#[tokio::test]
async fn test_failed_confirmations_mark_nothing() {
    let (source, console) =
        create_test_console(vec![reservation("A", "Carlos"), reservation("B", "Ana")]).await;
    console.select_all();
    source.fail_next(SourceOperation::Confirmations, 502, "Mail relay unavailable");

    let err = console.send_confirmations().await.unwrap_err();

    assert_eq!(err.to_string(), "Mail relay unavailable");
    assert!(!console.confirmation_sent(&"A".into()));
    assert!(!console.confirmation_sent(&"B".into()));
    let notifications = console.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_error());
    assert_eq!(
        source.write_calls(),
        vec![SourceCall::Confirmations {
            booking_ids: vec![BookingId::new("bk-A"), BookingId::new("bk-B")],
        }]
    );
}

#[tokio::test]
async fn test_empty_selection_disables_batches() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;

    assert!(!console.batch_enabled(opsdesk_core::BatchAction::ServiceOrders));
    let err = console.generate_service_orders().await.unwrap_err();

    assert!(matches!(err, ConsoleError::EmptySelection { .. }));
    assert!(source.write_calls().is_empty());
}

#[tokio::test]
async fn test_apply_edit_saves_once() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let edit = EditReservation::new("A")
        .with_change(EditableField::Operator, FieldValue::text("Sea Tours"))
        .with_change(EditableField::OperationDate, FieldValue::Date(date(2024, 6, 2)));

    let outcome = console.apply_edit(&edit).await.expect("Failed to apply edit");

    assert_eq!(outcome.fields.len(), 2);
    assert_eq!(source.write_calls().len(), 1);
    assert_eq!(
        source.reservations()[0].operation_date,
        date(2024, 6, 2)
    );
    // Moved off the displayed day.
    assert!(console.rows().is_empty());
}

#[tokio::test]
async fn test_apply_edit_rejects_reconfirmed_status() {
    let (source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;
    let edit = EditReservation::new("A")
        .with_change(EditableField::Guide, FieldValue::text("Lina"))
        .with_change(
            EditableField::Status,
            FieldValue::Status(ReservationStatus::Reconfirmed),
        );

    let err = console.apply_edit(&edit).await.unwrap_err();

    assert!(err.is_local());
    assert!(console.pending(&"A".into()).is_none());
    assert!(source.write_calls().is_empty());
}

#[tokio::test]
async fn test_select_targets_requires_loaded_ids() {
    let (_source, console) = create_test_console(vec![reservation("A", "Carlos")]).await;

    let err = console
        .select_targets(&BatchTarget::Ids(vec!["Z".into()]))
        .unwrap_err();
    assert!(matches!(err, ConsoleError::ReservationNotFound { .. }));

    console
        .select_targets(&BatchTarget::AllVisible)
        .expect("Failed to select");
    assert_eq!(console.selected(), vec![ReservationId::new("A")]);
}
