use std::{path::PathBuf, sync::Arc};

use opsdesk_core::{
    Column, ColumnPreferences, ConsoleBuilder, ConsoleError, EditableField, FieldValue,
    InMemoryReservationSource, PreferenceStore,
};
use tempfile::TempDir;

mod common;

/// Helper function to create a temporary directory and preference file path
fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("nested").join("preferences.db");
    (temp_dir, db_path)
}

#[tokio::test]
async fn test_preferences_round_trip_through_sqlite() {
    let (_temp_dir, db_path) = create_test_environment();
    let store = PreferenceStore::open(Some(db_path.clone()))
        .await
        .expect("Failed to open store");
    assert!(db_path.exists());

    let mut preferences = store.load().await.expect("Failed to load");
    assert_eq!(preferences, ColumnPreferences::default());

    preferences.set_visible(Column::Price, false);
    preferences
        .set_editable(Column::PickupAddress, false)
        .expect("Address column is field-backed");
    store.save(&preferences).await.expect("Failed to save");

    let reopened = PreferenceStore::open(Some(db_path))
        .await
        .expect("Failed to reopen store");
    let loaded = reopened.load().await.expect("Failed to load");
    assert_eq!(loaded, preferences);
    assert!(!loaded.is_visible(Column::Price));
    assert!(!loaded.is_field_editable(EditableField::PickupAddress));
}

#[tokio::test]
async fn test_builder_injects_stored_columns() {
    let (_temp_dir, db_path) = create_test_environment();
    let store = PreferenceStore::open(Some(db_path.clone()))
        .await
        .expect("Failed to open store");
    let mut preferences = ColumnPreferences::default();
    preferences
        .set_editable(Column::Guide, false)
        .expect("Guide column is field-backed");
    store.save(&preferences).await.expect("Failed to save");

    let source = Arc::new(InMemoryReservationSource::new(vec![common::reservation(
        "A", "Carlos",
    )]));
    let session = ConsoleBuilder::new()
        .with_source(source)
        .with_preferences_path(Some(&db_path))
        .with_filter(opsdesk_core::ConsoleFilter::for_date(common::DAY))
        .build()
        .await
        .expect("Failed to build console");
    session.console.refresh().await.expect("Failed to load");

    let err = session
        .console
        .update(&"A".into(), EditableField::Guide, FieldValue::text("Lina"))
        .unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidInput { .. }));
    assert_eq!(session.preferences.path(), db_path.as_path());
}

#[tokio::test]
async fn test_builder_reads_fixture_file() {
    let (temp_dir, db_path) = create_test_environment();
    let fixture = temp_dir.path().join("reservations.json");
    std::fs::write(
        &fixture,
        r#"{"reservations": [
            {"id": "A", "booking_id": "1", "operation_date": "2024-06-01", "status": "confirmed", "driver": "Carlos"},
            {"id": "B", "booking_id": "2", "operation_date": "2024-06-01", "status": "confirmed", "driver": "Carlos"}
        ]}"#,
    )
    .expect("Failed to write fixture");

    let session = ConsoleBuilder::new()
        .with_fixture(&fixture)
        .with_preferences_path(Some(&db_path))
        .with_filter(opsdesk_core::ConsoleFilter::for_date(common::DAY))
        .build()
        .await
        .expect("Failed to build console");

    assert_eq!(session.console.refresh().await.expect("Failed to load"), 2);
    assert_eq!(session.console.conflicts().len(), 1);
}

#[tokio::test]
async fn test_builder_without_source_is_a_configuration_error() {
    let (_temp_dir, db_path) = create_test_environment();

    let result = ConsoleBuilder::new()
        .with_preferences_path(Some(&db_path))
        .build()
        .await;

    assert!(matches!(result, Err(ConsoleError::Configuration { .. })));
}

#[tokio::test]
async fn test_missing_fixture_is_a_file_system_error() {
    let (temp_dir, db_path) = create_test_environment();

    let result = ConsoleBuilder::new()
        .with_fixture(temp_dir.path().join("missing.json"))
        .with_preferences_path(Some(&db_path))
        .build()
        .await;

    assert!(matches!(result, Err(ConsoleError::FileSystem { .. })));
}
