#[cfg(test)]
mod model_tests {
    use jiff::civil::date;
    use serde_json::json;

    use crate::{
        models::{
            BookingId, Column, ColumnPreferences, ConflictDescriptor, EditableField,
            EditedFieldSet, FieldValue, Reservation, ReservationId, ReservationList,
            ReservationStatus, ResourceField, ResourceType,
        },
        ConsoleError,
    };

    fn create_test_reservation() -> Reservation {
        let mut reservation = Reservation::new("R-1", "1001", date(2024, 6, 1));
        reservation.driver = Some("Carlos".to_string());
        reservation.pickup_time = Some("08:30".to_string());
        reservation
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(ReservationStatus::NoShow).unwrap(),
            json!("no-show")
        );
        let parsed: ReservationStatus = serde_json::from_value(json!("reconfirmed")).unwrap();
        assert_eq!(parsed, ReservationStatus::Reconfirmed);
        assert_eq!("No_Show".parse::<ReservationStatus>(), Ok(ReservationStatus::NoShow));
        assert!("shipped".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_status_locking() {
        assert!(ReservationStatus::Reconfirmed.is_locked());
        assert!(ReservationStatus::Completed.is_locked());
        assert!(!ReservationStatus::Confirmed.is_locked());
        assert!(!ReservationStatus::Cancelled.is_locked());
        assert!(!ReservationStatus::Pending.is_operational());
    }

    #[test]
    fn test_reservation_deserializes_numeric_ids() {
        let reservation: Reservation = serde_json::from_value(json!({
            "id": 42,
            "booking_id": 1001,
            "operation_date": "2024-06-01",
            "status": "confirmed",
            "driver": "Carlos",
            "passengers": { "adults": 2, "children": 1 }
        }))
        .unwrap();

        assert_eq!(reservation.id(), &ReservationId::new("42"));
        assert_eq!(reservation.booking_id(), &BookingId::new("1001"));
        assert_eq!(reservation.passengers.total(), 3);
        assert_eq!(reservation.guide, None);
    }

    #[test]
    fn test_reservation_without_id_uses_booking_id() {
        let reservation: Reservation = serde_json::from_value(json!({
            "booking_id": "B-9",
            "operation_date": "2024-06-01",
            "status": "no-show"
        }))
        .unwrap();

        assert_eq!(reservation.id().as_str(), "B-9");
        assert_eq!(reservation.status, ReservationStatus::NoShow);
    }

    #[test]
    fn test_reservation_list_accepts_wrapped_payload() {
        let list: ReservationList = serde_json::from_value(json!({
            "reservations": [
                { "booking_id": "1", "operation_date": "2024-06-01", "status": "confirmed" }
            ]
        }))
        .unwrap();
        let reservations: Vec<Reservation> = list.into();
        assert_eq!(reservations.len(), 1);
    }

    #[test]
    fn test_accessor_table_roundtrips_every_field() {
        let mut reservation = create_test_reservation();
        for field in EditableField::ALL {
            let current = field.get(&reservation);
            field
                .set(&mut reservation, current.clone())
                .expect("setting the current value should succeed");
            assert_eq!(field.get(&reservation), current, "{field}");
        }
    }

    #[test]
    fn test_accessor_rejects_wrong_kind() {
        let mut reservation = create_test_reservation();
        let err = EditableField::OperationDate
            .set(&mut reservation, FieldValue::text("tomorrow"))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidInput { ref field, .. } if field == "operation_date"));
        assert_eq!(reservation.operation_date, date(2024, 6, 1));
    }

    #[test]
    fn test_blank_text_clears_field() {
        let mut reservation = create_test_reservation();
        EditableField::Driver
            .set(&mut reservation, FieldValue::Text(Some("   ".to_string())))
            .unwrap();
        assert_eq!(reservation.driver, None);
    }

    #[test]
    fn test_parse_value_by_kind() {
        assert_eq!(
            EditableField::OperationDate.parse_value("2024-06-02").unwrap(),
            FieldValue::Date(date(2024, 6, 2))
        );
        assert_eq!(
            EditableField::Status.parse_value("cancelled").unwrap(),
            FieldValue::Status(ReservationStatus::Cancelled)
        );
        assert!(EditableField::OperationDate.parse_value("06/02/2024").is_err());
        assert_eq!("pickup-time".parse::<EditableField>(), Ok(EditableField::PickupTime));
    }

    #[test]
    fn test_edited_field_set_serializes_only_changed_fields() {
        let set: EditedFieldSet = [
            (EditableField::Driver, FieldValue::text("Ana")),
            (EditableField::Guide, FieldValue::Text(None)),
            (EditableField::OperationDate, FieldValue::Date(date(2024, 6, 2))),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({ "driver": "Ana", "guide": null, "operation_date": "2024-06-02" })
        );
    }

    #[test]
    fn test_overlay_applies_pending_values() {
        let reservation = create_test_reservation();
        let mut set = EditedFieldSet::new();
        set.insert(EditableField::Driver, FieldValue::text("Ana"));

        let overlaid = set.overlay(&reservation);
        assert_eq!(overlaid.driver.as_deref(), Some("Ana"));
        assert_eq!(reservation.driver.as_deref(), Some("Carlos"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "pending driver has the wrong kind")]
    fn test_overlay_reports_value_of_wrong_kind() {
        let reservation = create_test_reservation();
        let mut set = EditedFieldSet::new();
        set.insert(EditableField::Driver, FieldValue::Date(date(2024, 6, 2)));

        set.overlay(&reservation);
    }

    #[test]
    fn test_resource_field_treats_blank_as_missing() {
        let mut reservation = create_test_reservation();
        reservation.guide = Some(" ".to_string());
        assert_eq!(ResourceField::Driver.value(&reservation), Some("Carlos"));
        assert_eq!(ResourceField::Guide.value(&reservation), None);
    }

    #[test]
    fn test_conflict_descriptor_message() {
        let conflict = ConflictDescriptor::new(
            ResourceType::Driver,
            "Carlos",
            ReservationId::new("A"),
            ReservationId::new("B"),
        );
        assert_eq!(conflict.message, "Driver Carlos is assigned to both A and B");
        assert!(conflict.involves(&ReservationId::new("B")));
        assert!(!conflict.involves(&ReservationId::new("C")));
    }

    #[test]
    fn test_column_preferences_defaults() {
        let prefs = ColumnPreferences::default();
        assert!(prefs.is_visible(Column::Customer));
        assert!(prefs.is_editable(Column::Driver));
        assert!(!prefs.is_editable(Column::Passengers));
        assert_eq!(prefs.visible_columns().len(), Column::ALL.len());
    }

    #[test]
    fn test_read_only_column_cannot_become_editable() {
        let mut prefs = ColumnPreferences::default();
        assert!(prefs.set_editable(Column::Price, true).is_err());
        prefs.set_editable(Column::Guide, false).unwrap();
        assert!(!prefs.is_field_editable(EditableField::Guide));
        prefs.set_visible(Column::Price, false);
        assert!(!prefs.visible_columns().contains(&Column::Price));
    }
}
