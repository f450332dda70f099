#![allow(dead_code)]

use std::sync::Arc;

use jiff::civil::{date, Date};
use opsdesk_core::{
    ColumnPreferences, ConsoleFilter, InMemoryReservationSource, ReconciliationConsole,
    Reservation,
};

pub const DAY: Date = date(2024, 6, 1);

/// Confirmed reservation on `DAY` with every resource assigned.
pub fn reservation(id: &str, driver: &str) -> Reservation {
    let mut reservation = Reservation::new(id, format!("bk-{id}"), DAY);
    reservation.operator = Some("Own".to_string());
    reservation.driver = Some(driver.to_string());
    reservation.guide = Some(format!("Guide {id}"));
    reservation.pickup_time = Some("09:00".to_string());
    reservation
}

/// Helper function to create a console loaded from an in-memory source
pub async fn create_test_console(
    reservations: Vec<Reservation>,
) -> (Arc<InMemoryReservationSource>, Arc<ReconciliationConsole>) {
    let source = Arc::new(InMemoryReservationSource::new(reservations));
    let console = ReconciliationConsole::new(
        source.clone(),
        ColumnPreferences::default(),
        ConsoleFilter::for_date(DAY),
    );
    console.refresh().await.expect("Failed to load reservations");
    (source, Arc::new(console))
}
