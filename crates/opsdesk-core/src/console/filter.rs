//! Filtering pipeline of the console view.

use crate::models::{assigned, ConsoleFilter, Reservation};

/// Reservations shown for `filter`, sorted by pickup time.
///
/// Only reservations on the selected date that are past `pending` are kept.
/// Pickup times compare as plain strings, so `"HH:MM"` values sort
/// chronologically within a day and missing times come first. Reservations
/// with equal pickup times keep their source order.
pub fn apply_filters(reservations: &[Reservation], filter: &ConsoleFilter) -> Vec<Reservation> {
    let search = normalized(&filter.search);
    let tour = normalized(&filter.tour);

    let mut view: Vec<Reservation> = reservations
        .iter()
        .filter(|r| r.operation_date == filter.date)
        .filter(|r| r.status.is_operational())
        .filter(|r| filter.status.map_or(true, |status| r.status == status))
        .filter(|r| {
            tour.as_deref()
                .map_or(true, |tour| contains(r.tour_name.as_deref(), tour))
        })
        .filter(|r| resource_matches(&r.guide, &filter.guide))
        .filter(|r| resource_matches(&r.driver, &filter.driver))
        .filter(|r| resource_matches(&r.operator, &filter.operator))
        .filter(|r| search.as_deref().map_or(true, |needle| matches_search(r, needle)))
        .cloned()
        .collect();

    view.sort_by(|a, b| a.pickup_sort_key().cmp(b.pickup_sort_key()));
    view
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|text| text.to_lowercase().contains(needle))
}

fn resource_matches(value: &Option<String>, wanted: &Option<String>) -> bool {
    match normalized(wanted) {
        Some(wanted) => assigned(value).is_some_and(|name| name.to_lowercase() == wanted),
        None => true,
    }
}

fn matches_search(reservation: &Reservation, needle: &str) -> bool {
    contains(Some(reservation.booking_id().as_str()), needle)
        || contains(Some(reservation.id().as_str()), needle)
        || [
            &reservation.customer_name,
            &reservation.tour_name,
            &reservation.pickup_address,
            &reservation.driver,
            &reservation.guide,
            &reservation.operator,
        ]
        .into_iter()
        .any(|field| contains(field.as_deref(), needle))
}
