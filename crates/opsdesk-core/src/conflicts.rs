//! Resource double-booking detection.
//!
//! The rule is "same resource, same day": any driver or guide assigned to
//! more than one reservation in the given set produces one descriptor per
//! unordered pair of those reservations. Pickup times are not compared, so
//! sequential tours run by the same driver are reported as well.

use std::collections::{BTreeMap, HashMap};

use crate::models::{assigned, ConflictDescriptor, Reservation, ReservationId, ResourceType};

/// Detects drivers and guides assigned to more than one reservation.
///
/// Callers pass the reservations of a single operation date. The result is
/// ordered by resource type, then resource name, then input order, and an
/// empty input yields an empty set.
///
/// ```rust
/// use jiff::civil::date;
/// use opsdesk_core::{conflicts::detect_conflicts, models::Reservation};
///
/// let mut a = Reservation::new("A", "1", date(2024, 6, 1));
/// let mut b = Reservation::new("B", "2", date(2024, 6, 1));
/// a.driver = Some("Carlos".to_string());
/// b.driver = Some("Carlos".to_string());
///
/// let conflicts = detect_conflicts(&[a, b]);
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].resource_name, "Carlos");
/// ```
pub fn detect_conflicts(reservations: &[Reservation]) -> Vec<ConflictDescriptor> {
    let mut conflicts = pairwise(reservations, ResourceType::Driver, |r| assigned(&r.driver));
    conflicts.extend(pairwise(reservations, ResourceType::Guide, |r| assigned(&r.guide)));
    conflicts
}

/// Number of conflicts each reservation takes part in.
pub fn conflict_counts(conflicts: &[ConflictDescriptor]) -> HashMap<ReservationId, usize> {
    let mut counts = HashMap::new();
    for conflict in conflicts {
        for id in &conflict.reservation_ids {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }
    }
    counts
}

fn pairwise<'a, F>(
    reservations: &'a [Reservation],
    resource_type: ResourceType,
    resource_of: F,
) -> Vec<ConflictDescriptor>
where
    F: Fn(&'a Reservation) -> Option<&'a str>,
{
    let mut groups: BTreeMap<&str, Vec<&ReservationId>> = BTreeMap::new();
    for reservation in reservations {
        if let Some(name) = resource_of(reservation) {
            groups.entry(name).or_default().push(reservation.id());
        }
    }

    let mut conflicts = Vec::new();
    for (name, ids) in groups.into_iter().filter(|(_, ids)| ids.len() > 1) {
        for (index, first) in ids.iter().enumerate() {
            for second in &ids[index + 1..] {
                conflicts.push(ConflictDescriptor::new(
                    resource_type,
                    name,
                    (*first).clone(),
                    (*second).clone(),
                ));
            }
        }
    }
    conflicts
}
