//! Display implementations for domain models.
//!
//! Kept apart from the model definitions; these render full markdown cards
//! rather than the one-word forms the models define themselves.

use std::fmt;

use super::datetime::OperationDay;
use crate::models::{assigned, ConflictDescriptor, Reservation};

impl fmt::Display for ConflictDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} ({})",
            self.id(),
            self.status.with_icon()
        )?;
        writeln!(f)?;

        writeln!(f, "- Booking: {}", self.booking_id())?;
        writeln!(f, "- Date: {}", OperationDay(&self.operation_date))?;
        if let Some(tour) = &self.tour_name {
            writeln!(f, "- Tour: {tour}")?;
        }
        if let Some(customer) = &self.customer_name {
            writeln!(f, "- Customer: {customer}")?;
        }
        writeln!(
            f,
            "- Pickup: {} {}",
            self.pickup_time.as_deref().unwrap_or("--:--"),
            self.pickup_address.as_deref().unwrap_or("")
        )?;
        writeln!(f, "- Passengers (A/C/I): {}", self.passengers)?;
        if let Some(pricing) = &self.pricing {
            writeln!(f, "- Price: {pricing}")?;
        }

        writeln!(f)?;
        writeln!(f, "#### Resources")?;
        writeln!(f)?;
        for (label, value) in [
            ("Operator", &self.operator),
            ("Driver", &self.driver),
            ("Guide", &self.guide),
        ] {
            writeln!(f, "- {label}: {}", assigned(value).unwrap_or("*unassigned*"))?;
        }
        writeln!(f)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_reservation_card_marks_unassigned_resources() {
        let mut reservation = Reservation::new("A", "7", date(2024, 6, 1));
        reservation.driver = Some("Carlos".to_string());
        reservation.guide = Some("  ".to_string());

        let output = reservation.to_string();

        assert!(output.starts_with("## A (○ Confirmed)"));
        assert!(output.contains("- Booking: 7"));
        assert!(output.contains("- Driver: Carlos"));
        assert!(output.contains("- Guide: *unassigned*"));
    }
}
