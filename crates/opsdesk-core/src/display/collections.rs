//! Collection wrapper types for the console screens.

use std::fmt;

use super::datetime::ClockTime;
use crate::{
    console::ConsoleRow,
    models::{assigned, Column, ColumnPreferences, ConflictDescriptor},
    notifications::Notification,
};

/// The reservation table, limited to the visible columns.
///
/// The leading column holds the display id and row markers: `🔒` locked,
/// `✎` unsaved, `⚠n` in n conflicts, `☑` selected, `✉` confirmation sent,
/// `⏳` request in flight.
pub struct ConsoleTable<'a> {
    rows: &'a [ConsoleRow],
    columns: Vec<Column>,
}

impl<'a> ConsoleTable<'a> {
    pub fn new(rows: &'a [ConsoleRow], preferences: &ColumnPreferences) -> Self {
        Self {
            rows,
            columns: preferences.visible_columns(),
        }
    }

    fn markers(row: &ConsoleRow) -> String {
        let mut markers = String::new();
        if row.is_locked() {
            markers.push_str(" 🔒");
        }
        if row.unsaved {
            markers.push_str(" ✎");
        }
        if row.conflict_count > 0 {
            markers.push_str(&format!(" ⚠{}", row.conflict_count));
        }
        if row.selected {
            markers.push_str(" ☑");
        }
        if row.confirmation_sent {
            markers.push_str(" ✉");
        }
        if row.busy {
            markers.push_str(" ⏳");
        }
        markers
    }

    fn cell(row: &ConsoleRow, column: Column) -> String {
        let reservation = &row.reservation;
        let text = match column {
            Column::BookingId => reservation.booking_id().to_string(),
            Column::OperationDate => reservation.operation_date.to_string(),
            Column::PickupTime => reservation.pickup_time.clone().unwrap_or_default(),
            Column::Tour => reservation.tour_name.clone().unwrap_or_default(),
            Column::Customer => reservation.customer_name.clone().unwrap_or_default(),
            Column::PickupAddress => reservation.pickup_address.clone().unwrap_or_default(),
            Column::Passengers => reservation.passengers.to_string(),
            Column::Operator => assigned(&reservation.operator).unwrap_or("-").to_string(),
            Column::Driver => assigned(&reservation.driver).unwrap_or("-").to_string(),
            Column::Guide => assigned(&reservation.guide).unwrap_or("-").to_string(),
            Column::Status => reservation.status.with_icon().to_string(),
            Column::Price => reservation
                .pricing
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };
        escape_cell(&text)
    }
}

/// Keeps free text inside one table cell: pipes are escaped and line breaks
/// collapse to spaces.
fn escape_cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

impl fmt::Display for ConsoleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No reservations found.");
        }

        write!(f, "| ID |")?;
        for column in &self.columns {
            write!(f, " {} |", column.title())?;
        }
        writeln!(f)?;
        write!(f, "|:-|")?;
        for _ in &self.columns {
            write!(f, ":-|")?;
        }
        writeln!(f)?;

        for row in self.rows {
            write!(
                f,
                "| {}{} |",
                escape_cell(row.id().as_str()),
                Self::markers(row)
            )?;
            for column in &self.columns {
                write!(f, " {} |", Self::cell(row, *column))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Conflict banner shown above the table.
pub struct Conflicts(pub Vec<ConflictDescriptor>);

impl Conflicts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Conflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No resource conflicts.");
        }

        let noun = if self.0.len() == 1 { "conflict" } else { "conflicts" };
        writeln!(f, "## ⚠ {} resource {noun}", self.0.len())?;
        writeln!(f)?;
        for conflict in &self.0 {
            writeln!(f, "- {conflict}")?;
        }
        Ok(())
    }
}

/// Drained notifications, oldest first.
pub struct Notifications(pub Vec<Notification>);

impl fmt::Display for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notification in &self.0 {
            writeln!(
                f,
                "- `{}` **{}**: {}",
                ClockTime(&notification.created_at),
                notification.level.label(),
                notification.message
            )?;
        }
        Ok(())
    }
}

/// Column preference table.
pub struct ColumnSettings<'a>(pub &'a ColumnPreferences);

impl fmt::Display for ColumnSettings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| Column | Visible | Editable |")?;
        writeln!(f, "|:-|:-:|:-:|")?;
        for (column, setting) in self.0.iter() {
            let editable = match column.field() {
                Some(_) if setting.editable => "yes",
                Some(_) => "locked",
                None => "read-only",
            };
            writeln!(
                f,
                "| {} | {} | {editable} |",
                column.as_str(),
                if setting.visible { "yes" } else { "no" }
            )?;
        }
        Ok(())
    }
}
