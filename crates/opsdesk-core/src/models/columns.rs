//! Column visibility and editability preferences.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::EditableField;
use crate::error::{ConsoleError, Result};

/// Columns of the console table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    BookingId,
    OperationDate,
    PickupTime,
    Tour,
    Customer,
    PickupAddress,
    Passengers,
    Operator,
    Driver,
    Guide,
    Status,
    Price,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::BookingId,
        Column::OperationDate,
        Column::PickupTime,
        Column::Tour,
        Column::Customer,
        Column::PickupAddress,
        Column::Passengers,
        Column::Operator,
        Column::Driver,
        Column::Guide,
        Column::Status,
        Column::Price,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::BookingId => "booking_id",
            Column::OperationDate => "operation_date",
            Column::PickupTime => "pickup_time",
            Column::Tour => "tour",
            Column::Customer => "customer",
            Column::PickupAddress => "pickup_address",
            Column::Passengers => "passengers",
            Column::Operator => "operator",
            Column::Driver => "driver",
            Column::Guide => "guide",
            Column::Status => "status",
            Column::Price => "price",
        }
    }

    /// Table header.
    pub fn title(&self) -> &'static str {
        match self {
            Column::BookingId => "Booking",
            Column::OperationDate => "Date",
            Column::PickupTime => "Pickup",
            Column::Tour => "Tour",
            Column::Customer => "Customer",
            Column::PickupAddress => "Address",
            Column::Passengers => "Pax (A/C/I)",
            Column::Operator => "Operator",
            Column::Driver => "Driver",
            Column::Guide => "Guide",
            Column::Status => "Status",
            Column::Price => "Price",
        }
    }

    /// The editable field behind this column, if any.
    pub fn field(&self) -> Option<EditableField> {
        match self {
            Column::OperationDate => Some(EditableField::OperationDate),
            Column::PickupTime => Some(EditableField::PickupTime),
            Column::PickupAddress => Some(EditableField::PickupAddress),
            Column::Operator => Some(EditableField::Operator),
            Column::Driver => Some(EditableField::Driver),
            Column::Guide => Some(EditableField::Guide),
            Column::Status => Some(EditableField::Status),
            _ => None,
        }
    }

    pub fn for_field(field: EditableField) -> Column {
        match field {
            EditableField::Operator => Column::Operator,
            EditableField::Driver => Column::Driver,
            EditableField::Guide => Column::Guide,
            EditableField::PickupTime => Column::PickupTime,
            EditableField::PickupAddress => Column::PickupAddress,
            EditableField::OperationDate => Column::OperationDate,
            EditableField::Status => Column::Status,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Column::ALL
            .into_iter()
            .find(|column| column.as_str() == normalized)
            .ok_or_else(|| format!("Invalid column: {s}"))
    }
}

/// Visibility and editability of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSetting {
    pub visible: bool,
    pub editable: bool,
}

/// Per-column preferences; missing entries fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnPreferences {
    settings: BTreeMap<Column, ColumnSetting>,
}

impl ColumnPreferences {
    /// Every column visible, field-backed columns editable.
    pub fn default_setting(column: Column) -> ColumnSetting {
        ColumnSetting {
            visible: true,
            editable: column.field().is_some(),
        }
    }

    pub fn setting(&self, column: Column) -> ColumnSetting {
        self.settings
            .get(&column)
            .copied()
            .unwrap_or_else(|| Self::default_setting(column))
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.setting(column).visible
    }

    pub fn is_editable(&self, column: Column) -> bool {
        self.setting(column).editable
    }

    pub fn is_field_editable(&self, field: EditableField) -> bool {
        self.is_editable(Column::for_field(field))
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }

    pub fn set_visible(&mut self, column: Column, visible: bool) {
        let mut setting = self.setting(column);
        setting.visible = visible;
        self.store(column, setting);
    }

    /// Only columns backed by an editable field can be made editable.
    pub fn set_editable(&mut self, column: Column, editable: bool) -> Result<()> {
        if editable && column.field().is_none() {
            return Err(ConsoleError::invalid_input("column")
                .with_reason(format!("{column} is read-only")));
        }
        let mut setting = self.setting(column);
        setting.editable = editable;
        self.store(column, setting);
        Ok(())
    }

    /// Only deviations from the defaults are kept, so equal preferences
    /// compare equal however they were built.
    fn store(&mut self, column: Column, setting: ColumnSetting) {
        if setting == Self::default_setting(column) {
            self.settings.remove(&column);
        } else {
            self.settings.insert(column, setting);
        }
    }

    /// All columns with their effective settings.
    pub fn iter(&self) -> impl Iterator<Item = (Column, ColumnSetting)> + '_ {
        Column::ALL
            .into_iter()
            .map(move |column| (column, self.setting(column)))
    }
}
