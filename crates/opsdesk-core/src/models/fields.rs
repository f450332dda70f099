//! Typed access to the fields the console is allowed to change.
//!
//! Each [`EditableField`] maps to a [`FieldAccessor`] holding a getter and a
//! setter for the matching [`Reservation`] member. Values travel as
//! [`FieldValue`] and a setter rejects a value of the wrong kind.

use std::{collections::BTreeMap, fmt, str::FromStr};

use jiff::civil::Date;
use log::warn;
use serde::Serialize;

use super::{Reservation, ReservationStatus};
use crate::error::{ConsoleError, Result};

/// Whitelisted fields a staged edit may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    Operator,
    Driver,
    Guide,
    PickupTime,
    PickupAddress,
    OperationDate,
    Status,
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Status,
}

/// A value read from or written to an [`EditableField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text; `None` clears the field
    Text(Option<String>),
    Date(Date),
    Status(ReservationStatus),
}

/// Getter/setter pair for one field.
#[derive(Clone, Copy)]
pub struct FieldAccessor {
    pub field: EditableField,
    pub kind: FieldKind,
    get: fn(&Reservation) -> FieldValue,
    set: fn(&mut Reservation, FieldValue) -> Result<()>,
}

impl FieldAccessor {
    pub fn get(&self, reservation: &Reservation) -> FieldValue {
        (self.get)(reservation)
    }

    pub fn set(&self, reservation: &mut Reservation, value: FieldValue) -> Result<()> {
        (self.set)(reservation, value)
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("field", &self.field)
            .field("kind", &self.kind)
            .finish()
    }
}

impl EditableField {
    pub const ALL: [EditableField; 7] = [
        EditableField::Operator,
        EditableField::Driver,
        EditableField::Guide,
        EditableField::PickupTime,
        EditableField::PickupAddress,
        EditableField::OperationDate,
        EditableField::Status,
    ];

    /// Wire name, as used in the update request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            EditableField::Operator => "operator",
            EditableField::Driver => "driver",
            EditableField::Guide => "guide",
            EditableField::PickupTime => "pickup_time",
            EditableField::PickupAddress => "pickup_address",
            EditableField::OperationDate => "operation_date",
            EditableField::Status => "status",
        }
    }

    pub fn kind(self) -> FieldKind {
        self.accessor().kind
    }

    /// Accessor table entry for this field.
    pub fn accessor(self) -> FieldAccessor {
        match self {
            EditableField::Operator => FieldAccessor {
                field: self,
                kind: FieldKind::Text,
                get: |r| FieldValue::Text(r.operator.clone()),
                set: |r, v| {
                    r.operator = v.into_text(EditableField::Operator)?;
                    Ok(())
                },
            },
            EditableField::Driver => FieldAccessor {
                field: self,
                kind: FieldKind::Text,
                get: |r| FieldValue::Text(r.driver.clone()),
                set: |r, v| {
                    r.driver = v.into_text(EditableField::Driver)?;
                    Ok(())
                },
            },
            EditableField::Guide => FieldAccessor {
                field: self,
                kind: FieldKind::Text,
                get: |r| FieldValue::Text(r.guide.clone()),
                set: |r, v| {
                    r.guide = v.into_text(EditableField::Guide)?;
                    Ok(())
                },
            },
            EditableField::PickupTime => FieldAccessor {
                field: self,
                kind: FieldKind::Text,
                get: |r| FieldValue::Text(r.pickup_time.clone()),
                set: |r, v| {
                    r.pickup_time = v.into_text(EditableField::PickupTime)?;
                    Ok(())
                },
            },
            EditableField::PickupAddress => FieldAccessor {
                field: self,
                kind: FieldKind::Text,
                get: |r| FieldValue::Text(r.pickup_address.clone()),
                set: |r, v| {
                    r.pickup_address = v.into_text(EditableField::PickupAddress)?;
                    Ok(())
                },
            },
            EditableField::OperationDate => FieldAccessor {
                field: self,
                kind: FieldKind::Date,
                get: |r| FieldValue::Date(r.operation_date),
                set: |r, v| match v {
                    FieldValue::Date(date) => {
                        r.operation_date = date;
                        Ok(())
                    }
                    other => Err(other.kind_mismatch(EditableField::OperationDate)),
                },
            },
            EditableField::Status => FieldAccessor {
                field: self,
                kind: FieldKind::Status,
                get: |r| FieldValue::Status(r.status),
                set: |r, v| match v {
                    FieldValue::Status(status) => {
                        r.status = status;
                        Ok(())
                    }
                    other => Err(other.kind_mismatch(EditableField::Status)),
                },
            },
        }
    }

    pub fn get(self, reservation: &Reservation) -> FieldValue {
        self.accessor().get(reservation)
    }

    pub fn set(self, reservation: &mut Reservation, value: FieldValue) -> Result<()> {
        self.accessor().set(reservation, value)
    }

    /// Parses user input into a value of this field's kind.
    ///
    /// ```rust
    /// use opsdesk_core::models::{EditableField, FieldValue};
    ///
    /// let value = EditableField::Driver.parse_value("  Carlos ")?;
    /// assert_eq!(value, FieldValue::Text(Some("Carlos".to_string())));
    /// assert_eq!(EditableField::Guide.parse_value("")?, FieldValue::Text(None));
    /// # opsdesk_core::Result::<()>::Ok(())
    /// ```
    pub fn parse_value(self, input: &str) -> Result<FieldValue> {
        let input = input.trim();
        match self.kind() {
            FieldKind::Text => Ok(FieldValue::text(input)),
            FieldKind::Date => input.parse::<Date>().map(FieldValue::Date).map_err(|e| {
                ConsoleError::invalid_input(self.as_str())
                    .with_reason(format!("expected YYYY-MM-DD: {e}"))
            }),
            FieldKind::Status => input
                .parse::<ReservationStatus>()
                .map(FieldValue::Status)
                .map_err(|e| ConsoleError::invalid_input(self.as_str()).with_reason(e)),
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditableField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        EditableField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| format!("Invalid editable field: {s}"))
    }
}

impl FieldValue {
    /// Text value with blank input treated as clearing the field.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            FieldValue::Text(None)
        } else {
            FieldValue::Text(Some(trimmed.to_string()))
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Status(_) => FieldKind::Status,
        }
    }

    fn into_text(self, field: EditableField) -> Result<Option<String>> {
        match self {
            FieldValue::Text(text) => Ok(text.filter(|t| !t.trim().is_empty())),
            other => Err(other.kind_mismatch(field)),
        }
    }

    fn kind_mismatch(&self, field: EditableField) -> ConsoleError {
        ConsoleError::invalid_input(field.as_str()).with_reason(format!(
            "expected a {:?} value, got {:?}",
            field.kind(),
            self.kind()
        ))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(Some(text)) => f.write_str(text),
            FieldValue::Text(None) => Ok(()),
            FieldValue::Date(date) => write!(f, "{date}"),
            FieldValue::Status(status) => f.write_str(status.as_str()),
        }
    }
}

/// Pending changes for one reservation, serialized as the update body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditedFieldSet(BTreeMap<EditableField, FieldValue>);

impl EditedFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the pending value of a field.
    pub fn insert(&mut self, field: EditableField, value: FieldValue) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: EditableField) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn remove(&mut self, field: EditableField) -> Option<FieldValue> {
        self.0.remove(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EditableField, &FieldValue)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }

    pub fn fields(&self) -> impl Iterator<Item = EditableField> + '_ {
        self.0.keys().copied()
    }

    /// Copy of `reservation` with every pending value applied.
    pub fn overlay(&self, reservation: &Reservation) -> Reservation {
        let mut overlaid = reservation.clone();
        for (field, value) in self.iter() {
            // Values are kind-checked when staged.
            let applied = field.set(&mut overlaid, value.clone());
            debug_assert!(applied.is_ok(), "pending {field} has the wrong kind: {applied:?}");
            if let Err(e) = applied {
                warn!("Ignoring pending {field} on {}: {e}", reservation.id());
            }
        }
        overlaid
    }
}

impl FromIterator<(EditableField, FieldValue)> for EditedFieldSet {
    fn from_iter<I: IntoIterator<Item = (EditableField, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resources that must be assigned before a reservation can be reconfirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceField {
    Operator,
    Driver,
    Guide,
}

impl ResourceField {
    pub const ALL: [ResourceField; 3] = [
        ResourceField::Operator,
        ResourceField::Driver,
        ResourceField::Guide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceField::Operator => "operator",
            ResourceField::Driver => "driver",
            ResourceField::Guide => "guide",
        }
    }

    pub fn editable_field(self) -> EditableField {
        match self {
            ResourceField::Operator => EditableField::Operator,
            ResourceField::Driver => EditableField::Driver,
            ResourceField::Guide => EditableField::Guide,
        }
    }

    pub fn value(self, reservation: &Reservation) -> Option<&str> {
        let value = match self {
            ResourceField::Operator => &reservation.operator,
            ResourceField::Driver => &reservation.driver,
            ResourceField::Guide => &reservation.guide,
        };
        super::reservation::assigned(value)
    }
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
