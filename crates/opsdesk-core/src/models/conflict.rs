//! Conflict descriptor emitted by the resource conflict detector.

use std::fmt;

use serde::Serialize;

use super::ReservationId;

/// Which kind of resource is double-booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Driver,
    Guide,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Driver => "driver",
            ResourceType::Guide => "guide",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two reservations sharing one resource on the same operation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictDescriptor {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub reservation_ids: [ReservationId; 2],
    pub message: String,
}

impl ConflictDescriptor {
    pub fn new(
        resource_type: ResourceType,
        resource_name: impl Into<String>,
        first: ReservationId,
        second: ReservationId,
    ) -> Self {
        let resource_name = resource_name.into();
        let message = format!(
            "{} {} is assigned to both {} and {}",
            capitalized(resource_type),
            resource_name,
            first,
            second
        );
        Self {
            resource_type,
            resource_name,
            reservation_ids: [first, second],
            message,
        }
    }

    pub fn involves(&self, id: &ReservationId) -> bool {
        self.reservation_ids.iter().any(|candidate| candidate == id)
    }
}

fn capitalized(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::Driver => "Driver",
        ResourceType::Guide => "Guide",
    }
}
