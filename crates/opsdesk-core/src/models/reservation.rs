//! Reservation model and its identifiers.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

use super::ReservationStatus;

/// Identifier a reservation is displayed and selected under.
///
/// It is only unique within one loaded list and may be a derived key, so it
/// is never sent to a write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReservationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Persisted booking identifier, the only key accepted by write endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Both identifiers of one reservation.
///
/// Reads go through [`ReservationKey::display_id`], writes through
/// [`ReservationKey::booking_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReservationKey {
    display: ReservationId,
    booking: BookingId,
}

impl ReservationKey {
    pub fn new(display: ReservationId, booking: BookingId) -> Self {
        Self { display, booking }
    }

    /// Key whose display id is the booking id itself.
    pub fn from_booking(booking: BookingId) -> Self {
        Self {
            display: ReservationId::new(booking.as_str()),
            booking,
        }
    }

    pub fn display_id(&self) -> &ReservationId {
        &self.display
    }

    pub fn booking_id(&self) -> &BookingId {
        &self.booking
    }
}

/// Passenger counts, read-only on the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passengers {
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
}

impl Passengers {
    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

impl fmt::Display for Passengers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.adults, self.children, self.infants)
    }
}

/// Price as computed by the reservation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub total: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(currency) => write!(f, "{:.2} {}", self.total, currency),
            None => write!(f, "{:.2}", self.total),
        }
    }
}

/// One day's service for one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReservationRecord", into = "ReservationRecord")]
pub struct Reservation {
    pub key: ReservationKey,
    pub operation_date: Date,
    pub status: ReservationStatus,
    pub driver: Option<String>,
    pub guide: Option<String>,
    pub operator: Option<String>,
    pub pickup_time: Option<String>,
    pub pickup_address: Option<String>,
    pub passengers: Passengers,
    pub pricing: Option<Pricing>,
    pub tour_name: Option<String>,
    pub customer_name: Option<String>,
}

impl Reservation {
    /// Minimal confirmed reservation, mostly useful for fixtures.
    pub fn new(id: impl Into<String>, booking_id: impl Into<String>, operation_date: Date) -> Self {
        Self {
            key: ReservationKey::new(ReservationId::new(id), BookingId::new(booking_id)),
            operation_date,
            status: ReservationStatus::Confirmed,
            driver: None,
            guide: None,
            operator: None,
            pickup_time: None,
            pickup_address: None,
            passengers: Passengers::default(),
            pricing: None,
            tour_name: None,
            customer_name: None,
        }
    }

    pub fn id(&self) -> &ReservationId {
        self.key.display_id()
    }

    pub fn booking_id(&self) -> &BookingId {
        self.key.booking_id()
    }

    /// Pickup time used for ordering; missing times sort first.
    pub fn pickup_sort_key(&self) -> &str {
        self.pickup_time.as_deref().unwrap_or("")
    }
}

/// Treats blank strings as unassigned.
pub fn assigned(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Wire shape of a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReservationRecord {
    #[serde(default, deserialize_with = "optional_id")]
    id: Option<String>,
    #[serde(deserialize_with = "required_id")]
    booking_id: String,
    operation_date: Date,
    status: ReservationStatus,
    #[serde(default)]
    driver: Option<String>,
    #[serde(default)]
    guide: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    pickup_time: Option<String>,
    #[serde(default)]
    pickup_address: Option<String>,
    #[serde(default)]
    passengers: Passengers,
    #[serde(default)]
    pricing: Option<Pricing>,
    #[serde(default)]
    tour_name: Option<String>,
    #[serde(default)]
    customer_name: Option<String>,
}

impl From<ReservationRecord> for Reservation {
    fn from(record: ReservationRecord) -> Self {
        let booking = BookingId::new(record.booking_id);
        let key = match record.id {
            Some(id) if !id.is_empty() => ReservationKey::new(ReservationId::new(id), booking),
            _ => ReservationKey::from_booking(booking),
        };
        Self {
            key,
            operation_date: record.operation_date,
            status: record.status,
            driver: record.driver,
            guide: record.guide,
            operator: record.operator,
            pickup_time: record.pickup_time,
            pickup_address: record.pickup_address,
            passengers: record.passengers,
            pricing: record.pricing,
            tour_name: record.tour_name,
            customer_name: record.customer_name,
        }
    }
}

impl From<Reservation> for ReservationRecord {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: Some(reservation.key.display.0),
            booking_id: reservation.key.booking.0,
            operation_date: reservation.operation_date,
            status: reservation.status,
            driver: reservation.driver,
            guide: reservation.guide,
            operator: reservation.operator,
            pickup_time: reservation.pickup_time,
            pickup_address: reservation.pickup_address,
            passengers: reservation.passengers,
            pricing: reservation.pricing,
            tour_name: reservation.tour_name,
            customer_name: reservation.customer_name,
        }
    }
}

/// Identifiers arrive as strings or as integers depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?.into())
}
