//! Date and time display utilities.

use std::fmt;

use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// Time of day of a timestamp in the system timezone, `HH:MM:SS`.
pub struct ClockTime<'a>(pub &'a Timestamp);

impl fmt::Display for ClockTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_zoned(TimeZone::system()).strftime("%H:%M:%S")
        )
    }
}

/// Operation date with its weekday, e.g. `Sat 2024-06-01`.
///
/// ```rust
/// use jiff::civil::date;
/// use opsdesk_core::display::OperationDay;
///
/// assert_eq!(OperationDay(&date(2024, 6, 1)).to_string(), "Sat 2024-06-01");
/// ```
pub struct OperationDay<'a>(pub &'a Date);

impl fmt::Display for OperationDay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.strftime("%a %Y-%m-%d"))
    }
}
