//! Filter options for the console view.

use jiff::civil::Date;

use super::ReservationStatus;

/// Filter options applied to the day's reservations.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleFilter {
    /// Operation date shown on the console
    pub date: Date,

    /// Restrict to one status
    pub status: Option<ReservationStatus>,

    /// Tour name (case-insensitive partial match)
    pub tour: Option<String>,

    /// Exact resource names (case-insensitive)
    pub guide: Option<String>,
    pub driver: Option<String>,
    pub operator: Option<String>,

    /// Free-text search over identifiers, names and addresses
    pub search: Option<String>,
}

impl ConsoleFilter {
    /// Unfiltered view of one operation date.
    ///
    /// ```rust
    /// use jiff::civil::date;
    /// use opsdesk_core::models::ConsoleFilter;
    ///
    /// let filter = ConsoleFilter::for_date(date(2024, 6, 1));
    /// assert_eq!(filter.date, date(2024, 6, 1));
    /// assert!(filter.search.is_none());
    /// ```
    pub fn for_date(date: Date) -> Self {
        Self {
            date,
            status: None,
            tour: None,
            guide: None,
            driver: None,
            operator: None,
            search: None,
        }
    }

    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}
