//! Timestamp formatting for ticket rows and message items
//!
//! The backend sends ISO-8601 strings in a couple of shapes: RFC 3339 with an
//! offset, and naive `YYYY-MM-DD HH:MM:SS.ffffff` values written by the
//! status-change path. Both are rendered in an explicitly configured zone and
//! locale so output never depends on process-global state.

use std::fmt;
use std::str::FromStr;

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TicketDeskError};

/// Output for timestamps that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Locale used for the human-readable date/time form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayLocale {
    /// `3/5/2024 08:15 AM`
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// `05/03/2024 08:15`
    #[serde(rename = "en-GB")]
    EnGb,
    /// `2024-03-05 08:15`
    #[serde(rename = "iso")]
    Iso,
}

impl DisplayLocale {
    fn pattern(self) -> &'static str {
        match self {
            DisplayLocale::EnUs => "%-m/%-d/%Y %I:%M %p",
            DisplayLocale::EnGb => "%d/%m/%Y %H:%M",
            DisplayLocale::Iso => "%Y-%m-%d %H:%M",
        }
    }
}

impl fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayLocale::EnUs => write!(f, "en-US"),
            DisplayLocale::EnGb => write!(f, "en-GB"),
            DisplayLocale::Iso => write!(f, "iso"),
        }
    }
}

impl FromStr for DisplayLocale {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "en-us" => Ok(DisplayLocale::EnUs),
            "en-gb" => Ok(DisplayLocale::EnGb),
            "iso" => Ok(DisplayLocale::Iso),
            _ => Err(TicketDeskError::Config(format!(
                "unknown locale '{s}', expected 'en-US', 'en-GB' or 'iso'"
            ))),
        }
    }
}

/// Renders backend timestamps in a fixed zone and locale.
#[derive(Debug, Clone)]
pub struct TimestampFormatter {
    zone: TimeZone,
    locale: DisplayLocale,
}

impl TimestampFormatter {
    pub fn new(zone: TimeZone, locale: DisplayLocale) -> Self {
        Self { zone, locale }
    }

    /// UTC with the default locale; deterministic regardless of host settings.
    pub fn utc() -> Self {
        Self::new(TimeZone::UTC, DisplayLocale::default())
    }

    pub fn locale(&self) -> DisplayLocale {
        self.locale
    }

    /// Locale date plus localized hour and minute, as shown on message items.
    ///
    /// ```
    /// use ticketdesk::formatting::TimestampFormatter;
    ///
    /// let fmt = TimestampFormatter::utc();
    /// assert_eq!(fmt.to_display_date_time("2024-03-05T08:15:00Z"), "3/5/2024 08:15 AM");
    /// assert_eq!(fmt.to_display_date_time("garbage"), "Invalid Date");
    /// ```
    pub fn to_display_date_time(&self, iso: &str) -> String {
        self.render(iso, self.locale.pattern())
    }

    /// Fixed `MM/DD/YYYY HH:mm` 24-hour form used in the ticket table.
    ///
    /// ```
    /// use ticketdesk::formatting::TimestampFormatter;
    ///
    /// let fmt = TimestampFormatter::utc();
    /// assert_eq!(fmt.to_display_date_time_numeric("2024-03-05T08:15:00Z"), "03/05/2024 08:15");
    /// ```
    pub fn to_display_date_time_numeric(&self, iso: &str) -> String {
        self.render(iso, "%m/%d/%Y %H:%M")
    }

    fn render(&self, iso: &str, pattern: &str) -> String {
        match self.parse(iso) {
            Some(zoned) => zoned.strftime(pattern).to_string(),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Parse into the configured zone. Offset-less values are taken as wall
    /// clock time in that zone; bare dates as UTC midnight.
    fn parse(&self, iso: &str) -> Option<Zoned> {
        let iso = iso.trim();
        if iso.is_empty() {
            return None;
        }

        if let Ok(ts) = iso.parse::<Timestamp>() {
            return Some(ts.to_zoned(self.zone.clone()));
        }

        if iso.len() == 10
            && let Ok(date) = iso.parse::<Date>()
        {
            let midnight = date.to_zoned(TimeZone::UTC).ok()?;
            return Some(midnight.with_time_zone(self.zone.clone()));
        }

        let civil = iso.parse::<DateTime>().ok()?;
        civil.to_zoned(self.zone.clone()).ok()
    }
}
