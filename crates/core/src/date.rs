//! Calendar-date normalization in the reference timezone.
//!
//! Watering freshness is judged against "today" as observed in one fixed
//! IANA zone, not UTC. [`ymd_in_tz`] collapses an instant to the canonical
//! `YYYY-MM-DD` string for that zone; the reminder job compares only these
//! strings.

use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// IANA zone used to decide what "today" means for watering comparisons.
pub const REFERENCE_TIMEZONE: &str = "Asia/Bangkok";

/// Format an instant as `YYYY-MM-DD` as observed in the given zone.
pub fn ymd_in_tz(instant: Timestamp, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// Resolve an IANA zone identifier.
///
/// An unknown identifier is a configuration error, not a runtime
/// condition; callers are expected to fail startup on it.
pub fn parse_zone(name: &str) -> Result<Tz, CoreError> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("unknown IANA timezone: {name}")))
}
