//! Firestore typed-value JSON helpers.
//!
//! Firestore's REST surface wraps every field in a type tag
//! (`{"stringValue": …}`, `{"timestampValue": …}`, …). These helpers
//! extract the handful of shapes this service reads and build the ones it
//! writes. Timestamp extraction is deliberately permissive: legacy clients
//! wrote `lastWateredAt` as a string, so the raw wire value is first
//! classified into a tagged variant and then parsed into a single internal
//! instant. Nothing past this boundary branches on representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Map, Value};
use sprig_core::types::Timestamp;

/// The field map of one Firestore document.
pub type Fields = Map<String, Value>;

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

pub fn string_field(fields: &Fields, name: &str) -> Option<String> {
    fields
        .get(name)?
        .get("stringValue")?
        .as_str()
        .map(String::from)
}

pub fn bool_field(fields: &Fields, name: &str) -> Option<bool> {
    fields.get(name)?.get("booleanValue")?.as_bool()
}

/// Extract an array of strings; missing fields and non-string elements
/// decode as empty/skipped.
pub fn string_array_field(fields: &Fields, name: &str) -> Vec<String> {
    fields
        .get(name)
        .and_then(|v| v.get("arrayValue"))
        .and_then(|v| v.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue"))
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Raw wire representations of an instant-valued field.
#[derive(Debug)]
enum RawInstant {
    /// A native `timestampValue` (always RFC 3339).
    Native(String),
    /// A legacy string write: RFC 3339 or a bare `YYYY-MM-DD`.
    Text(String),
    /// A legacy numeric write: milliseconds since the Unix epoch.
    EpochMillis(i64),
}

/// Extract an instant field, normalizing every legacy representation to a
/// UTC timestamp. Unparseable values decode as `None` (for `lastWateredAt`
/// that means "never watered", which keeps the plant reminder-eligible).
pub fn instant_field(fields: &Fields, name: &str) -> Option<Timestamp> {
    let value = fields.get(name)?;

    let raw = if let Some(ts) = value.get("timestampValue").and_then(Value::as_str) {
        RawInstant::Native(ts.to_string())
    } else if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
        RawInstant::Text(s.to_string())
    } else if let Some(n) = value
        .get("integerValue")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<i64>().ok())
    {
        RawInstant::EpochMillis(n)
    } else {
        tracing::debug!(field = name, "Unrecognized instant representation");
        return None;
    };

    let parsed = match raw {
        RawInstant::Native(ts) | RawInstant::Text(ts) => parse_instant_text(&ts),
        RawInstant::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(ms),
    };

    if parsed.is_none() {
        tracing::debug!(field = name, "Unparseable instant value");
    }
    parsed
}

/// Parse an RFC 3339 timestamp or a bare calendar date (midnight UTC).
fn parse_instant_text(text: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

pub fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn bool_value(b: bool) -> Value {
    json!({ "booleanValue": b })
}
