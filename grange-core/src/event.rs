//! Event records for the community calendar.
//!
//! Every stored row is one concrete occurrence, never a rule spanning
//! multiple dates. `starts_at` is kept as the raw text the database
//! returned and parsed at the point of use, so one malformed row can be
//! skipped instead of poisoning a whole listing.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// How often an event regenerates once its start time has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    /// One-off event; the rollover pass leaves it alone. Unrecognized
    /// values in stored data also land here.
    #[default]
    #[serde(other)]
    None,
}

impl Recurrence {
    pub fn is_none(&self) -> bool {
        matches!(self, Recurrence::None)
    }
}

/// A calendar event as stored (one concrete occurrence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Identifier assigned by the store on creation.
    pub id: String,
    /// Display name; together with the start time it is the
    /// de-duplication key for the rollover pass.
    pub title: String,
    /// Timezone-normalized timestamp as stored; parse with
    /// [`Event::start_time`].
    pub starts_at: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Public URL of the event image, if one was uploaded.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Object path of the image inside the storage bucket, kept so
    /// deleting the event can clean the object up.
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl Event {
    /// Parse the stored start timestamp, if it is valid.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.starts_at)
    }
}

/// An event row that has not been stored yet (the store assigns the id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub starts_at: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl NewEvent {
    /// The next-occurrence copy of an existing event: every descriptive
    /// field carried over verbatim, only the start timestamp replaced.
    pub fn next_occurrence_of(event: &Event, starts_at: DateTime<Utc>) -> Self {
        NewEvent {
            title: event.title.clone(),
            starts_at: format_timestamp(starts_at),
            location: event.location.clone(),
            description: event.description.clone(),
            image_url: event.image_url.clone(),
            image_path: event.image_path.clone(),
            recurrence: event.recurrence,
        }
    }
}

/// Parse a stored timestamp. Accepts RFC 3339, with a fallback for
/// zone-less `YYYY-MM-DDTHH:MM:SS` values which are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Canonical stored form of a timestamp (UTC, second precision, `Z`).
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let parsed = parse_timestamp("2024-01-01T07:00:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_offset_normalized_to_utc() {
        let parsed = parse_timestamp("2024-01-01T09:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_zoneless_read_as_utc() {
        let parsed = parse_timestamp("2024-01-01T07:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-40T99:00:00Z").is_none());
    }

    #[test]
    fn test_format_timestamp_round_trips() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 31, 7, 0, 0).unwrap();
        let formatted = format_timestamp(instant);
        assert_eq!(formatted, "2024-03-31T07:00:00Z");
        assert_eq!(parse_timestamp(&formatted), Some(instant));
    }

    #[test]
    fn test_unknown_recurrence_reads_as_none() {
        let event: Event = serde_json::from_str(
            r#"{"id":"1","title":"Fika","starts_at":"2024-01-01T07:00:00Z","recurrence":"fortnightly"}"#,
        )
        .unwrap();
        assert_eq!(event.recurrence, Recurrence::None);
    }

    #[test]
    fn test_missing_recurrence_reads_as_none() {
        let event: Event =
            serde_json::from_str(r#"{"id":"1","title":"Fika","starts_at":"2024-01-01T07:00:00Z"}"#)
                .unwrap();
        assert_eq!(event.recurrence, Recurrence::None);
        assert!(event.location.is_none());
    }

    #[test]
    fn test_recurrence_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Recurrence::Weekly).unwrap(), "\"weekly\"");
        assert_eq!(serde_json::to_string(&Recurrence::None).unwrap(), "\"none\"");
    }
}
