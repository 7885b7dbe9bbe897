use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{Reader, StringRecord};
use tracing::{debug, warn};

use crate::error::ActionLogError;
use crate::schedule::{ActionEvent, ActionKind};

/// Parses a boolean value from various string representations
fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower == "yes" || lower == "true" || lower == "1"
}

/// Parses an action type, accepting the spellings the booking system has used
fn parse_kind(value: &str) -> Option<ActionKind> {
    match value.trim().to_lowercase().as_str() {
        "booking" | "book" | "reservation" => Some(ActionKind::Booking),
        "pass" | "passed" => Some(ActionKind::Pass),
        "cancellation" | "cancel" | "cancelled" | "canceled" => Some(ActionKind::Cancellation),
        _ => None,
    }
}

/// Parses a timestamp, returning None if empty or invalid.
///
/// Accepts RFC 3339, or "YYYY-MM-DD HH:MM:SS" taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            debug!("Unparseable timestamp {:?}: {}", trimmed, e);
            None
        }
    }
}

/// Loads the action log snapshot from a CSV file
pub fn load_action_log<P: AsRef<Path>>(csv_path: P) -> Result<Vec<ActionEvent>, ActionLogError> {
    let reader = Reader::from_path(csv_path)?;
    read_events(reader)
}

/// Parses an action log snapshot from CSV bytes (e.g. an upload)
pub fn parse_action_log(data: &[u8]) -> Result<Vec<ActionEvent>, ActionLogError> {
    read_events(Reader::from_reader(data))
}

/// Column layout resolved from the header row
struct Columns {
    participant: usize,
    kind: usize,
    finalized: Option<usize>,
    created_at: Option<usize>,
    cancelled_at: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, ActionLogError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        Ok(Self {
            participant: find(&["participant", "name", "family"])
                .ok_or(ActionLogError::MissingColumn("participant"))?,
            kind: find(&["type", "kind", "action"]).ok_or(ActionLogError::MissingColumn("type"))?,
            finalized: find(&["finalized", "is_finalized"]),
            created_at: find(&["created_at", "created", "timestamp"]),
            cancelled_at: find(&["cancelled_at", "canceled_at"]),
        })
    }
}

fn read_events<R: Read>(mut reader: Reader<R>) -> Result<Vec<ActionEvent>, ActionLogError> {
    let columns = Columns::from_headers(reader.headers()?)?;
    let field = |record: &StringRecord, col: Option<usize>| -> String {
        col.and_then(|c| record.get(c)).unwrap_or("").trim().to_string()
    };

    let mut events = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;

        let participant = field(&record, Some(columns.participant));
        if participant.is_empty() {
            warn!("Action log row {} has no participant, skipping", line + 1);
            continue;
        }

        let raw_kind = field(&record, Some(columns.kind));
        let Some(kind) = parse_kind(&raw_kind) else {
            warn!("Action log row {} has unknown type {:?}, skipping", line + 1, raw_kind);
            continue;
        };

        events.push(ActionEvent {
            participant,
            kind,
            finalized: parse_bool(&field(&record, columns.finalized)),
            created_at: parse_timestamp(&field(&record, columns.created_at)),
            cancelled_at: parse_timestamp(&field(&record, columns.cancelled_at)),
        });
    }

    debug!("Loaded {} action log entries", events.len());
    Ok(events)
}
