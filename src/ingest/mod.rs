//! Access-log ingestion: line parsing, whole-file reads, and the seen-line cursor.

mod access_log;
mod cursor;

pub use access_log::AccessLog;
pub use cursor::IngestionCursor;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Country recorded when the log line carries none.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

const DELIMITER: char = '|';

/// Field layout of the access log. Exactly one is active per process;
/// lines are never sniffed individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSchema {
    /// `timestamp | address | user_agent | path`
    FourField,
    /// `timestamp | address | country | user_agent | path`
    FiveField,
}

impl LogSchema {
    pub fn field_count(self) -> usize {
        match self {
            LogSchema::FourField => 4,
            LogSchema::FiveField => 5,
        }
    }

    pub fn has_country(self) -> bool {
        matches!(self, LogSchema::FiveField)
    }
}

impl fmt::Display for LogSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSchema::FourField => f.write_str("four_field"),
            LogSchema::FiveField => f.write_str("five_field"),
        }
    }
}

/// One parsed access-log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Seconds since the epoch
    pub timestamp: f64,
    pub address: String,
    pub country: String,
    pub user_agent: String,
    pub path: String,
}

/// Parse one raw line under `schema`. Wrong field count or a timestamp that is
/// not a finite number yields `None`; nothing else is validated.
pub fn parse_line(line: &str, schema: LogSchema) -> Option<RequestRecord> {
    let fields: Vec<&str> = line.trim().split(DELIMITER).map(str::trim).collect();
    if fields.len() != schema.field_count() {
        return None;
    }
    let timestamp: f64 = fields[0].parse().ok()?;
    if !timestamp.is_finite() {
        return None;
    }

    let (country, user_agent, path) = match schema {
        LogSchema::FourField => (UNKNOWN_COUNTRY, fields[2], fields[3]),
        LogSchema::FiveField => {
            let country = if fields[2].is_empty() { UNKNOWN_COUNTRY } else { fields[2] };
            (country, fields[3], fields[4])
        }
    };

    Some(RequestRecord {
        timestamp,
        address: fields[1].to_string(),
        country: country.to_string(),
        user_agent: user_agent.to_string(),
        path: path.to_string(),
    })
}

/// Parse a batch, dropping lines that do not parse. Returns the records and the
/// number of dropped lines.
pub fn parse_lines<'a, I>(lines: I, schema: LogSchema) -> (Vec<RequestRecord>, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut dropped = 0;
    for line in lines {
        match parse_line(line, schema) {
            Some(r) => records.push(r),
            None => {
                dropped += 1;
                tracing::debug!(line, "dropped malformed access-log line");
            }
        }
    }
    (records, dropped)
}
