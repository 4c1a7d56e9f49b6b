use std::path::Path;

use jiff::Timestamp;
use serde::Serialize;
use tracing::warn;

use crate::errors::Error;
use crate::retry::FetchOutcome;

pub const DELIMITER: char = ';';

pub const HEADER: [&str; 10] = [
    "call_id",
    "project",
    "t",
    "delta_t",
    "url",
    "redirect_url",
    "response_size",
    "response_code",
    "success",
    "error",
];

pub fn header_line() -> String {
    HEADER.join(";")
}

/// One log row, without the trailing newline.
pub fn format_row(call_id: u64, outcome: &FetchOutcome) -> String {
    let fields = [
        call_id.to_string(),
        sanitize(&outcome.project),
        outcome.start_time.to_string(),
        outcome.elapsed.as_secs_f64().to_string(),
        sanitize(&outcome.url),
        outcome.redirect_url.as_deref().map(sanitize).unwrap_or_default(),
        optional(outcome.response_size),
        optional(outcome.response_code),
        format_bool(outcome.success).to_string(),
        outcome.error.as_deref().map(sanitize).unwrap_or_default(),
    ];
    fields.join(";")
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// Same literals as logs written by earlier connector versions.
fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn sanitize(field: &str) -> String {
    field.replace([DELIMITER, '\r', '\n'], " ")
}

/// A row read back from a log file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub call_id: u64,
    pub project: String,
    /// Raw `t` column; RFC 3339 for rows written by this crate, epoch seconds in older logs.
    pub t: String,
    pub delta_t: f64,
    pub url: String,
    pub redirect_url: Option<String>,
    pub response_size: Option<u64>,
    pub response_code: Option<u16>,
    pub success: bool,
    pub error: Option<String>,
}

impl LogEntry {
    pub fn parse(line: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.splitn(HEADER.len(), DELIMITER).collect();
        if fields.len() != HEADER.len() {
            return Err(Error::Config(format!(
                "log row has {} fields, expected {}: '{}'",
                fields.len(),
                HEADER.len(),
                line
            )));
        }
        Ok(Self {
            call_id: parse_field(fields[0], "call_id")?,
            project: fields[1].to_string(),
            t: fields[2].to_string(),
            delta_t: parse_field(fields[3], "delta_t")?,
            url: fields[4].to_string(),
            redirect_url: non_empty(fields[5]),
            response_size: parse_optional(fields[6], "response_size")?,
            response_code: parse_optional(fields[7], "response_code")?,
            success: parse_bool(fields[8])?,
            error: non_empty(fields[9]),
        })
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        if let Ok(ts) = self.t.parse::<Timestamp>() {
            return Some(ts);
        }
        let seconds: f64 = self.t.parse().ok()?;
        Timestamp::from_nanosecond((seconds * 1e9) as i128).ok()
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid {name} '{raw}' in log row")))
}

fn parse_optional<T: std::str::FromStr>(raw: &str, name: &str) -> Result<Option<T>, Error> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_field(raw, name).map(Some)
    }
}

fn parse_bool(raw: &str) -> Result<bool, Error> {
    match raw.trim() {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(Error::Config(format!("invalid success '{other}' in log row"))),
    }
}

fn non_empty(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

/// Id of the last row carrying a numeric call id, scanning from the end.
pub fn last_call_id(contents: &str) -> Option<u64> {
    contents
        .lines()
        .rev()
        .filter_map(|line| line.split(DELIMITER).next())
        .find_map(|first| first.trim().parse::<u64>().ok())
}

/// Reads every row of a log file, skipping the header and blank lines.
///
/// Rows that do not parse, such as one cut short by a crash mid-append, are
/// skipped and reported as warnings so the rest of the log stays readable.
pub async fn read_log(path: impl AsRef<Path>) -> Result<Vec<LogEntry>, Error> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let contents = String::from_utf8_lossy(&bytes);
    let header = header_line();
    let entries = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && *line != header)
        .filter_map(|(index, line)| match LogEntry::parse(line) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %err,
                    "call_log.skipped_row"
                );
                None
            }
        })
        .collect();
    Ok(entries)
}
