mod logger;
mod row;

pub use logger::CallLogger;
pub use row::{HEADER, LogEntry, format_row, header_line, last_call_id, read_log};
