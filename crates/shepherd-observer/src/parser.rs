//! Access-log line parsing and severity classification.
//!
//! Handles the common combined log format:
//!
//! ```text
//! 127.0.0.1 - - [09/Nov/2025:10:00:00 +0000] "GET /path HTTP/1.1" 200 612 "-" "UA"
//! ```
//!
//! Parsing never fails: a line that does not match still produces a minimal
//! event with status `0`, the receipt time, and the raw line preserved, so
//! nothing the agent ships is ever silently lost.

use chrono::{DateTime, Utc};
use shepherd_types::{Event, EventKind};

/// Fields extracted from one raw log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Client address, `unknown` when absent.
    pub ip: String,
    /// The quoted request line, `-` when absent.
    pub request: String,
    /// HTTP status code, `0` when unparseable.
    pub status: u16,
    /// Response size in bytes, when present.
    pub size: Option<u64>,
    /// Timestamp string between `[` and `]`, when present.
    pub timestamp: Option<String>,
}

/// Parse one access-log line into its display fields.
///
/// The line is split on `"`; the first segment carries ip and timestamp,
/// the second the request line, and the third the status and size.
pub fn parse_log_line(line: &str) -> ParsedLine {
    let mut parts = line.trim().split('"');
    let pre = parts.next().unwrap_or_default().trim();
    let request = parts
        .next()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("-");
    let post = parts.next().unwrap_or_default().trim();

    let mut post_tokens = post.split_whitespace();
    let status = post_tokens
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(0);
    let size = post_tokens.next().and_then(|t| t.parse().ok());

    let ip = pre
        .split_whitespace()
        .next()
        .filter(|t| !t.is_empty())
        .unwrap_or("unknown");

    let timestamp = pre
        .find('[')
        .and_then(|start| pre.get(start + 1..).and_then(|rest| {
            rest.find(']').and_then(|end| rest.get(..end))
        }))
        .map(str::to_owned);

    ParsedLine {
        ip: ip.to_owned(),
        request: request.to_owned(),
        status,
        size,
        timestamp,
    }
}

/// Classify a status code into the marker severity.
///
/// 500 and above is an error, 400-499 a warning, everything else normal.
pub const fn classify(status: u16) -> EventKind {
    if status >= 500 {
        EventKind::Error
    } else if status >= 400 {
        EventKind::Warning
    } else {
        EventKind::Normal
    }
}

/// Build a full [`Event`] for one raw log line.
///
/// `received_at` doubles as the timestamp fallback for lines with no
/// bracketed date. The event starts unacknowledged.
pub fn event_from_line(line: &str, id: u64, received_at: DateTime<Utc>) -> Event {
    let parsed = parse_log_line(line);
    Event {
        id,
        kind: classify(parsed.status),
        status: parsed.status.to_string(),
        request: parsed.request,
        ip: parsed.ip,
        timestamp: parsed
            .timestamp
            .unwrap_or_else(|| received_at.to_rfc3339()),
        size: parsed.size,
        raw: line.trim().to_owned(),
        acknowledged: false,
        ack_time: None,
    }
}
