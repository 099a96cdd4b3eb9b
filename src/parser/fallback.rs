//! Lossy line-based segmentation, used when no known header grammar applies.
//!
//! Each physical line is tried against the loose shape
//! `<timestamp><sep><sender>: <message>` where `<sep>` is `"] "` or `" - "`.
//! Lines that do not fit (continuations of a previous message, system notices,
//! corrupt fragments) are dropped, and the drop count is reported as a
//! diagnostic rather than an error.

use chrono::NaiveDateTime;

use crate::diag::ParseLog;
use crate::error::ExtractError;
use crate::model::message::Message;

/// Separators between the timestamp prefix and the sender, in trial order.
const SEPARATORS: &[&str] = &["] ", " - "];

/// Timestamp formats tried against the cleaned prefix, in order.
///
/// Covers the day-first and month-first dialects seen across locales, with
/// and without seconds, 2- and 4-digit years, and 12-hour clocks.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%m/%d/%y %I:%M %p",
    "%d/%m/%y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %I:%M:%S %p",
];

/// Characters stripped from the timestamp prefix before date parsing:
/// brackets and commas left over from the line shape, plus the bidirectional
/// control characters messaging apps inject around numbers.
fn is_noise_char(c: char) -> bool {
    matches!(
        c,
        '[' | ']' | ','
            | '\u{200e}'
            | '\u{200f}'
            | '\u{202a}'
            | '\u{202b}'
            | '\u{202c}'
            | '\u{202d}'
            | '\u{202e}'
    )
}

/// Segment `text` line by line with the loose pattern.
///
/// Returns the retained messages (possibly empty). Diagnostics: the number of
/// unprocessed lines when any were dropped, and a hard-failure line when
/// nothing at all was retained.
pub fn segment_lossy(entry_name: &str, text: &str, log: &mut ParseLog) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut total_lines = 0usize;

    for line in text.lines() {
        total_lines += 1;
        if let Some(message) = parse_line(line) {
            messages.push(message);
        }
    }

    let dropped = total_lines - messages.len();
    if messages.is_empty() {
        log.push(format!("{}: {entry_name}", ExtractError::NoMatch));
        return messages;
    }
    if dropped > 0 {
        log.push(format!(
            "Could not process {dropped} lines in {entry_name}"
        ));
    }
    messages
}

/// Try the loose shape on one line.
fn parse_line(line: &str) -> Option<Message> {
    for sep in SEPARATORS {
        let Some(sep_pos) = line.find(sep) else {
            continue;
        };
        let prefix = &line[..sep_pos];
        let rest = &line[sep_pos + sep.len()..];

        let Some(colon) = rest.find(": ") else {
            continue;
        };
        let sender = rest[..colon].trim();
        let body = rest[colon + 2..].trim();
        if sender.is_empty() {
            continue;
        }

        let cleaned: String = prefix.chars().filter(|c| !is_noise_char(*c)).collect();
        if let Some(timestamp) = parse_loose_timestamp(cleaned.trim()) {
            return Some(Message {
                timestamp,
                sender: sender.to_string(),
                body: body.to_string(),
            });
        }
    }
    None
}

/// Parse a timestamp of unknown dialect by trying each known format.
fn parse_loose_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}
