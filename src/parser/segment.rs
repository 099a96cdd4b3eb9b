//! Chat text segmentation using a compiled header grammar.
//!
//! Headers are located with standard non-overlapping global match semantics;
//! the body of message *i* spans from the end of header *i* to the start of
//! header *i+1* (or the end of the text).

use chrono::{NaiveDate, NaiveDateTime};
use regex::Captures;

use super::grammar::CompiledGrammar;
use crate::model::message::{Message, RawMessage};

/// Segment `text` into messages using one compiled grammar.
///
/// Returns `None` when the grammar does not apply to this text: either no
/// header matches at all, or a matched header carries timestamp components
/// that do not form a valid calendar date. A grammar applies as soon as it
/// extracts at least one valid message.
pub fn segment(text: &str, grammar: &CompiledGrammar) -> Option<Vec<Message>> {
    let headers: Vec<Captures> = grammar.header().captures_iter(text).collect();
    if headers.is_empty() {
        return None;
    }

    let mut messages = Vec::with_capacity(headers.len());
    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0)?;
        let body_end = match headers.get(i + 1) {
            Some(next) => next.get(0)?.start(),
            None => text.len(),
        };
        let body = text[whole.end()..body_end].trim();
        let raw = raw_from_captures(caps, body)?;
        messages.push(resolve(raw)?);
    }
    Some(messages)
}

/// Build a [`RawMessage`] from one header match plus its body slice.
///
/// The digit groups cannot fail to parse; a `None` here means the grammar
/// lacks a required group and is treated as not applying.
fn raw_from_captures(caps: &Captures, body: &str) -> Option<RawMessage> {
    Some(RawMessage {
        year: caps.name("year")?.as_str().parse().ok()?,
        month: caps.name("month")?.as_str().parse().ok()?,
        day: caps.name("day")?.as_str().parse().ok()?,
        hour: caps.name("hour")?.as_str().parse().ok()?,
        minutes: caps.name("minutes")?.as_str().parse().ok()?,
        seconds: match caps.name("seconds") {
            Some(s) => Some(s.as_str().parse().ok()?),
            None => None,
        },
        ampm: caps.name("ampm").map(|m| m.as_str().to_string()),
        sender: caps.name("sender")?.as_str().to_string(),
        body: body.to_string(),
    })
}

/// Apply the date-resolution policy and produce a normalized [`Message`].
///
/// Policy:
/// - 12-hour time with am/pm marker: hour 12 + "am" → 0; hour ≠ 12 + "pm" →
///   hour + 12; otherwise unchanged.
/// - 2-digit year → year + 2000; longer years used as-is.
/// - Seconds absent from the grammar → 0.
///
/// Returns `None` when the components do not form a valid date, which rejects
/// the whole grammar for this text.
fn resolve(raw: RawMessage) -> Option<Message> {
    let hour = match &raw.ampm {
        Some(marker) => resolve_hour(raw.hour, marker),
        None => raw.hour,
    };

    // Exports from the 2000s write 2-digit years.
    let year = if raw.year < 100 {
        raw.year + 2000
    } else {
        raw.year
    };

    let timestamp = NaiveDate::from_ymd_opt(year, raw.month, raw.day)?.and_hms_opt(
        hour,
        raw.minutes,
        raw.seconds.unwrap_or(0),
    )?;

    Some(Message {
        timestamp,
        sender: raw.sender,
        body: raw.body,
    })
}

/// Convert a 12-hour clock reading to 24-hour.
///
/// The marker text is compared with punctuation and spacing removed, so
/// `"AM"`, `"a.m."` and `"p m"` all resolve.
fn resolve_hour(hour: u32, marker: &str) -> u32 {
    let mode: String = marker
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    match (hour, mode.as_str()) {
        (12, "am") => 0,
        (h, "pm") if h != 12 => h + 12,
        (h, _) => h,
    }
}

/// Reconstruct the source text from header matches and bodies.
///
/// Used by tests to check that segmentation is lossless up to whitespace
/// trimming around message bodies.
#[cfg(test)]
pub fn reconstruct(text: &str, grammar: &CompiledGrammar) -> String {
    let mut out = String::new();
    let headers: Vec<Captures> = grammar.header().captures_iter(text).collect();
    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let body_end = headers
            .get(i + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(text.len());
        out.push_str(whole.as_str());
        out.push_str(text[whole.end()..body_end].trim());
        out.push('\n');
    }
    out
}
