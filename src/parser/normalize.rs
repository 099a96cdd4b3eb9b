//! Post-segmentation cleanup of senders and message bodies.

use regex::Regex;

use crate::model::message::Message;

/// Bidirectional control characters that messaging apps append to sender
/// names when mixing scripts.
const BIDI_MARKS: &[char] = &[
    '\u{200e}', '\u{200f}', '\u{202a}', '\u{202b}', '\u{202c}', '\u{202d}', '\u{202e}',
];

/// Substrings that together identify the system notice opening a group
/// export. All of them must appear in the first message's body before any
/// removal happens.
const SYSTEM_MARKERS: &[&str] = &["end-to-end encrypted", "tap to learn more"];

/// Strip directionality control characters from both ends of every sender
/// name, in place.
pub fn clean_senders(messages: &mut [Message]) {
    for message in messages {
        message.sender = message.sender.trim_matches(BIDI_MARKS).to_string();
    }
}

/// Cut each message body at the first occurrence of the alert pattern.
///
/// Apps inject notices (encryption banners, missed-call markers) mid-message;
/// they start with the same timestamp prefix as a header, which is exactly
/// what `alert_pattern` matches. Returns the number of bodies cut, reported
/// by the caller as a diagnostic, never an error.
pub fn strip_alerts(messages: &mut [Message], alert_pattern: &Regex) -> usize {
    let mut removed = 0;
    for message in messages {
        let cut = alert_pattern.find(&message.body).map(|m| m.start());
        if let Some(start) = cut {
            message.body.truncate(start);
            let trimmed = message.body.trim_end().len();
            message.body.truncate(trimmed);
            removed += 1;
        }
    }
    removed
}

/// Drop the leading system-message block of a group export.
///
/// Conservative heuristic, triggered only by inspecting message index 0: when
/// the first message's body contains every marker in [`SYSTEM_MARKERS`], its
/// sender is taken to be the conversation identifier and the leading run of
/// messages attributed to that sender is removed. Returns the dropped count.
pub fn drop_leading_system_block(messages: &mut Vec<Message>) -> usize {
    let Some(first) = messages.first() else {
        return 0;
    };
    let body = first.body.to_lowercase();
    if !SYSTEM_MARKERS.iter().all(|marker| body.contains(marker)) {
        return 0;
    }

    let system_sender = first.sender.clone();
    let keep_from = messages
        .iter()
        .position(|m| m.sender != system_sender)
        .unwrap_or(messages.len());
    messages.drain(..keep_from);
    keep_from
}
