//! Message types produced by segmentation and normalization.

use chrono::NaiveDateTime;

/// One header match before normalization: the captured timestamp components,
/// the raw sender text, and the body slice between this header and the next.
///
/// Ephemeral: produced per matched header and consumed immediately by
/// normalization. Timestamp components are kept as captured (2-digit years,
/// 12-hour hours) so the resolution policy lives in one place.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minutes: u32,
    /// `None` when the grammar has no seconds placeholder.
    pub seconds: Option<u32>,
    /// Raw am/pm marker text, when the grammar carries one.
    pub ampm: Option<String>,
    /// Sender name exactly as captured (bidi marks intact).
    pub sender: String,
    /// Body text, already trimmed of surrounding whitespace.
    pub body: String,
}

/// A single normalized chat message.
///
/// Chat exports carry no timezone in any known dialect, so timestamps are
/// zone-naive. Messages keep their source order and are never re-sorted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Message {
    /// Absolute timestamp after the date-resolution policy has been applied.
    pub timestamp: NaiveDateTime,
    /// Sender name with directionality control characters stripped.
    pub sender: String,
    /// Message body with trailing app-injected alert text removed.
    pub body: String,
}

/// The parsed message table of one archive entry.
#[derive(Debug, Clone)]
pub struct Chat {
    /// Archive entry name (or file name for plain-text input).
    pub entry_name: String,
    /// Messages in source order.
    pub messages: Vec<Message>,
}

impl Chat {
    /// Distinct sender names in lexical order.
    pub fn senders(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|m| m.sender.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
