//! Per-participant feature summary derived from one chat.

use chrono::NaiveDateTime;

/// Aggregated features for one distinct sender in a chat.
///
/// Recomputed fully on each invocation; never persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParticipantFeatures {
    /// Sender name (or its anonymized label).
    pub sender: String,

    /// Number of messages sent.
    pub message_count: u64,

    /// Total number of whitespace-separated words across all messages.
    pub word_count: u64,

    /// Number of URLs shared.
    pub url_count: u64,

    /// Number of shared locations.
    pub location_count: u64,

    /// Number of attached files.
    pub file_count: u64,

    /// Timestamp of the sender's first message.
    pub first_message: NaiveDateTime,

    /// Timestamp of the sender's last message.
    pub last_message: NaiveDateTime,

    /// Total number of replies this sender made (reply-matrix row sum).
    pub out_degree: u64,

    /// Total number of replies this sender received (column sum).
    pub in_degree: u64,

    /// Who this sender replies to the most. `None` when the sender never
    /// directly followed anyone else's message.
    pub replies_to_most: Option<String>,

    /// Who replies to this sender the most. `None` when nobody ever
    /// directly followed this sender's message.
    pub replied_by_most: Option<String>,
}
