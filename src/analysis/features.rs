//! Per-participant feature aggregation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::reply_graph::ReplyMatrix;
use crate::model::features::ParticipantFeatures;
use crate::model::message::Chat;

/// URLs shared in a message body.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static pattern"));

/// Locations are shared as a `Location:` line pointing at a maps URL.
static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Location: https?://\S+").expect("static pattern"));

/// Attached files appear as `<attached: filename>` placeholders.
static ATTACH_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<attached: \S+>").expect("static pattern"));

/// Label given to the chosen donor after anonymization.
const DONOR_LABEL: &str = "you";

/// Running totals for one sender.
#[derive(Debug)]
struct Accumulator {
    messages: u64,
    words: u64,
    urls: u64,
    locations: u64,
    files: u64,
    first: NaiveDateTime,
    last: NaiveDateTime,
}

/// Aggregate one chat into per-sender feature records, in lexical sender
/// order, each left-joined with its two reply relations.
///
/// A sender with no incoming or outgoing transitions still receives a record
/// with zero degrees and `None` reply relations.
pub fn participant_features(chat: &Chat) -> Vec<ParticipantFeatures> {
    let mut accumulators: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for message in &chat.messages {
        let entry = accumulators
            .entry(message.sender.as_str())
            .or_insert_with(|| Accumulator {
                messages: 0,
                words: 0,
                urls: 0,
                locations: 0,
                files: 0,
                first: message.timestamp,
                last: message.timestamp,
            });
        entry.messages += 1;
        entry.words += message.body.split_whitespace().count() as u64;
        entry.urls += URL_RE.find_iter(&message.body).count() as u64;
        entry.locations += LOCATION_RE.find_iter(&message.body).count() as u64;
        entry.files += ATTACH_FILE_RE.find_iter(&message.body).count() as u64;
        if message.timestamp < entry.first {
            entry.first = message.timestamp;
        }
        if message.timestamp > entry.last {
            entry.last = message.timestamp;
        }
    }

    let matrix = ReplyMatrix::build(&chat.messages);

    accumulators
        .into_iter()
        .map(|(sender, acc)| ParticipantFeatures {
            sender: sender.to_string(),
            message_count: acc.messages,
            word_count: acc.words,
            url_count: acc.urls,
            location_count: acc.locations,
            file_count: acc.files,
            first_message: acc.first,
            last_message: acc.last,
            out_degree: matrix.out_degree(sender),
            in_degree: matrix.in_degree(sender),
            replies_to_most: matrix.replies_to_most(sender),
            replied_by_most: matrix.replied_by_most(sender),
        })
        .collect()
}

/// Anonymize participant records for publication.
///
/// Every sender name appearing in the name or reply-relation columns is
/// factorized to `person1`, `person2`, … in first-appearance order, with the
/// same mapping applied to all three columns. The chosen donor, when given,
/// is labeled `you` instead.
pub fn anonymize(features: &mut [ParticipantFeatures], donor: Option<&str>) {
    let mut mapping: BTreeMap<String, String> = BTreeMap::new();
    let mut next_person = 1usize;

    let mut label_for = |name: &str| -> String {
        if donor == Some(name) {
            return DONOR_LABEL.to_string();
        }
        if let Some(label) = mapping.get(name) {
            return label.clone();
        }
        let label = format!("person{next_person}");
        next_person += 1;
        mapping.insert(name.to_string(), label.clone());
        label
    };

    for record in features.iter_mut() {
        record.sender = label_for(&record.sender);
        if let Some(target) = record.replies_to_most.take() {
            record.replies_to_most = Some(label_for(&target));
        }
        if let Some(target) = record.replied_by_most.take() {
            record.replied_by_most = Some(label_for(&target));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::Message;
    use chrono::NaiveDate;

    fn msg(minute: u32, sender: &str, body: &str) -> Message {
        Message {
            timestamp: NaiveDate::from_ymd_opt(2021, 1, 2)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            sender: sender.to_string(),
            body: body.to_string(),
        }
    }

    fn chat(messages: Vec<Message>) -> Chat {
        Chat {
            entry_name: "chat.txt".to_string(),
            messages,
        }
    }

    #[test]
    fn test_counts_per_sender() {
        let chat = chat(vec![
            msg(0, "Alice", "hello"),
            msg(5, "Bob", "hi Alice"),
            msg(7, "Alice", "check https://example.com and https://example.org"),
        ]);
        let features = participant_features(&chat);
        assert_eq!(features.len(), 2);

        let alice = &features[0];
        assert_eq!(alice.sender, "Alice");
        assert_eq!(alice.message_count, 2);
        assert_eq!(alice.word_count, 5);
        assert_eq!(alice.url_count, 2);

        let bob = &features[1];
        assert_eq!(bob.sender, "Bob");
        assert_eq!(bob.message_count, 1);
        assert_eq!(bob.word_count, 2);
    }

    #[test]
    fn test_location_and_attachment_counts() {
        let chat = chat(vec![
            msg(0, "Alice", "Location: https://maps.example.com/?q=1,2"),
            msg(1, "Alice", "<attached: IMG_0001.jpg>"),
        ]);
        let features = participant_features(&chat);
        // The location line is also a URL; both scans are independent.
        assert_eq!(features[0].location_count, 1);
        assert_eq!(features[0].url_count, 1);
        assert_eq!(features[0].file_count, 1);
    }

    #[test]
    fn test_first_and_last_timestamps() {
        let chat = chat(vec![
            msg(0, "Alice", "first"),
            msg(30, "Alice", "last"),
            msg(15, "Alice", "middle"),
        ]);
        let features = participant_features(&chat);
        assert_eq!(features[0].first_message.format("%M").to_string(), "00");
        assert_eq!(features[0].last_message.format("%M").to_string(), "30");
    }

    #[test]
    fn test_reply_relations_joined() {
        let chat = chat(vec![
            msg(0, "Alice", "hello"),
            msg(5, "Bob", "hi Alice"),
        ]);
        let features = participant_features(&chat);
        let alice = &features[0];
        assert_eq!(alice.replies_to_most, None);
        assert_eq!(alice.replied_by_most.as_deref(), Some("Bob"));
        let bob = &features[1];
        assert_eq!(bob.replies_to_most.as_deref(), Some("Alice"));
        assert_eq!(bob.out_degree, 1);
        assert_eq!(bob.in_degree, 0);
    }

    #[test]
    fn test_anonymize_is_consistent_across_columns() {
        let chat = chat(vec![
            msg(0, "Alice", "hello"),
            msg(5, "Bob", "hi"),
            msg(6, "Carol", "hey"),
        ]);
        let mut features = participant_features(&chat);
        anonymize(&mut features, None);

        assert_eq!(features[0].sender, "person1"); // Alice
        assert_eq!(features[1].sender, "person2"); // Bob
        assert_eq!(features[2].sender, "person3"); // Carol
        // Bob replied to Alice; the mapping must agree with the name column.
        assert_eq!(features[1].replies_to_most.as_deref(), Some("person1"));
    }

    #[test]
    fn test_anonymize_labels_donor() {
        let chat = chat(vec![msg(0, "Alice", "hello"), msg(5, "Bob", "hi")]);
        let mut features = participant_features(&chat);
        anonymize(&mut features, Some("Bob"));
        assert_eq!(features[0].sender, "person1");
        assert_eq!(features[1].sender, "you");
        assert_eq!(features[0].replied_by_most.as_deref(), Some("you"));
    }
}
