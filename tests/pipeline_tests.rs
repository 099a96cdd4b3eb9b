//! End-to-end tests for the chat extraction pipeline: archive walking,
//! segmentation, normalization, aggregation, and the result contract.

use std::io::Write;
use std::path::Path;

use donorlens::analysis::reply_graph::ReplyMatrix;
use donorlens::report::EXTRACTION_LOG_ID;
use donorlens::session::{process_chat_archive, ChatSession, ExtractOptions};

fn write_zip(dir: &Path, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
    let path = dir.join("export.zip");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
    path
}

// ─── Test 1: End-to-end example from two known lines ────────────────

#[test]
fn test_two_line_chat_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_zip(
        tmp.path(),
        &[(
            "whatsapp_chat.txt",
            b"1/2/21, 09:00 - Alice: hello\n1/2/21, 09:05 - Bob: hi Alice\n".as_slice(),
        )],
    );

    let session = ChatSession::begin(&path).unwrap();
    assert_eq!(session.candidate_senders(), vec!["Alice", "Bob"]);

    let sections = session.finish(None, &ExtractOptions::default());
    assert_eq!(sections.len(), 1, "no diagnostics expected: {sections:?}");
    let table = &sections[0].table;
    assert_eq!(table.rows.len(), 2);

    // username, message_no, total_words_no ...
    assert_eq!(table.rows[0][0], "Alice");
    assert_eq!(table.rows[0][1], "1");
    assert_eq!(table.rows[0][2], "1");
    assert_eq!(table.rows[1][0], "Bob");
    assert_eq!(table.rows[1][2], "2");
}

// ─── Test 2: Reply matrix from the same archive ─────────────────────

#[test]
fn test_reply_matrix_from_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_zip(
        tmp.path(),
        &[(
            "whatsapp_chat.txt",
            b"1/2/21, 09:00 - Alice: hello\n1/2/21, 09:05 - Bob: hi Alice\n".as_slice(),
        )],
    );
    let session = ChatSession::begin(&path).unwrap();
    let sections = session.finish(None, &ExtractOptions::default());

    // Bob replied to Alice once: out_degree 1, and Alice was replied to once.
    let rows = &sections[0].table.rows;
    let bob = rows.iter().find(|r| r[0] == "Bob").unwrap();
    assert_eq!(bob[8], "1", "Bob's out_degree");
    assert_eq!(bob[10], "Alice", "Bob replies to Alice the most");
    let alice = rows.iter().find(|r| r[0] == "Alice").unwrap();
    assert_eq!(alice[9], "1", "Alice's in_degree");
    assert_eq!(alice[11], "Bob", "Alice is replied to by Bob the most");
}

// ─── Test 3: Decode failure isolation ───────────────────────────────

#[test]
fn test_decode_failure_is_isolated_to_one_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_zip(
        tmp.path(),
        &[
            (
                "good/whatsapp_chat.txt",
                b"1/2/21, 09:00 - Alice: hello\n".as_slice(),
            ),
            ("bad/whatsapp_chat.txt", b"\xc3\x28 broken \xff".as_slice()),
        ],
    );

    let session = ChatSession::begin(&path).unwrap();
    assert_eq!(session.candidate_senders(), vec!["Alice"]);

    let diagnostics: Vec<String> = session.log().lines().map(String::from).collect();
    assert_eq!(diagnostics.len(), 1, "exactly one diagnostic: {diagnostics:?}");
    assert!(diagnostics[0].contains("bad/whatsapp_chat.txt"));
    assert!(diagnostics[0].contains("utf-8"));

    // The log surfaces as the trailing section.
    let sections = session.finish(None, &ExtractOptions::default());
    assert_eq!(sections.len(), 2);
    assert_eq!(sections.last().unwrap().id, EXTRACTION_LOG_ID);
}

// ─── Test 4: Fallback segmentation through the full pipeline ────────

#[test]
fn test_fallback_still_extracts_messages() {
    let tmp = tempfile::tempdir().unwrap();
    // Dotted dates match no Format Table grammar but fit the loose shape.
    let path = write_zip(
        tmp.path(),
        &[(
            "whatsapp_chat.txt",
            b"[02.01.21 09:00] Alice: hello\nstray continuation line\n".as_slice(),
        )],
    );

    let session = ChatSession::begin(&path).unwrap();
    assert_eq!(session.candidate_senders(), vec!["Alice"]);
    assert!(
        session.log().lines().any(|l| l.contains("1 lines")),
        "expected an unprocessed-line diagnostic"
    );
}

// ─── Test 5: Invalid input yields a log-only result ─────────────────

#[test]
fn test_invalid_input_is_log_only() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("holiday.jpg");
    std::fs::write(&path, b"\x89PNG not really").unwrap();

    let sections = process_chat_archive(&path, None, &ExtractOptions::default());
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].id, EXTRACTION_LOG_ID);
    assert!(!sections[0].table.rows.is_empty());
}

// ─── Test 6: Idempotence ────────────────────────────────────────────

#[test]
fn test_pipeline_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_zip(
        tmp.path(),
        &[(
            "whatsapp_chat.txt",
            b"1/2/21, 09:00 - Alice: hello https://example.com\n\
              1/2/21, 09:05 - Bob: hi Alice\n\
              1/2/21, 09:07 - Alice: <attached: IMG_1.jpg>\n"
                .as_slice(),
        )],
    );

    let run = || {
        let sections = process_chat_archive(&path, None, &ExtractOptions::default());
        serde_json::to_value(&sections).unwrap()
    };
    assert_eq!(run(), run());
}

// ─── Test 7: Anonymization with a chosen donor ──────────────────────

#[test]
fn test_anonymized_donor_labeling() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_zip(
        tmp.path(),
        &[(
            "whatsapp_chat.txt",
            b"1/2/21, 09:00 - Alice: hello\n1/2/21, 09:05 - Bob: hi Alice\n".as_slice(),
        )],
    );
    let options = ExtractOptions { anonymize: true };
    let sections = process_chat_archive(&path, Some("Bob"), &options);
    let rows = &sections[0].table.rows;
    let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert!(names.contains(&"you"));
    assert!(names.contains(&"person1"));
    assert!(!names.contains(&"Bob"));
}

// ─── Test 8: Segmentation count property on raw text ────────────────

#[test]
fn test_reply_matrix_transition_property() {
    use chrono::NaiveDate;
    use donorlens::model::message::Message;

    let messages: Vec<Message> = ["A", "B", "B", "A", "C"]
        .iter()
        .enumerate()
        .map(|(i, sender)| Message {
            timestamp: NaiveDate::from_ymd_opt(2021, 1, 2)
                .unwrap()
                .and_hms_opt(9, i as u32, 0)
                .unwrap(),
            sender: sender.to_string(),
            body: "x".to_string(),
        })
        .collect();

    let matrix = ReplyMatrix::build(&messages);
    assert_eq!(matrix.count("B", "A"), 1);
    assert_eq!(matrix.count("A", "B"), 1);
    assert_eq!(matrix.count("C", "A"), 1);
    // Self-transitions never increment any cell.
    assert_eq!(matrix.count("B", "B"), 0);
    assert_eq!(matrix.out_degree("B"), 1);
}

// ─── Test 9: Plain text file instead of an archive ──────────────────

#[test]
fn test_plain_text_chat_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("whatsapp_chat.txt");
    std::fs::write(&path, "1/2/21, 09:00 - Alice: hello\n").unwrap();

    let session = ChatSession::begin(&path).unwrap();
    let sections = session.finish(None, &ExtractOptions::default());
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].table.rows.len(), 1);
    assert_eq!(sections[0].table.rows[0][0], "Alice");
}

// ─── Test 10: Word and URL counts survive aggregation ───────────────

#[test]
fn test_feature_counts_from_parsed_chat() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_zip(
        tmp.path(),
        &[(
            "whatsapp_chat.txt",
            b"1/2/21, 09:00 - Alice: look https://example.com\n\
              1/2/21, 09:01 - Alice: Location: https://maps.example.com/?q=0,0\n"
                .as_slice(),
        )],
    );
    let session = ChatSession::begin(&path).unwrap();

    // Reach into the parsed chat via the feature API for exact numbers.
    let sections = session.finish(None, &ExtractOptions::default());
    let row = &sections[0].table.rows[0];
    assert_eq!(row[0], "Alice");
    assert_eq!(row[3], "2", "url_no counts both URLs");
    assert_eq!(row[4], "1", "location_no counts the shared location");
}
