//! The donor-identity extraction session.
//!
//! Donor studies need one round-trip in the middle of an extraction: the
//! archive is parsed, the candidate sender names are shown to the donor, and
//! the extraction completes once the donor has picked their own name. That
//! suspend/resume point is modeled as an explicit two-call protocol — the
//! caller holds the [`ChatSession`] between `begin` and `finish`.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::analysis::features::{anonymize, participant_features};
use crate::archive;
use crate::diag::ParseLog;
use crate::error::Result;
use crate::model::message::Chat;
use crate::parser::chat::parse_chat;
use crate::prompt::{sender_choice_prompt, PromptRequest};
use crate::report::{features_section, finish_sections, log_section, Section};

/// Options for the feature-extraction step.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Replace sender names with `person1..` labels (donor becomes `you`).
    pub anonymize: bool,
}

/// An extraction suspended between parsing and feature aggregation.
#[derive(Debug)]
pub struct ChatSession {
    chats: Vec<Chat>,
    log: ParseLog,
}

impl ChatSession {
    /// Parse the archive and collect the candidate sender names.
    ///
    /// Fatal errors (an invalid input format, I/O on the input itself)
    /// surface here; everything recoverable lands in the session log instead.
    pub fn begin(path: &Path) -> Result<Self> {
        let mut log = ParseLog::new();
        let entries = archive::walk_text(
            path,
            archive::chat_file_pattern(),
            archive::hidden_file_pattern(),
            &mut log,
        )?;

        let mut chats = Vec::new();
        for entry in &entries {
            if let Some(chat) = parse_chat(&entry.name, &entry.text, &mut log) {
                info!(
                    entry = %entry.name,
                    messages = chat.messages.len(),
                    "parsed chat file"
                );
                chats.push(chat);
            }
        }
        if chats.is_empty() {
            log.push("No valid chat file is available");
        }

        Ok(Self { chats, log })
    }

    /// Candidate sender names across all parsed chats, lexically ordered.
    pub fn candidate_senders(&self) -> Vec<String> {
        let mut senders = BTreeSet::new();
        for chat in &self.chats {
            senders.extend(chat.senders());
        }
        senders.into_iter().collect()
    }

    /// The step-2 prompt request for this session's candidates.
    pub fn sender_prompt(&self) -> PromptRequest {
        sender_choice_prompt(self.candidate_senders())
    }

    /// Read access to the diagnostics recorded so far.
    pub fn log(&self) -> &ParseLog {
        &self.log
    }

    /// Complete the extraction with the donor's answer.
    ///
    /// `donor` is the sender the donor identified as (ignored when unknown).
    /// Returns one overview section per parsed chat file plus, when any
    /// diagnostic was recorded, the trailing extraction log.
    pub fn finish(self, donor: Option<&str>, options: &ExtractOptions) -> Vec<Section> {
        let mut sections = Vec::with_capacity(self.chats.len() + 1);
        for chat in &self.chats {
            let mut features = participant_features(chat);
            if options.anonymize {
                features.sort_by(|a, b| a.sender.cmp(&b.sender));
                anonymize(&mut features, donor);
            }
            sections.push(features_section(&features));
        }
        finish_sections(sections, &self.log)
    }
}

/// One-shot convenience wrapper around the two-call protocol.
///
/// Fatal input errors are folded into a log-only result, matching the
/// contract that an invocation never crashes on malformed donor data.
pub fn process_chat_archive(
    path: &Path,
    donor: Option<&str>,
    options: &ExtractOptions,
) -> Vec<Section> {
    match ChatSession::begin(path) {
        Ok(session) => session.finish(donor, options),
        Err(err) => {
            let mut log = ParseLog::new();
            log.push(err.to_string());
            vec![log_section(&log)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn chat_zip(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("whatsapp_chat.txt", options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        writer.finish().unwrap();
        file
    }

    #[test]
    fn test_begin_collects_candidates() {
        let zip = chat_zip("1/2/21, 09:00 - Alice: hello\n1/2/21, 09:05 - Bob: hi Alice\n");
        let session = ChatSession::begin(zip.path()).unwrap();
        assert_eq!(session.candidate_senders(), vec!["Alice", "Bob"]);
        assert!(session.log().is_empty());
    }

    #[test]
    fn test_finish_produces_overview_sections() {
        let zip = chat_zip("1/2/21, 09:00 - Alice: hello\n1/2/21, 09:05 - Bob: hi Alice\n");
        let session = ChatSession::begin(zip.path()).unwrap();
        let sections = session.finish(None, &ExtractOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "overview");
        assert_eq!(sections[0].table.rows.len(), 2);
    }

    #[test]
    fn test_invalid_input_yields_log_only_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.dat");
        std::fs::write(&path, "not an archive").unwrap();
        let sections = process_chat_archive(&path, None, &ExtractOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, crate::report::EXTRACTION_LOG_ID);
        assert_eq!(sections[0].table.rows.len(), 1);
    }

    #[test]
    fn test_empty_archive_logs_no_valid_chat() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("readme.md", options).unwrap();
        writer.write_all(b"nothing here").unwrap();
        writer.finish().unwrap();

        let session = ChatSession::begin(file.path()).unwrap();
        assert!(session.candidate_senders().is_empty());
        let sections = session.finish(None, &ExtractOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, crate::report::EXTRACTION_LOG_ID);
    }
}
