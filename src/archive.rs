//! Archive walking: entry filtering, decoding, and the archive-or-plain-text
//! input duality.
//!
//! Donor exports usually arrive as ZIP files, but several apps hand out a
//! bare text file instead — both are first-class inputs. Per-entry failures
//! (undecodable bytes, unreadable entries) are logged and skipped; the walk
//! itself never aborts.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use regex::Regex;
use tracing::debug;
use zip::ZipArchive;

use crate::diag::ParseLog;
use crate::error::{ExtractError, Result};

/// Entry-name pattern for chat text files.
pub const CHAT_FILE_PATTERN: &str = r".*chat.*\.txt$";

/// Platform metadata artifacts skipped unconditionally.
pub const HIDDEN_FILE_PATTERN: &str = r".*__MACOSX.*";

/// Compiled form of [`CHAT_FILE_PATTERN`].
pub fn chat_file_pattern() -> &'static Regex {
    static RE: std::sync::LazyLock<Regex> =
        std::sync::LazyLock::new(|| Regex::new(CHAT_FILE_PATTERN).expect("static pattern"));
    &RE
}

/// Compiled form of [`HIDDEN_FILE_PATTERN`].
pub fn hidden_file_pattern() -> &'static Regex {
    static RE: std::sync::LazyLock<Regex> =
        std::sync::LazyLock::new(|| Regex::new(HIDDEN_FILE_PATTERN).expect("static pattern"));
    &RE
}

/// One decoded text entry from the walk.
#[derive(Debug)]
pub struct WalkedEntry {
    /// Archive entry name (or file name for plain-text input).
    pub name: String,
    /// Entry contents decoded as UTF-8.
    pub text: String,
}

/// Walk an archive (or a single plain-text file) and decode the entries whose
/// names match `name_pattern`.
///
/// Entries matching `hidden_pattern` are skipped unconditionally; entries
/// whose bytes are not valid UTF-8 are logged and skipped. When `path` is not
/// an openable archive but its own name matches `name_pattern`, the whole
/// file is returned as a single entry. When it is neither, the invocation
/// fails with [`ExtractError::InvalidInput`].
pub fn walk_text(
    path: &Path,
    name_pattern: &Regex,
    hidden_pattern: &Regex,
    log: &mut ParseLog,
) -> Result<Vec<WalkedEntry>> {
    let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;

    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "not a ZIP archive");
            return walk_plain_text(path, name_pattern, log);
        }
    };

    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                log.push(format!("Could not read archive entry #{index}: {err}"));
                continue;
            }
        };
        let name = entry.name().to_string();
        if hidden_pattern.is_match(&name) || !name_pattern.is_match(&name) {
            continue;
        }

        let mut bytes = Vec::new();
        if let Err(err) = entry.read_to_end(&mut bytes) {
            log.push(format!("Could not read archive entry '{name}': {err}"));
            continue;
        }
        if let Some(text) = decode_utf8(&bytes, &name, log) {
            entries.push(WalkedEntry { name, text });
        }
    }
    Ok(entries)
}

/// The plain-text branch of the input duality.
fn walk_plain_text(
    path: &Path,
    name_pattern: &Regex,
    log: &mut ParseLog,
) -> Result<Vec<WalkedEntry>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !name_pattern.is_match(&name) {
        return Err(ExtractError::InvalidInput(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    Ok(match decode_utf8(&bytes, &name, log) {
        Some(text) => vec![WalkedEntry { name, text }],
        None => Vec::new(),
    })
}

/// Open an archive for the JSON extractors.
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;
    ZipArchive::new(file).map_err(|source| ExtractError::Archive {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one entry's bytes by name.
pub fn read_entry(archive: &mut ZipArchive<File>, path: &Path, name: &str) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .map_err(|source| ExtractError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::io(path, e))?;
    Ok(bytes)
}

/// Decode bytes as strict UTF-8, tolerating a leading UTF-8 BOM.
///
/// No BOM sniffing into other encodings — a UTF-16 export is a decode
/// failure, not a silently different text. Decode failures are diagnostics,
/// not errors: the entry is skipped and the walk continues.
fn decode_utf8(bytes: &[u8], name: &str, log: &mut ParseLog) -> Option<String> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        log.push(
            ExtractError::Decode {
                entry: name.to_string(),
            }
            .to_string(),
        );
        return None;
    }
    Some(text.into_owned())
}
