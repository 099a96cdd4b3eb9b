//! Per-file chat parsing: grammar trial, fallback, and normalization.

use tracing::debug;

use super::{fallback, grammar, normalize, segment};
use crate::diag::ParseLog;
use crate::model::message::Chat;

/// Parse one chat text into a normalized message table.
///
/// Every grammar in the Format Table is tried in order; the first one that
/// extracts at least one valid message wins. When none applies, the lossy
/// fallback segmenter runs. Returns `None` when even the fallback retains
/// nothing — the file contributes no messages and the caller moves on (the
/// hard-failure diagnostic is already in the log by then).
pub fn parse_chat(entry_name: &str, text: &str, log: &mut ParseLog) -> Option<Chat> {
    for pattern in grammar::HEADER_FORMATS {
        let compiled = match grammar::compile(pattern) {
            Ok(compiled) => compiled,
            Err(err) => {
                log.push(err.to_string());
                continue;
            }
        };

        let Some(mut messages) = segment::segment(text, &compiled) else {
            debug!(pattern = %pattern, entry = entry_name, "header format did not match");
            continue;
        };

        normalize::clean_senders(&mut messages);
        let alerts = normalize::strip_alerts(&mut messages, compiled.sender_boundary());
        if alerts > 0 {
            log.push(format!("Removed {alerts} alert notices in {entry_name}"));
        }
        let dropped = normalize::drop_leading_system_block(&mut messages);
        if dropped > 0 {
            log.push(format!(
                "Dropped {dropped} leading system messages in {entry_name}"
            ));
        }

        return Some(Chat {
            entry_name: entry_name.to_string(),
            messages,
        });
    }

    // No known dialect fits; fall back to the lossy line parser.
    let mut messages = fallback::segment_lossy(entry_name, text, log);
    if messages.is_empty() {
        return None;
    }
    normalize::clean_senders(&mut messages);
    let dropped = normalize::drop_leading_system_block(&mut messages);
    if dropped > 0 {
        log.push(format!(
            "Dropped {dropped} leading system messages in {entry_name}"
        ));
    }
    Some(Chat {
        entry_name: entry_name.to_string(),
        messages,
    })
}
