//! Reply graph over senders.
//!
//! A directed weighted graph where the edge A→B counts how often a message
//! from A immediately follows a message from B in the timeline — i.e. A
//! replied to B. Self-transitions (consecutive messages from the same sender)
//! never count.

use std::collections::BTreeMap;

use crate::model::message::Message;

/// Square adjacency table keyed by sender name on both axes.
///
/// Keys iterate in lexical order, which is also the tie-breaking order for
/// the max-relation queries. Read-only after construction.
#[derive(Debug)]
pub struct ReplyMatrix {
    /// `cells[replier][replied_to]` = number of direct successions.
    cells: BTreeMap<String, BTreeMap<String, u64>>,
}

impl ReplyMatrix {
    /// Build the matrix from an ordered message table.
    pub fn build(messages: &[Message]) -> Self {
        let mut cells: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

        // Square the table up front so every sender has a full row of zeros.
        let senders: Vec<&str> = {
            let set: std::collections::BTreeSet<&str> =
                messages.iter().map(|m| m.sender.as_str()).collect();
            set.into_iter().collect()
        };
        for row in &senders {
            let columns: BTreeMap<String, u64> =
                senders.iter().map(|s| (s.to_string(), 0)).collect();
            cells.insert(row.to_string(), columns);
        }

        for pair in messages.windows(2) {
            let receiver = &pair[0].sender;
            let sender = &pair[1].sender;
            if sender == receiver {
                continue;
            }
            if let Some(count) = cells
                .get_mut(sender)
                .and_then(|row| row.get_mut(receiver))
            {
                *count += 1;
            }
        }

        Self { cells }
    }

    /// Number of times `replier` directly followed `replied_to`.
    pub fn count(&self, replier: &str, replied_to: &str) -> u64 {
        self.cells
            .get(replier)
            .and_then(|row| row.get(replied_to))
            .copied()
            .unwrap_or(0)
    }

    /// Total replies made by `sender` (row sum).
    pub fn out_degree(&self, sender: &str) -> u64 {
        self.cells
            .get(sender)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Total replies received by `sender` (column sum).
    pub fn in_degree(&self, sender: &str) -> u64 {
        self.cells
            .values()
            .map(|row| row.get(sender).copied().unwrap_or(0))
            .sum()
    }

    /// Who `sender` replies to the most.
    ///
    /// Ties break toward the lexically smallest name; `None` when the sender
    /// never replied to anyone.
    pub fn replies_to_most(&self, sender: &str) -> Option<String> {
        let row = self.cells.get(sender)?;
        argmax(row.iter().map(|(name, count)| (name.as_str(), *count)))
    }

    /// Who replies to `sender` the most (column view).
    pub fn replied_by_most(&self, sender: &str) -> Option<String> {
        argmax(self.cells.iter().map(|(name, row)| {
            (
                name.as_str(),
                row.get(sender).copied().unwrap_or(0),
            )
        }))
    }
}

/// Largest-count name from `(name, count)` pairs in lexical order.
///
/// Strict comparison keeps the first (lexically smallest) name on ties;
/// all-zero input yields `None`.
fn argmax<'a>(pairs: impl Iterator<Item = (&'a str, u64)>) -> Option<String> {
    let mut best: Option<(&str, u64)> = None;
    for (name, count) in pairs {
        if count > 0 && best.map_or(true, |(_, max)| count > max) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}
