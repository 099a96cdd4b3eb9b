//! Account-info archive extraction.
//!
//! The account export is a small ZIP holding JSON files with the donor's
//! group and contact lists. Two layouts exist in the wild: the current one
//! with `whatsapp_connections/groups.json` + `contacts.json`, and a legacy
//! one with a single JSON file keyed `groups`/`contacts`. Only the counts are
//! extracted — the lists themselves never leave the archive.

use std::path::Path;

use serde::Deserialize;

use crate::archive::{self, hidden_file_pattern};
use crate::diag::ParseLog;
use crate::error::Result;
use crate::i18n;
use crate::report::{Section, Table};

const GROUPS_ENTRY: &str = "whatsapp_connections/groups.json";
const CONTACTS_ENTRY: &str = "whatsapp_connections/contacts.json";

/// Extracted account summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub group_count: u64,
    pub contact_count: u64,
}

#[derive(Deserialize)]
struct GroupsFile {
    #[serde(default)]
    wa_groups: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ContactsFile {
    #[serde(default)]
    wa_contacts: Vec<serde_json::Value>,
}

/// Legacy single-file layout.
#[derive(Deserialize)]
struct LegacyAccountFile {
    #[serde(default)]
    groups: Vec<serde_json::Value>,
    #[serde(default)]
    contacts: Vec<serde_json::Value>,
}

/// Extract group and contact counts from an account-info archive.
///
/// Empty collections are diagnostics, not errors.
pub fn extract_account(path: &Path, log: &mut ParseLog) -> Result<AccountInfo> {
    let mut archive = archive::open_archive(path)?;
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let mut group_count: Option<u64> = None;
    let mut contact_count: Option<u64> = None;

    if names.iter().any(|n| n == GROUPS_ENTRY) {
        let bytes = archive::read_entry(&mut archive, path, GROUPS_ENTRY)?;
        match serde_json::from_slice::<GroupsFile>(&bytes) {
            Ok(file) => group_count = Some(file.wa_groups.len() as u64),
            Err(_) => log.push(format!("Could not parse: {GROUPS_ENTRY}")),
        }
    }
    if names.iter().any(|n| n == CONTACTS_ENTRY) {
        let bytes = archive::read_entry(&mut archive, path, CONTACTS_ENTRY)?;
        match serde_json::from_slice::<ContactsFile>(&bytes) {
            Ok(file) => contact_count = Some(file.wa_contacts.len() as u64),
            Err(_) => log.push(format!("Could not parse: {CONTACTS_ENTRY}")),
        }
    }

    // Legacy layout: one JSON file anywhere in the archive.
    if group_count.is_none() && contact_count.is_none() {
        match names
            .iter()
            .find(|n| !hidden_file_pattern().is_match(n) && n.ends_with(".json"))
        {
            Some(name) => {
                let name = name.clone();
                let bytes = archive::read_entry(&mut archive, path, &name)?;
                match serde_json::from_slice::<LegacyAccountFile>(&bytes) {
                    Ok(file) => {
                        group_count = Some(file.groups.len() as u64);
                        contact_count = Some(file.contacts.len() as u64);
                    }
                    Err(_) => log.push(format!("Could not parse: {name}")),
                }
            }
            None => log.push("No Json file is available"),
        }
    }

    let info = AccountInfo {
        group_count: group_count.unwrap_or(0),
        contact_count: contact_count.unwrap_or(0),
    };
    match (info.group_count, info.contact_count) {
        (0, 0) => log.push("Neither group nor contact is available"),
        (0, _) => log.push("No group is available"),
        (_, 0) => log.push("No contact is available"),
        _ => {}
    }
    Ok(info)
}

/// Shape the account summary into its result section.
pub fn account_section(info: &AccountInfo) -> Section {
    Section {
        id: "whatsapp_account_info".to_string(),
        title: i18n::account_title().to_string(),
        table: Table {
            columns: vec![
                i18n::col_groups().to_string(),
                i18n::col_contacts().to_string(),
            ],
            rows: vec![vec![
                info.group_count.to_string(),
                info.contact_count.to_string(),
            ]],
        },
    }
}
