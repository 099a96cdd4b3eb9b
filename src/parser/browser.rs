//! Browser history extraction.
//!
//! Reads `BrowserHistory.json` from a takeout archive and counts page visits
//! per site category (news vs. other), per study period (before/during/after
//! a configured reference window), and per time of day. Reload transitions
//! are ignored so refreshing a page does not inflate the counts.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Deserialize;

use crate::archive;
use crate::diag::ParseLog;
use crate::error::Result;
use crate::i18n;
use crate::report::{Section, Table};

const HISTORY_ENTRY: &str = "BrowserHistory.json";

/// Study window and site list for the visit bucketing.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserWindow {
    /// Sites counted as news; joined into one alternation pattern.
    pub news_sites: Vec<String>,
    /// Start of the reference period (local time).
    pub window_start: NaiveDateTime,
    /// End of the reference period (local time).
    pub window_end: NaiveDateTime,
    /// Fixed offset applied to the exported UTC epochs.
    pub utc_offset_hours: i64,
}

impl Default for BrowserWindow {
    fn default() -> Self {
        Self {
            news_sites: [
                "news.google.com",
                "nieuws.nl",
                "nos.nl",
                "www.rtlnieuws.nl",
                "nu.nl",
                "at5.nl",
                "ad.nl",
                "bd.nl",
                "telegraaf.nl",
                "volkskrant.nl",
                "parool.nl",
                "metronieuws.nl",
                "nd.nl",
                "nrc.nl",
                "rd.nl",
                "trouw.nl",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            window_start: NaiveDate::from_ymd_opt(2021, 1, 23)
                .expect("static date")
                .and_hms_opt(21, 0, 0)
                .expect("static time"),
            window_end: NaiveDate::from_ymd_opt(2021, 4, 28)
                .expect("static date")
                .and_hms_opt(4, 30, 0)
                .expect("static time"),
            utc_offset_hours: 1,
        }
    }
}

#[derive(Deserialize)]
struct BrowserHistory {
    #[serde(rename = "Browser History", default)]
    visits: Vec<Visit>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Visit {
    page_transition: String,
    url: String,
    time_usec: i64,
}

/// Visit counts per time of day.
#[derive(Debug, Default, Clone, Copy)]
struct DayParts {
    night: u64,
    morning: u64,
    afternoon: u64,
    evening: u64,
}

impl DayParts {
    fn add(&mut self, timestamp: NaiveDateTime) {
        use chrono::Timelike;
        match timestamp.hour() {
            0..=5 => self.night += 1,
            6..=11 => self.morning += 1,
            12..=17 => self.afternoon += 1,
            _ => self.evening += 1,
        }
    }
}

const PERIODS: &[&str] = &["before", "during", "after"];
const CATEGORIES: &[&str] = &["news", "other"];

/// Extract the visit summary from a browser history archive.
pub fn extract_browser(
    path: &Path,
    window: &BrowserWindow,
    log: &mut ParseLog,
) -> Result<Vec<Section>> {
    let mut archive = archive::open_archive(path)?;
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let Some(name) = names.iter().find(|n| n.contains(HISTORY_ENTRY)) else {
        log.push(format!("Could not find {HISTORY_ENTRY}"));
        return Ok(Vec::new());
    };
    let name = name.clone();
    let bytes = archive::read_entry(&mut archive, path, &name)?;
    let history: BrowserHistory = match serde_json::from_slice(&bytes) {
        Ok(history) => history,
        Err(_) => {
            log.push(format!("Could not parse: {name}"));
            return Ok(Vec::new());
        }
    };

    let news_pattern = match Regex::new(&window.news_sites.join("|")) {
        Ok(pattern) => pattern,
        Err(_) => {
            log.push("Invalid news site list in configuration");
            return Ok(Vec::new());
        }
    };

    let mut buckets: BTreeMap<(&str, &str), DayParts> = BTreeMap::new();
    let mut counted = 0u64;
    for visit in &history.visits {
        if visit.page_transition.eq_ignore_ascii_case("reload") {
            continue;
        }
        let Some(timestamp) = local_time(visit.time_usec, window.utc_offset_hours) else {
            continue;
        };
        let period = if timestamp < window.window_start {
            "before"
        } else if timestamp > window.window_end {
            "after"
        } else {
            "during"
        };
        let category = if news_pattern.is_match(&visit.url) {
            "news"
        } else {
            "other"
        };
        buckets.entry((period, category)).or_default().add(timestamp);
        counted += 1;
    }

    if counted == 0 {
        log.push("No page visits found in the browser history");
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for period in PERIODS {
        for category in CATEGORIES {
            let parts = buckets
                .get(&(*period, *category))
                .copied()
                .unwrap_or_default();
            rows.push(vec![
                period.to_string(),
                category.to_string(),
                parts.morning.to_string(),
                parts.afternoon.to_string(),
                parts.evening.to_string(),
                parts.night.to_string(),
            ]);
        }
    }

    Ok(vec![Section {
        id: "browser_history".to_string(),
        title: i18n::browser_title().to_string(),
        table: Table {
            columns: ["Period", "Website", "morning", "afternoon", "evening", "night"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows,
        },
    }])
}

/// Convert a microsecond UTC epoch to naive local time at a fixed offset.
fn local_time(time_usec: i64, offset_hours: i64) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp_micros(time_usec)?;
    Some(utc.naive_utc() + Duration::hours(offset_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn usec(y: i32, mo: u32, d: u32, h: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_micros()
    }

    fn zip_with(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer
            .start_file("Takeout/Chrome/BrowserHistory.json", options)
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        writer.finish().unwrap();
        file
    }

    fn history_json(visits: &[(&str, &str, i64)]) -> String {
        let items: Vec<String> = visits
            .iter()
            .map(|(transition, url, t)| {
                format!(
                    r#"{{"page_transition": "{transition}", "url": "{url}", "time_usec": {t}}}"#
                )
            })
            .collect();
        format!(r#"{{"Browser History": [{}]}}"#, items.join(","))
    }

    #[test]
    fn test_bucketing_and_reload_filter() {
        // 08:00 UTC + 1h offset = 09:00 local → morning, before the window.
        let json = history_json(&[
            ("LINK", "https://nos.nl/artikel/1", usec(2020, 6, 1, 8)),
            ("RELOAD", "https://nos.nl/artikel/1", usec(2020, 6, 1, 8)),
            ("LINK", "https://example.com/", usec(2021, 2, 1, 20)),
        ]);
        let zip = zip_with(&json);
        let mut log = ParseLog::new();
        let window = BrowserWindow::default();
        let sections = extract_browser(zip.path(), &window, &mut log).unwrap();
        assert!(log.is_empty());
        assert_eq!(sections.len(), 1);

        let rows = &sections[0].table.rows;
        // Rows are ordered period-major: before/news first.
        assert_eq!(rows[0][..2], ["before".to_string(), "news".to_string()]);
        assert_eq!(rows[0][2], "1", "morning count for before/news");
        // 20:00 UTC + 1h = 21:00 local → evening, during the window, other.
        let during_other = rows
            .iter()
            .find(|r| r[0] == "during" && r[1] == "other")
            .unwrap();
        assert_eq!(during_other[4], "1");
    }

    #[test]
    fn test_missing_history_file_is_logged() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("unrelated.json", options).unwrap();
        writer.write_all(b"{}").unwrap();
        writer.finish().unwrap();

        let mut log = ParseLog::new();
        let sections =
            extract_browser(file.path(), &BrowserWindow::default(), &mut log).unwrap();
        assert!(sections.is_empty());
        assert!(log.lines().any(|l| l.contains("BrowserHistory.json")));
    }

    #[test]
    fn test_empty_history_is_logged() {
        let zip = zip_with(r#"{"Browser History": []}"#);
        let mut log = ParseLog::new();
        let sections = extract_browser(zip.path(), &BrowserWindow::default(), &mut log).unwrap();
        assert!(sections.is_empty());
        assert!(log.lines().any(|l| l.contains("No page visits")));
    }
}
