//! Result sections: the presentation contract of an extraction.
//!
//! The core hands its output to the (external) presentation layer as an
//! ordered list of sections, each a titled table of strings, with the
//! diagnostic log appended as one trailing `extraction_log` section whenever
//! anything was recorded.

use crate::diag::ParseLog;
use crate::i18n;
use crate::model::features::ParticipantFeatures;

/// Identifier of the trailing diagnostics section.
pub const EXTRACTION_LOG_ID: &str = "extraction_log";

/// Plain tabular data: column headers plus stringified rows.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One titled table in the result set.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub table: Table,
}

impl Table {
    /// Render as aligned plain text, one line per row.
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() && cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let mut out = String::new();
        render_row(&mut out, &self.columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        render_row(&mut out, &rule, &widths);
        for row in &self.rows {
            render_row(&mut out, row, &widths);
        }
        out
    }
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        if i + 1 < cells.len() {
            let width = widths.get(i).copied().unwrap_or(0);
            for _ in cell.len()..width {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

/// Shape one chat's participant features into the standard overview section.
pub fn features_section(features: &[ParticipantFeatures]) -> Section {
    let columns = [
        "username",
        "message_no",
        "total_words_no",
        "url_no",
        "location_no",
        "file_no",
        "first_message_date",
        "last_message_date",
        "out_degree",
        "in_degree",
        "user_reply2",
        "reply_2_user",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    let rows = features
        .iter()
        .map(|f| {
            vec![
                f.sender.clone(),
                f.message_count.to_string(),
                f.word_count.to_string(),
                f.url_count.to_string(),
                f.location_count.to_string(),
                f.file_count.to_string(),
                f.first_message.format("%Y-%m-%d %H:%M:%S").to_string(),
                f.last_message.format("%Y-%m-%d %H:%M:%S").to_string(),
                f.out_degree.to_string(),
                f.in_degree.to_string(),
                f.replies_to_most.clone().unwrap_or_default(),
                f.replied_by_most.clone().unwrap_or_default(),
            ]
        })
        .collect();

    Section {
        id: "overview".to_string(),
        title: i18n::overview_title().to_string(),
        table: Table { columns, rows },
    }
}

/// Shape the diagnostic log into the trailing `extraction_log` section.
pub fn log_section(log: &ParseLog) -> Section {
    Section {
        id: EXTRACTION_LOG_ID.to_string(),
        title: i18n::log_title().to_string(),
        table: Table {
            columns: vec![i18n::col_message().to_string()],
            rows: log.lines().map(|line| vec![line.to_string()]).collect(),
        },
    }
}

/// Append the diagnostics section when anything was recorded.
pub fn finish_sections(mut sections: Vec<Section>, log: &ParseLog) -> Vec<Section> {
    if !log.is_empty() {
        sections.push(log_section(log));
    }
    sections
}
