//! Semantic location history extraction.
//!
//! Google exports one JSON file per month, named `<YEAR>_<MONTH>.json`, each
//! holding a list of `timelineObjects`. Only `activitySegment` objects are
//! read: per month we sum the time spent per activity type (hours), the total
//! activity duration (days), and the distance travelled (km). A month file
//! that fails to parse is logged and skipped; the remaining months still
//! contribute.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::archive;
use crate::diag::ParseLog;
use crate::error::Result;
use crate::i18n;
use crate::report::{Section, Table};

/// Month names as they appear in export file names.
pub const MONTHS: &[&str] = &[
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Years/months to look for in the archive.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRange {
    pub years: Vec<i32>,
    pub months: Vec<String>,
}

impl Default for LocationRange {
    fn default() -> Self {
        Self {
            years: (2016..=2021).collect(),
            months: MONTHS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SemanticHistory {
    #[serde(default)]
    timeline_objects: Vec<TimelineObject>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TimelineObject {
    activity_segment: Option<ActivitySegment>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ActivitySegment {
    activity_type: Option<String>,
    duration: Option<SegmentDuration>,
    distance: Option<Number>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentDuration {
    start_timestamp_ms: Number,
    end_timestamp_ms: Number,
}

/// The export writes millisecond epochs sometimes as numbers, sometimes as
/// decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Text(String),
}

impl Number {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(*n),
            Number::Text(s) => s.parse().ok(),
        }
    }
}

/// One month's activity summary.
#[derive(Debug, Clone)]
pub struct MonthSummary {
    pub year: i32,
    pub month: String,
    /// Hours per activity type.
    pub activity_hours: BTreeMap<String, f64>,
    /// Total activity duration in days.
    pub duration_days: f64,
    /// Total distance in km.
    pub distance_km: f64,
}

/// Extract per-month activity summaries from a location history archive.
pub fn extract_location(
    path: &Path,
    range: &LocationRange,
    log: &mut ParseLog,
) -> Result<Vec<Section>> {
    let mut archive = archive::open_archive(path)?;
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let mut summaries = Vec::new();
    for year in &range.years {
        for month in &range.months {
            let month_file = format!("{year}_{month}.json");
            let Some(name) = names.iter().find(|n| n.contains(&month_file)) else {
                continue;
            };
            let name = name.clone();
            let bytes = archive::read_entry(&mut archive, path, &name)?;
            match serde_json::from_slice::<SemanticHistory>(&bytes) {
                Ok(data) => summaries.push(summarize(*year, month, &data)),
                Err(_) => log.push(format!(
                    "There was a problem in processing the data regarding {month} {year}"
                )),
            }
        }
    }

    if summaries.is_empty() {
        log.push("No location history files found");
        return Ok(Vec::new());
    }
    Ok(sections(&summaries))
}

/// Fold one month file into its summary.
fn summarize(year: i32, month: &str, data: &SemanticHistory) -> MonthSummary {
    let mut activity_hours: BTreeMap<String, f64> = BTreeMap::new();
    let mut duration_days = 0.0;
    let mut distance_km = 0.0;

    for object in &data.timeline_objects {
        let Some(segment) = &object.activity_segment else {
            continue;
        };
        if let Some(duration) = &segment.duration {
            if let (Some(start), Some(end)) = (
                duration.start_timestamp_ms.as_i64(),
                duration.end_timestamp_ms.as_i64(),
            ) {
                let ms = (end - start) as f64;
                duration_days += ms / (1e3 * 24.0 * 60.0 * 60.0);
                if let Some(activity) = &segment.activity_type {
                    *activity_hours.entry(activity.clone()).or_insert(0.0) +=
                        ms / (1e3 * 60.0 * 60.0);
                }
            }
        }
        if let Some(distance) = segment.distance.as_ref().and_then(Number::as_i64) {
            distance_km += distance as f64 / 1000.0;
        }
    }

    for hours in activity_hours.values_mut() {
        *hours = round_to(*hours, 3);
    }

    MonthSummary {
        year,
        month: month.to_string(),
        activity_hours,
        duration_days,
        distance_km,
    }
}

/// Shape the summaries: one overall section, then one section per activity
/// with the months where any time was spent on it.
fn sections(summaries: &[MonthSummary]) -> Vec<Section> {
    let mut out = Vec::new();

    let overall_rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.year.to_string(),
                s.month.clone(),
                format!("{:.2}", s.duration_days),
                format!("{:.2}", s.distance_km),
            ]
        })
        .collect();
    out.push(Section {
        id: "overall".to_string(),
        title: i18n::location_overall_title().to_string(),
        table: Table {
            columns: ["Year", "Month", "Duration [days]", "Distance [km]"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: overall_rows,
        },
    });

    let activities: BTreeSet<&str> = summaries
        .iter()
        .flat_map(|s| s.activity_hours.keys().map(String::as_str))
        .collect();

    for activity in activities {
        let rows: Vec<Vec<String>> = summaries
            .iter()
            .filter_map(|s| {
                let hours = s.activity_hours.get(activity).copied().unwrap_or(0.0);
                (hours > 0.0).then(|| {
                    vec![
                        s.year.to_string(),
                        s.month.clone(),
                        format!("{:.2}", hours),
                    ]
                })
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        let label = activity_label(activity);
        out.push(Section {
            id: label.to_lowercase().replace(' ', "_"),
            title: label,
            table: Table {
                columns: ["Year", "Month", "Nr. of hours"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                rows,
            },
        });
    }
    out
}

/// Human-readable label for a raw activity type.
///
/// `IN_PASSENGER_VEHICLE` → "Travelled by passenger vehicle",
/// `IN_BUS` → "Travelled by bus", `CYCLING` → "Travelled by bike",
/// `FLYING` → "Travelled by plane", `UNKNOWN_ACTIVITY_TYPE` → "unknown
/// activity type"; anything else stays lowercased.
fn activity_label(activity: &str) -> String {
    let name = activity.to_lowercase();
    if let Some((_, rest)) = name.split_once('_') {
        let head = rest.split('_').next().unwrap_or(rest);
        let label = format!("Travelled by {head}");
        if label.contains("passenger") {
            return "Travelled by passenger vehicle".to_string();
        }
        if label == "Travelled by activity" {
            return "unknown activity type".to_string();
        }
        return label;
    }
    match name.as_str() {
        "cycling" => "Travelled by bike".to_string(),
        "flying" => "Travelled by plane".to_string(),
        _ => name,
    }
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
