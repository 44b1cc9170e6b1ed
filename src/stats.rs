//! Weekly stats pivot: per-link date buckets into one row per date.

use crate::models::{ChartRow, ChartSeries, WeeklyChart, WeeklyStatRecord};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// Golden-angle rotation keeps neighbouring series far apart on the wheel.
const HUE_STEP: f64 = 137.5;
const SATURATION: u8 = 65;
const LIGHTNESS: u8 = 55;

pub fn build_weekly_chart(records: &[WeeklyStatRecord]) -> WeeklyChart {
    if records.is_empty() {
        return WeeklyChart::default();
    }

    let dates = date_axis(records);

    let rows = dates
        .iter()
        .enumerate()
        .map(|(position, date)| ChartRow {
            label: axis_label(position, date),
            counts: records
                .iter()
                .map(|record| (record.short_code.clone(), count_on(record, date)))
                .collect::<BTreeMap<_, _>>(),
        })
        .collect();

    let series: Vec<ChartSeries> = records
        .iter()
        .enumerate()
        .map(|(index, record)| ChartSeries {
            short_code: record.short_code.clone(),
            color: series_color(index),
            hue: series_hue(index),
            total: dates
                .iter()
                .fold(0u64, |sum, date| sum.saturating_add(count_on(record, date))),
        })
        .collect();

    let total = series
        .iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.total));

    let week = dates
        .first()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(week_label);

    WeeklyChart {
        dates,
        rows,
        series,
        total,
        week,
    }
}

/// Sorted union of every record's dates. ISO dates sort chronologically as
/// plain strings.
pub fn date_axis(records: &[WeeklyStatRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.weekly_data.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Day name for the first seven axis positions, the raw date afterwards.
pub fn axis_label(position: usize, date: &str) -> String {
    DAY_NAMES
        .get(position)
        .map(|name| name.to_string())
        .unwrap_or_else(|| date.to_string())
}

pub fn series_hue(index: usize) -> f64 {
    (index as f64 * HUE_STEP) % 360.0
}

pub fn series_color(index: usize) -> String {
    format!("hsl({}, {SATURATION}%, {LIGHTNESS}%)", series_hue(index))
}

fn count_on(record: &WeeklyStatRecord, date: &str) -> u64 {
    record.weekly_data.get(date).copied().unwrap_or(0)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
