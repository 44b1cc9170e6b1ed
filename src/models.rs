use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One short-URL mapping as reported by the link service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub short_code: String,
    pub long_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStatRecord {
    pub short_code: String,
    /// ISO `YYYY-MM-DD` date -> hit count.
    pub weekly_data: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub long_url: String,
    pub custom_short_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLinkRequest {
    pub long_url: String,
}

/// Error body returned by the link service on rejected writes.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

/// Form fields posted by the creation form.
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    pub long_url: String,
    #[serde(default)]
    pub custom_short_code: String,
}

#[derive(Debug, Deserialize)]
pub struct StartEditForm {
    pub short_code: String,
}

/// Form fields posted by the inline edit row.
#[derive(Debug, Deserialize)]
pub struct EditLinkForm {
    pub long_url: String,
}

/// One point on the x-axis of the weekly chart.
///
/// Serialized as `{ "label": ..., "<short_code>": count, ... }` so a chart
/// library can address each series by its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub label: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub short_code: String,
    pub color: String,
    pub hue: f64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeeklyChart {
    pub dates: Vec<String>,
    pub rows: Vec<ChartRow>,
    pub series: Vec<ChartSeries>,
    pub total: u64,
    pub week: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Error,
}

/// Message surfaced to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSnapshot {
    pub short_code: String,
    pub draft_long_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub long_url: String,
    pub custom_short_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleSnapshot {
    pub links: Vec<Link>,
    pub stale: bool,
    pub editing: Option<EditSnapshot>,
    pub form: FormSnapshot,
    pub notice: Option<Notice>,
}
