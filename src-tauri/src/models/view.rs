use crate::models::scale::ScoreLevel;
use crate::models::scorecard::Scorecard;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub background: String,
    pub foreground: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCell {
    pub value: Option<u8>,
    pub label: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRow {
    pub category_idx: usize,
    pub metric_idx: usize,
    pub metric: String,
    pub description: String,
    pub cells: Vec<ScoreCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBlock {
    pub name: String,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryEntry {
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendEntry {
    pub value: Option<u8>,
    pub label: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub competitors: Vec<String>,
    pub legend: Vec<LegendEntry>,
    pub summary: Vec<SummaryEntry>,
    pub categories: Vec<CategoryBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadarSeries {
    pub competitor: String,
    pub values: Vec<f64>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadarChart {
    pub axes: Vec<String>,
    pub range_max: f64,
    pub series: Vec<RadarSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub view: DashboardView,
    pub html: String,
    pub show_radar: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarPayload {
    pub chart: RadarChart,
    pub svg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorState {
    pub scorecard: Scorecard,
    pub levels: Vec<ScoreLevel>,
    pub reset_pending: bool,
    pub max_competitors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorResponse {
    pub state: EditorState,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub path: String,
    pub exists: bool,
    pub schema_version: i64,
    pub scale_version: Option<i64>,
    pub saved_at: Option<String>,
}
