use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Coarse health classification of a project on a given day
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    TS,
    EnumString,
    Display,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverallStatus {
    Good,
    Warning,
    Critical,
    #[default]
    NoData,
}

impl OverallStatus {
    /// Map a raw status value onto the closed set of statuses.
    ///
    /// Only the exact strings `good`, `warning` and `critical` are recognized;
    /// anything else, including a missing value, becomes `NoData`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Ordering used for trend comparison: good > warning > critical > no data.
    pub fn rank(self) -> u8 {
        match self {
            Self::Good => 3,
            Self::Warning => 2,
            Self::Critical => 1,
            Self::NoData => 0,
        }
    }

    pub fn has_data(self) -> bool {
        self != Self::NoData
    }
}

/// Direction of change between the two most recent snapshots
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
    #[default]
    Unknown,
}

/// Daily health snapshot for a project, as produced by the snapshot job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    pub snapshot_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_overall_status")]
    pub overall_status: OverallStatus,
    #[serde(default)]
    pub schedule_status: Option<String>,
    #[serde(default)]
    pub cost_status: Option<String>,
    #[serde(default)]
    pub completion_rate: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl HealthSnapshot {
    /// Build a snapshot from a raw status string, e.g. one read from a legacy export
    pub fn new(id: impl Into<String>, snapshot_date: NaiveDate, raw_status: Option<&str>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            snapshot_date,
            overall_status: OverallStatus::from_raw(raw_status),
            schedule_status: None,
            cost_status: None,
            completion_rate: None,
            created_at: None,
        }
    }

    pub fn for_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Parse a JSON array of snapshots
    pub fn parse_list(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// Upstream payloads carry the status as an unchecked value; anything that is
// not one of the known strings (numbers and nulls included) is treated as no data.
fn deserialize_overall_status<'de, D>(deserializer: D) -> Result<OverallStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(OverallStatus::from_raw(
        raw.as_ref().and_then(serde_json::Value::as_str),
    ))
}

/// Trend summary over the most recent snapshots of a project
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrendSummary {
    pub direction: TrendDirection,
    pub last_status: Option<OverallStatus>,
    pub prev_status: Option<OverallStatus>,
    pub total_days: u32,
    pub count_good: u32,
    pub count_warning: u32,
    pub count_critical: u32,
    /// Oldest first
    pub timeline: Vec<OverallStatus>,
}

impl HealthTrendSummary {
    /// Summary for a project with no usable history
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.total_days == 0
    }
}
