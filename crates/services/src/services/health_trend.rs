//! Trend analysis over project health snapshots.

use models::project_health::{HealthSnapshot, HealthTrendSummary, OverallStatus, TrendDirection};
use tracing::debug;

use super::config::{HealthTrendConfig, HealthTrendConfigError, SnapshotOrdering};

pub use super::config::DEFAULT_MAX_DAYS;

/// Summarize the `max_days` most recent snapshots of `history`.
///
/// `history` is expected newest first, which is how the snapshot source returns it.
/// An absent or empty history, or a cap of zero, yields the empty summary.
pub fn compute_health_trend(
    history: Option<&[HealthSnapshot]>,
    max_days: u32,
) -> HealthTrendSummary {
    let Some(history) = history.filter(|h| !h.is_empty()) else {
        return HealthTrendSummary::empty();
    };

    let window = history.len().min(max_days as usize);
    let timeline: Vec<OverallStatus> = history[..window]
        .iter()
        .rev()
        .map(|snapshot| snapshot.overall_status)
        .collect();

    let last_status = timeline.last().copied();
    let prev_status = timeline.iter().rev().nth(1).copied();

    let mut summary = HealthTrendSummary {
        direction: trend_direction(prev_status, last_status),
        last_status,
        prev_status,
        total_days: timeline.len() as u32,
        ..HealthTrendSummary::empty()
    };

    for status in &timeline {
        match status {
            OverallStatus::Good => summary.count_good += 1,
            OverallStatus::Warning => summary.count_warning += 1,
            OverallStatus::Critical => summary.count_critical += 1,
            OverallStatus::NoData => {}
        }
    }

    summary.timeline = timeline;
    summary
}

fn trend_direction(prev: Option<OverallStatus>, last: Option<OverallStatus>) -> TrendDirection {
    let (Some(prev), Some(last)) = (prev, last) else {
        return TrendDirection::Unknown;
    };
    if !prev.has_data() || !last.has_data() {
        return TrendDirection::Unknown;
    }

    match last.rank().cmp(&prev.rank()) {
        std::cmp::Ordering::Greater => TrendDirection::Improving,
        std::cmp::Ordering::Less => TrendDirection::Worsening,
        std::cmp::Ordering::Equal => TrendDirection::Stable,
    }
}

/// Snapshot list known to be ordered newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescendingHistory(Vec<HealthSnapshot>);

impl DescendingHistory {
    /// Wrap snapshots the caller guarantees are already newest first
    pub fn assume_sorted(snapshots: Vec<HealthSnapshot>) -> Self {
        Self(snapshots)
    }

    /// Sort newest first by snapshot date. Snapshots sharing a date keep their relative order.
    pub fn sort_from(mut snapshots: Vec<HealthSnapshot>) -> Self {
        snapshots.sort_by(|a, b| b.snapshot_date.cmp(&a.snapshot_date));
        Self(snapshots)
    }

    pub fn is_sorted_descending(snapshots: &[HealthSnapshot]) -> bool {
        snapshots
            .windows(2)
            .all(|pair| pair[0].snapshot_date >= pair[1].snapshot_date)
    }

    pub fn as_slice(&self) -> &[HealthSnapshot] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Health trend analyzer bound to a validated configuration
#[derive(Debug, Clone, Default)]
pub struct HealthTrendAnalyzer {
    config: HealthTrendConfig,
}

impl HealthTrendAnalyzer {
    pub fn new(config: HealthTrendConfig) -> Result<Self, HealthTrendConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn max_days(&self) -> u32 {
        self.config.max_days
    }

    /// Analyze a history according to the configured ordering policy
    pub fn analyze(&self, history: Option<&[HealthSnapshot]>) -> HealthTrendSummary {
        let Some(history) = history else {
            return HealthTrendSummary::empty();
        };

        match self.config.ordering {
            SnapshotOrdering::TrustCaller => {
                compute_health_trend(Some(history), self.config.max_days)
            }
            SnapshotOrdering::SortByDate if DescendingHistory::is_sorted_descending(history) => {
                compute_health_trend(Some(history), self.config.max_days)
            }
            SnapshotOrdering::SortByDate => {
                debug!(
                    snapshots = history.len(),
                    "Snapshot history not newest first, sorting by date before analysis"
                );
                let sorted = DescendingHistory::sort_from(history.to_vec());
                self.analyze_sorted(&sorted)
            }
        }
    }

    pub fn analyze_sorted(&self, history: &DescendingHistory) -> HealthTrendSummary {
        compute_health_trend(Some(history.as_slice()), self.config.max_days)
    }
}
