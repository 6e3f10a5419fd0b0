//! Service computing health trends for projects from a snapshot source.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use models::project_health::{HealthSnapshot, HealthTrendSummary};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    config::{HealthTrendConfig, HealthTrendConfigError},
    health_trend::{DescendingHistory, HealthTrendAnalyzer},
};

#[derive(Debug, Error)]
pub enum SnapshotSourceError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ProjectHealthError {
    #[error("snapshot source error: {0}")]
    Source(#[from] SnapshotSourceError),
    #[error("configuration error: {0}")]
    Config(#[from] HealthTrendConfigError),
}

/// Trait for fetching health snapshots - implemented by whatever stores them
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Up to `limit` most recent snapshots for a project, newest first.
    /// `None` when the source has no history for the project at all.
    async fn recent_snapshots(
        &self,
        project_id: Uuid,
        limit: u32,
    ) -> Result<Option<Vec<HealthSnapshot>>, SnapshotSourceError>;
}

/// Snapshot source backed by a fixed set of snapshots, grouped per project
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotSource {
    snapshots: HashMap<Uuid, DescendingHistory>,
}

impl InMemorySnapshotSource {
    /// Group snapshots by project. Snapshots without a project id are dropped.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = HealthSnapshot>) -> Self {
        let mut grouped: HashMap<Uuid, Vec<HealthSnapshot>> = HashMap::new();
        for snapshot in snapshots {
            if let Some(project_id) = snapshot.project_id {
                grouped.entry(project_id).or_default().push(snapshot);
            }
        }

        Self {
            snapshots: grouped
                .into_iter()
                .map(|(project_id, list)| (project_id, DescendingHistory::sort_from(list)))
                .collect(),
        }
    }

    pub fn project_count(&self) -> usize {
        self.snapshots.len()
    }
}

#[async_trait]
impl SnapshotSource for InMemorySnapshotSource {
    async fn recent_snapshots(
        &self,
        project_id: Uuid,
        limit: u32,
    ) -> Result<Option<Vec<HealthSnapshot>>, SnapshotSourceError> {
        Ok(self.snapshots.get(&project_id).map(|history| {
            history
                .as_slice()
                .iter()
                .take(limit as usize)
                .cloned()
                .collect()
        }))
    }
}

/// Computes project health trends on top of a snapshot source
pub struct ProjectHealthService {
    source: Arc<dyn SnapshotSource>,
    analyzer: HealthTrendAnalyzer,
}

impl ProjectHealthService {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        config: HealthTrendConfig,
    ) -> Result<Self, ProjectHealthError> {
        let analyzer = HealthTrendAnalyzer::new(config)?;
        Ok(Self { source, analyzer })
    }

    /// Health trend over the configured number of most recent days
    pub async fn health_trend(
        &self,
        project_id: Uuid,
    ) -> Result<HealthTrendSummary, ProjectHealthError> {
        let history = self
            .source
            .recent_snapshots(project_id, self.analyzer.max_days())
            .await?;

        if history.is_none() {
            debug!(project_id = %project_id, "No health history for project");
        }

        let summary = self.analyzer.analyze(history.as_deref());

        info!(
            project_id = %project_id,
            direction = %summary.direction,
            total_days = summary.total_days,
            "Computed project health trend"
        );

        Ok(summary)
    }
}
