use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::{require_user, ServiceError};
use crate::domain::{GoalStatus, Identity, StartupProfile, StartupRecords, Task};
use crate::health::{compute_health_score, HealthReport};
use crate::normalize::{self, encode_timestamp};
use crate::store::{Collection, CollectionPath, DocumentPatch, DocumentStore};

/// Latest observed input tuple for the signed-in founder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub profile: Option<StartupProfile>,
    pub records: StartupRecords,
}

/// Outcome of the optional score write-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Writeback {
    /// Stored score already matched, or there was no profile to update.
    Skipped,
    Persisted { previous_score: u8 },
    Failed { reason: String },
}

/// Computed report plus what happened to the persisted copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthRefresh {
    pub report: HealthReport,
    pub writeback: Writeback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub startup_name: Option<String>,
    pub pending_approval: bool,
    pub health: HealthRefresh,
    pub active_goals: usize,
    pub blocked_goals: usize,
    pub open_tasks: usize,
    pub done_tasks: usize,
    pub achieved_milestones: usize,
    pub team_size: usize,
}

/// Task row with its soft goal link resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBoardEntry {
    #[serde(flatten)]
    pub task: Task,
    pub goal_title: String,
}

/// Service composing snapshot loading, the health engine, and score persistence.
pub struct DashboardService<S> {
    store: Arc<S>,
}

impl<S> DashboardService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Load the founder's profile and the four scoped collections.
    pub fn snapshot(&self, identity: &Identity) -> Result<DashboardSnapshot, ServiceError> {
        let user = require_user(identity)?;

        let profile = self
            .store
            .fetch(&CollectionPath::root(Collection::Startups), user.as_str())?
            .map(|document| normalize::startup_profile(&document));

        let scoped = |collection| self.store.list(&CollectionPath::scoped(user, collection));
        let records = normalize::startup_records(
            &scoped(Collection::Goals)?,
            &scoped(Collection::Tasks)?,
            &scoped(Collection::Milestones)?,
            &scoped(Collection::Team)?,
        );

        debug!(
            startup = %user,
            onboarded = profile.is_some(),
            goals = records.goals.len(),
            tasks = records.tasks.len(),
            "loaded dashboard snapshot"
        );

        Ok(DashboardSnapshot { profile, records })
    }

    /// Recompute the health score and persist it when it moved.
    ///
    /// A failed write is logged and reported through [`Writeback::Failed`]; the computed report
    /// is still returned and the write is not retried.
    pub fn refresh_health(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<HealthRefresh, ServiceError> {
        let snapshot = self.snapshot(identity)?;
        Ok(self.refresh_from_snapshot(&snapshot, now))
    }

    pub fn summary(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<DashboardSummary, ServiceError> {
        let snapshot = self.snapshot(identity)?;
        let health = self.refresh_from_snapshot(&snapshot, now);
        let records = &snapshot.records;

        Ok(DashboardSummary {
            startup_name: snapshot.profile.as_ref().map(|profile| profile.name.clone()),
            pending_approval: snapshot
                .profile
                .as_ref()
                .is_some_and(StartupProfile::is_pending_approval),
            health,
            active_goals: records
                .goals
                .iter()
                .filter(|goal| goal.status != GoalStatus::Completed)
                .count(),
            blocked_goals: records
                .goals
                .iter()
                .filter(|goal| goal.status.is_blocked())
                .count(),
            open_tasks: records.tasks.len() - records.done_tasks(),
            done_tasks: records.done_tasks(),
            achieved_milestones: records.achieved_milestones(),
            team_size: records.team.len(),
        })
    }

    pub fn task_board(&self, identity: &Identity) -> Result<Vec<TaskBoardEntry>, ServiceError> {
        let DashboardSnapshot { records, .. } = self.snapshot(identity)?;
        Ok(records
            .tasks
            .iter()
            .map(|task| TaskBoardEntry {
                goal_title: records.goal_title(task.goal_id.as_deref()).to_string(),
                task: task.clone(),
            })
            .collect())
    }

    fn refresh_from_snapshot(
        &self,
        snapshot: &DashboardSnapshot,
        now: DateTime<Utc>,
    ) -> HealthRefresh {
        let report = compute_health_score(snapshot.profile.as_ref(), &snapshot.records, now);

        let Some(profile) = snapshot.profile.as_ref() else {
            return HealthRefresh {
                report,
                writeback: Writeback::Skipped,
            };
        };

        if profile.health_score == report.score {
            return HealthRefresh {
                report,
                writeback: Writeback::Skipped,
            };
        }

        let previous_score = profile.health_score;
        let mut patch = DocumentPatch::new();
        patch.insert("healthScore".to_string(), json!(report.score));
        patch.insert("previousScore".to_string(), json!(previous_score));
        patch.insert("lastUpdate".to_string(), encode_timestamp(now));
        patch.insert("trend".to_string(), json!(report.trend.key()));

        let path = CollectionPath::root(Collection::Startups);
        let writeback = match self.store.update(&path, profile.id.as_str(), patch) {
            Ok(()) => {
                info!(
                    startup = %profile.id,
                    score = report.score,
                    previous_score,
                    trend = report.trend.key(),
                    "persisted health score"
                );
                Writeback::Persisted { previous_score }
            }
            Err(err) => {
                error!(startup = %profile.id, error = %err, "failed to persist health score");
                Writeback::Failed {
                    reason: err.to_string(),
                }
            }
        };

        HealthRefresh { report, writeback }
    }
}
