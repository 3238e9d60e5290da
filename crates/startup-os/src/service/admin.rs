use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::{require_user, ServiceError};
use crate::domain::{ApprovalStatus, Identity, StartupId, StartupProfile};
use crate::normalize::{self, encode_timestamp};
use crate::store::{Collection, CollectionPath, DocumentPatch, DocumentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub const fn status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            other => Err(format!("unknown review decision '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminOverview {
    pub total: usize,
    pub pending: usize,
    pub startups: Vec<StartupProfile>,
}

/// Admin console: startup listing and approval review.
pub struct AdminService<S> {
    store: Arc<S>,
}

impl<S> AdminService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve the caller to a `SUPER_ADMIN` account from the `users` collection.
    pub fn require_admin<'a>(
        &self,
        identity: &'a Identity,
    ) -> Result<&'a StartupId, ServiceError> {
        let user_id = require_user(identity)?;
        let account = self
            .store
            .fetch(&CollectionPath::root(Collection::Users), user_id.as_str())?
            .map(|document| normalize::user_account(&document));

        match account {
            Some(account) if account.is_super_admin() => Ok(user_id),
            _ => {
                warn!(user = %user_id, "admin access denied");
                Err(ServiceError::Forbidden(user_id.clone()))
            }
        }
    }

    /// All startups, newest first; profiles without a creation time sort last.
    pub fn list_startups(&self, admin: &Identity) -> Result<Vec<StartupProfile>, ServiceError> {
        self.require_admin(admin)?;
        self.all_startups()
    }

    pub fn pending_count(&self, admin: &Identity) -> Result<usize, ServiceError> {
        Ok(self
            .list_startups(admin)?
            .iter()
            .filter(|startup| startup.is_pending_approval())
            .count())
    }

    pub fn overview(&self, admin: &Identity) -> Result<AdminOverview, ServiceError> {
        let startups = self.list_startups(admin)?;
        let pending = startups
            .iter()
            .filter(|startup| startup.is_pending_approval())
            .count();
        Ok(AdminOverview {
            total: startups.len(),
            pending,
            startups,
        })
    }

    pub fn review(
        &self,
        reviewer: &Identity,
        startup_id: &StartupId,
        decision: ReviewDecision,
        now: DateTime<Utc>,
    ) -> Result<StartupProfile, ServiceError> {
        let reviewer = self.require_admin(reviewer)?;
        let path = CollectionPath::root(Collection::Startups);

        let mut patch = DocumentPatch::new();
        patch.insert("status".to_string(), json!(decision.status().key()));
        patch.insert("reviewedAt".to_string(), encode_timestamp(now));
        patch.insert("reviewedBy".to_string(), json!(reviewer.as_str()));

        match self.store.update(&path, startup_id.as_str(), patch) {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                return Err(ServiceError::ProfileNotFound(startup_id.clone()))
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            startup = %startup_id,
            reviewer = %reviewer,
            status = decision.status().key(),
            "startup reviewed"
        );

        self.store
            .fetch(&path, startup_id.as_str())?
            .map(|document| normalize::startup_profile(&document))
            .ok_or_else(|| ServiceError::ProfileNotFound(startup_id.clone()))
    }

    fn all_startups(&self) -> Result<Vec<StartupProfile>, ServiceError> {
        let mut startups: Vec<StartupProfile> = self
            .store
            .list(&CollectionPath::root(Collection::Startups))?
            .iter()
            .map(normalize::startup_profile)
            .collect();
        startups.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(startups)
    }
}
