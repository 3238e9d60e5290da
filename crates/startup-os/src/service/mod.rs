//! Caller-side services around the pure engines.
//!
//! Each service reads snapshots through a [`DocumentStore`](crate::store::DocumentStore),
//! receives the caller's [`Identity`](crate::domain::Identity) explicitly, and owns the only
//! side effects in the core.

pub mod admin;
pub mod dashboard;
pub mod directory;
pub mod workspace;

#[cfg(test)]
mod tests;

pub use admin::{AdminOverview, AdminService, ReviewDecision};
pub use dashboard::{
    DashboardService, DashboardSnapshot, DashboardSummary, HealthRefresh, TaskBoardEntry,
    Writeback,
};
pub use directory::{DirectoryEntry, DirectoryPage, DirectoryService};
pub use workspace::{NewTask, OnboardingForm, TaskUpdate, WorkspaceService};

use crate::domain::{Identity, StartupId};
use crate::store::StoreError;

/// Error raised by the dashboard services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("sign in required")]
    Unauthenticated,
    #[error("user {0} is not allowed to perform this action")]
    Forbidden(StartupId),
    #[error("startup profile {0} not found")]
    ProfileNotFound(StartupId),
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("startup {0} has already completed onboarding")]
    AlreadyOnboarded(StartupId),
    #[error("connection request to {0} already sent")]
    DuplicateRequest(StartupId),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub(crate) fn require_user(identity: &Identity) -> Result<&StartupId, ServiceError> {
    identity.user_id().ok_or(ServiceError::Unauthenticated)
}
