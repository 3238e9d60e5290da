//! Typed snapshots of the records a startup owns.
//!
//! Every entity here is produced by [`crate::normalize`] from raw store documents and is
//! treated as read-only for the duration of a computation.

mod connection;
mod identity;
mod profile;
mod records;
mod stage;

pub use connection::{ConnectionRequest, ConnectionStatus};
pub use identity::{Identity, UserAccount, SUPER_ADMIN_ROLE};
pub use profile::{ApprovalStatus, StartupId, StartupProfile, Trend};
pub use records::{
    Goal, GoalStatus, Milestone, MilestoneStatus, StartupRecords, Task, TaskPriority, TaskStatus,
    TeamMember, TeamMemberStatus, UNLINKED_GOAL,
};
pub use stage::Stage;

/// Clamp any numeric reading into the 0..=100 band used by scores and progress.
pub fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
