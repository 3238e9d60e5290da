use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback label shown for tasks whose goal link is missing or dangling.
pub const UNLINKED_GOAL: &str = "Unlinked";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    Completed,
    Behind,
}

impl GoalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Completed => "Completed",
            Self::Behind => "Behind",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "on track" => Some(Self::OnTrack),
            "at risk" => Some(Self::AtRisk),
            "completed" | "done" => Some(Self::Completed),
            "behind" => Some(Self::Behind),
            _ => None,
        }
    }

    pub fn is_blocked(self) -> bool {
        matches!(self, Self::AtRisk | Self::Behind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: GoalStatus,
    pub progress: u8,
    #[serde(alias = "ownerId")]
    pub owner_id: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "to do" | "todo" => Some(Self::ToDo),
            "in progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Soft reference; the goal may no longer exist.
    #[serde(alias = "goalId")]
    pub goal_id: Option<String>,
    #[serde(alias = "assigneeId")]
    pub assignee_id: Option<String>,
    #[serde(alias = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Achieved,
    Missed,
}

impl MilestoneStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Achieved => "Achieved",
            Self::Missed => "Missed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "achieved" => Some(Self::Achieved),
            "missed" => Some(Self::Missed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: MilestoneStatus,
    #[serde(alias = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamMemberStatus {
    Active,
    #[default]
    Pending,
}

impl TeamMemberStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub access: String,
    pub status: TeamMemberStatus,
}

/// The four per-startup collections consumed by the health engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupRecords {
    pub goals: Vec<Goal>,
    pub tasks: Vec<Task>,
    pub milestones: Vec<Milestone>,
    pub team: Vec<TeamMember>,
}

impl StartupRecords {
    /// Resolve a task's goal link to a display title.
    pub fn goal_title(&self, goal_id: Option<&str>) -> &str {
        goal_id
            .and_then(|id| self.goals.iter().find(|goal| goal.id == id))
            .map(|goal| goal.title.as_str())
            .unwrap_or(UNLINKED_GOAL)
    }

    pub fn done_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_done()).count()
    }

    pub fn achieved_milestones(&self) -> usize {
        self.milestones
            .iter()
            .filter(|milestone| milestone.status == MilestoneStatus::Achieved)
            .count()
    }
}
