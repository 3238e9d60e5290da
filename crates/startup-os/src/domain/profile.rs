use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage::Stage;

/// Identifier wrapper for startup documents; doubles as the owning user's id.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StartupId(pub String);

impl StartupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StartupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StartupId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Direction of the health score relative to the previously stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Trend {
    pub fn between(current: u8, previous: u8) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => Self::Up,
            std::cmp::Ordering::Less => Self::Down,
            std::cmp::Ordering::Equal => Self::Neutral,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "Trending Up",
            Self::Down | Self::Neutral => "Stable",
        }
    }
}

/// Admin review state of a startup listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Onboarded startup profile as read from the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupProfile {
    pub id: StartupId,
    pub name: String,
    pub email: String,
    pub stage: Option<Stage>,
    pub types: Vec<String>,
    pub role: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub customer: Option<String>,
    #[serde(alias = "revenueModel")]
    pub revenue_model: Option<String>,
    pub assumptions: Option<String>,
    pub website: Option<String>,
    #[serde(alias = "pitchDeck")]
    pub pitch_deck: Option<String>,
    #[serde(alias = "healthScore")]
    pub health_score: u8,
    #[serde(alias = "previousScore")]
    pub previous_score: Option<u8>,
    pub trend: Option<Trend>,
    #[serde(alias = "lastUpdate")]
    pub last_update: Option<DateTime<Utc>>,
    pub status: ApprovalStatus,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "reviewedAt")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(alias = "reviewedBy")]
    pub reviewed_by: Option<String>,
}

impl StartupProfile {
    pub fn is_founder(&self) -> bool {
        role_contains(&self.role, "FOUNDER")
    }

    pub fn is_investor(&self) -> bool {
        role_contains(&self.role, "INVESTOR")
    }

    pub fn has_pitch_deck(&self) -> bool {
        present(&self.pitch_deck)
    }

    pub fn has_revenue_model(&self) -> bool {
        present(&self.revenue_model)
    }

    pub fn has_website(&self) -> bool {
        present(&self.website)
    }

    pub fn has_problem(&self) -> bool {
        present(&self.problem)
    }

    pub fn is_pending_approval(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

fn role_contains(role: &str, token: &str) -> bool {
    role.to_ascii_uppercase().contains(token)
}

fn present(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}
