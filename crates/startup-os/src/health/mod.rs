//! Startup health score: six capped categories summed into a 0..=100 composite.

mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{StartupProfile, StartupRecords, Trend};

/// Scored categories in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategory {
    Validation,
    Execution,
    Milestones,
    Team,
    Consistency,
    Readiness,
}

impl HealthCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Validation,
            Self::Execution,
            Self::Milestones,
            Self::Team,
            Self::Consistency,
            Self::Readiness,
        ]
    }

    /// Maximum points the category can contribute. The weights sum to 100.
    pub const fn weight(self) -> u8 {
        match self {
            Self::Validation => 20,
            Self::Execution => 25,
            Self::Milestones => 20,
            Self::Team => 15,
            Self::Consistency => 10,
            Self::Readiness => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Validation => "Idea Validation",
            Self::Execution => "Execution",
            Self::Milestones => "Milestones",
            Self::Team => "Team Activity",
            Self::Consistency => "Consistency",
            Self::Readiness => "Investor Readiness",
        }
    }
}

/// Per-category sub-scores that sum to the health score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub validation: u8,
    pub execution: u8,
    pub milestones: u8,
    pub team: u8,
    pub consistency: u8,
    pub readiness: u8,
}

impl CategoryScores {
    pub fn get(&self, category: HealthCategory) -> u8 {
        match category {
            HealthCategory::Validation => self.validation,
            HealthCategory::Execution => self.execution,
            HealthCategory::Milestones => self.milestones,
            HealthCategory::Team => self.team,
            HealthCategory::Consistency => self.consistency,
            HealthCategory::Readiness => self.readiness,
        }
    }

    fn set(&mut self, category: HealthCategory, score: u8) {
        let slot = match category {
            HealthCategory::Validation => &mut self.validation,
            HealthCategory::Execution => &mut self.execution,
            HealthCategory::Milestones => &mut self.milestones,
            HealthCategory::Team => &mut self.team,
            HealthCategory::Consistency => &mut self.consistency,
            HealthCategory::Readiness => &mut self.readiness,
        };
        *slot = score;
    }

    pub fn total(&self) -> u8 {
        HealthCategory::ordered()
            .into_iter()
            .map(|category| self.get(category))
            .sum()
    }
}

/// Discrete contribution to the health score, kept for audit and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub category: HealthCategory,
    pub score: u8,
    pub max: u8,
    pub notes: String,
}

/// Output of one health computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: u8,
    pub breakdown: CategoryScores,
    pub components: Vec<ScoreComponent>,
    pub trend: Trend,
}

impl HealthReport {
    /// Result for a startup that has not finished onboarding.
    pub fn empty() -> Self {
        Self {
            score: 0,
            breakdown: CategoryScores::default(),
            components: Vec::new(),
            trend: Trend::Neutral,
        }
    }
}

/// Compute the health score for a startup snapshot.
///
/// `now` drives the consistency category and is never read from the system clock here, so
/// identical inputs always produce identical reports.
pub fn compute_health_score(
    profile: Option<&StartupProfile>,
    records: &StartupRecords,
    now: DateTime<Utc>,
) -> HealthReport {
    let Some(profile) = profile else {
        return HealthReport::empty();
    };

    let components = vec![
        rules::validation(profile),
        rules::execution(&records.tasks),
        rules::milestones(&records.milestones),
        rules::team(&records.team, &records.tasks),
        rules::consistency(profile.last_update, now),
        rules::readiness(profile),
    ];

    let mut breakdown = CategoryScores::default();
    for component in &components {
        debug_assert!(component.score <= component.max);
        breakdown.set(component.category, component.score);
    }

    let score = breakdown.total();
    debug_assert!(score <= 100, "health score {score} exceeds 100");

    let trend = Trend::between(score, profile.previous_score.unwrap_or(0));

    HealthReport {
        score,
        breakdown,
        components,
        trend,
    }
}
