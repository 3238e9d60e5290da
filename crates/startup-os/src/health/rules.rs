use chrono::{DateTime, Utc};

use super::{HealthCategory, ScoreComponent};
use crate::domain::{Milestone, MilestoneStatus, Stage, StartupProfile, Task, TeamMember};

const CONSISTENCY_WINDOW_DAYS: i64 = 7;
const SOLO_TEAM_TASK_THRESHOLD: usize = 5;
const EXECUTION_WITHOUT_TASKS: u8 = 5;
const MISSING_FUNDAMENTALS_PENALTY: u8 = 5;

pub(crate) fn validation(profile: &StartupProfile) -> ScoreComponent {
    let base: u8 = match profile.stage {
        Some(Stage::Mvp | Stage::Revenue | Stage::Fundraising | Stage::Growth) => 20,
        Some(Stage::Validation) => 15,
        Some(Stage::Idea) | None => 10,
    };

    let stage = profile.stage.map(Stage::label).unwrap_or("unknown");
    let missing_fundamentals = !profile.has_problem() || !profile.has_revenue_model();
    let (score, notes) = if missing_fundamentals {
        (
            base.saturating_sub(MISSING_FUNDAMENTALS_PENALTY),
            format!("{stage} stage, problem or revenue model missing"),
        )
    } else {
        (base, format!("{stage} stage with problem and revenue model"))
    };

    component(HealthCategory::Validation, score, notes)
}

pub(crate) fn execution(tasks: &[Task]) -> ScoreComponent {
    if tasks.is_empty() {
        return component(
            HealthCategory::Execution,
            EXECUTION_WITHOUT_TASKS,
            "no tasks tracked yet".to_string(),
        );
    }

    let done = tasks.iter().filter(|task| task.is_done()).count();
    let score = proportion(done, tasks.len(), HealthCategory::Execution.weight());
    component(
        HealthCategory::Execution,
        score,
        format!("{done} of {} tasks done", tasks.len()),
    )
}

pub(crate) fn milestones(milestones: &[Milestone]) -> ScoreComponent {
    if milestones.is_empty() {
        return component(
            HealthCategory::Milestones,
            0,
            "no milestones recorded".to_string(),
        );
    }

    let achieved = milestones
        .iter()
        .filter(|milestone| milestone.status == MilestoneStatus::Achieved)
        .count();
    let score = proportion(
        achieved,
        milestones.len(),
        HealthCategory::Milestones.weight(),
    );
    component(
        HealthCategory::Milestones,
        score,
        format!("{achieved} of {} milestones achieved", milestones.len()),
    )
}

pub(crate) fn team(team: &[TeamMember], tasks: &[Task]) -> ScoreComponent {
    let active = team.len() > 1 || (team.len() == 1 && tasks.len() > SOLO_TEAM_TASK_THRESHOLD);
    if active {
        component(
            HealthCategory::Team,
            HealthCategory::Team.weight(),
            format!("{} member(s) carrying {} task(s)", team.len(), tasks.len()),
        )
    } else {
        component(
            HealthCategory::Team,
            5,
            format!("only {} member(s) on record", team.len()),
        )
    }
}

pub(crate) fn consistency(
    last_update: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ScoreComponent {
    match last_update {
        Some(updated) => {
            let days = now.signed_duration_since(updated).num_days();
            if days <= CONSISTENCY_WINDOW_DAYS {
                component(
                    HealthCategory::Consistency,
                    HealthCategory::Consistency.weight(),
                    format!("updated {days} day(s) ago"),
                )
            } else {
                component(
                    HealthCategory::Consistency,
                    0,
                    format!("last update {days} days ago"),
                )
            }
        }
        None => component(HealthCategory::Consistency, 0, "never updated".to_string()),
    }
}

pub(crate) fn readiness(profile: &StartupProfile) -> ScoreComponent {
    let mut score = 0u8;
    let mut present = Vec::new();

    if profile.has_pitch_deck() {
        score += 4;
        present.push("pitch deck");
    }
    if profile.has_revenue_model() {
        score += 3;
        present.push("revenue model");
    }
    if profile.has_website() {
        score += 3;
        present.push("website");
    }

    let notes = if present.is_empty() {
        "no investor materials".to_string()
    } else {
        present.join(", ")
    };
    component(
        HealthCategory::Readiness,
        score.min(HealthCategory::Readiness.weight()),
        notes,
    )
}

fn proportion(part: usize, total: usize, weight: u8) -> u8 {
    let ratio = part as f64 / total as f64;
    (ratio * f64::from(weight)).round() as u8
}

fn component(category: HealthCategory, score: u8, notes: String) -> ScoreComponent {
    ScoreComponent {
        category,
        score,
        max: category.weight(),
        notes,
    }
}
