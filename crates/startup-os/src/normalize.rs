//! Tolerant conversion of raw store documents into typed entities.
//!
//! Nothing here fails: a missing or oddly-shaped field becomes absent or takes the listing
//! default, so the engines only ever see well-formed snapshots.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::domain::{
    clamp_percent, ApprovalStatus, ConnectionRequest, ConnectionStatus, Goal, GoalStatus,
    Milestone, MilestoneStatus, Stage, StartupId, StartupProfile, StartupRecords, Task,
    TaskPriority, TaskStatus, TeamMember, TeamMemberStatus, Trend, UserAccount,
};
use crate::store::Document;

pub const DEFAULT_STARTUP_NAME: &str = "Unnamed Startup";
pub const DEFAULT_ROLE: &str = "FOUNDER";

pub fn startup_profile(document: &Document) -> StartupProfile {
    StartupProfile {
        id: StartupId(document.id.clone()),
        name: text(document, "name").unwrap_or_else(|| DEFAULT_STARTUP_NAME.to_string()),
        email: text(document, "email").unwrap_or_default(),
        stage: text(document, "stage").and_then(|raw| Stage::parse(&raw)),
        types: string_list(document, "types"),
        role: text(document, "role").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        city: text(document, "city"),
        country: text(document, "country"),
        problem: text(document, "problem"),
        solution: text(document, "solution"),
        customer: text(document, "customer"),
        revenue_model: text(document, "revenueModel"),
        assumptions: text(document, "assumptions"),
        website: text(document, "website"),
        pitch_deck: text(document, "pitchDeck"),
        health_score: percent(document, "healthScore").unwrap_or(0),
        previous_score: percent(document, "previousScore"),
        trend: text(document, "trend").and_then(|raw| Trend::parse(&raw)),
        last_update: timestamp(document, "lastUpdate"),
        status: text(document, "status")
            .and_then(|raw| ApprovalStatus::parse(&raw))
            .unwrap_or_default(),
        created_at: timestamp(document, "createdAt"),
        reviewed_at: timestamp(document, "reviewedAt"),
        reviewed_by: text(document, "reviewedBy"),
    }
}

pub fn goal(document: &Document) -> Goal {
    Goal {
        id: document.id.clone(),
        title: text(document, "title").unwrap_or_default(),
        category: text(document, "type")
            .or_else(|| text(document, "category"))
            .unwrap_or_default(),
        status: text(document, "status")
            .and_then(|raw| GoalStatus::parse(&raw))
            .unwrap_or_default(),
        progress: percent(document, "progress").unwrap_or(0),
        owner_id: text(document, "ownerId"),
        created_at: timestamp(document, "createdAt"),
        due_date: timestamp(document, "dueDate"),
    }
}

pub fn task(document: &Document) -> Task {
    Task {
        id: document.id.clone(),
        title: text(document, "title").unwrap_or_default(),
        status: text(document, "status")
            .and_then(|raw| TaskStatus::parse(&raw))
            .unwrap_or_default(),
        priority: text(document, "priority")
            .and_then(|raw| TaskPriority::parse(&raw))
            .unwrap_or_default(),
        goal_id: text(document, "goalId"),
        assignee_id: text(document, "assigneeId"),
        due_date: timestamp(document, "dueDate"),
    }
}

pub fn milestone(document: &Document) -> Milestone {
    Milestone {
        id: document.id.clone(),
        title: text(document, "title").unwrap_or_default(),
        description: text(document, "description").unwrap_or_default(),
        status: text(document, "status")
            .and_then(|raw| MilestoneStatus::parse(&raw))
            .unwrap_or_default(),
        due_date: timestamp(document, "dueDate"),
    }
}

pub fn team_member(document: &Document) -> TeamMember {
    TeamMember {
        id: document.id.clone(),
        name: text(document, "name").unwrap_or_default(),
        role: text(document, "role").unwrap_or_default(),
        email: text(document, "email").unwrap_or_default(),
        access: text(document, "access").unwrap_or_default(),
        status: text(document, "status")
            .and_then(|raw| TeamMemberStatus::parse(&raw))
            .unwrap_or_default(),
    }
}

pub fn connection_request(document: &Document) -> ConnectionRequest {
    ConnectionRequest {
        id: document.id.clone(),
        from_id: StartupId(text(document, "fromId").unwrap_or_default()),
        to_id: StartupId(text(document, "toId").unwrap_or_default()),
        from_name: text(document, "fromName").unwrap_or_default(),
        to_name: text(document, "toName").unwrap_or_default(),
        status: text(document, "status")
            .and_then(|raw| ConnectionStatus::parse(&raw))
            .unwrap_or_default(),
        created_at: timestamp(document, "createdAt"),
    }
}

pub fn user_account(document: &Document) -> UserAccount {
    UserAccount {
        id: StartupId(document.id.clone()),
        email: text(document, "email").unwrap_or_default(),
        role: text(document, "role").unwrap_or_default(),
    }
}

/// Assemble the per-startup collections; any collection the store did not return stays empty.
pub fn startup_records(
    goals: &[Document],
    tasks: &[Document],
    milestones: &[Document],
    team: &[Document],
) -> StartupRecords {
    StartupRecords {
        goals: goals.iter().map(goal).collect(),
        tasks: tasks.iter().map(task).collect(),
        milestones: milestones.iter().map(milestone).collect(),
        team: team.iter().map(team_member).collect(),
    }
}

/// Encode a timestamp in the backend's native `{seconds, nanoseconds}` shape.
pub fn encode_timestamp(value: DateTime<Utc>) -> Value {
    json!({
        "seconds": value.timestamp(),
        "nanoseconds": value.timestamp_subsec_nanos(),
    })
}

fn text(document: &Document, key: &str) -> Option<String> {
    match document.get(key)? {
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Trimmed, non-empty strings in first-seen order with repeats dropped.
fn string_list(document: &Document, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = document.get(key) else {
        return Vec::new();
    };
    let mut list: Vec<String> = Vec::new();
    for item in items.iter().filter_map(Value::as_str).map(str::trim) {
        if !item.is_empty() && !list.iter().any(|seen| seen == item) {
            list.push(item.to_string());
        }
    }
    list
}

fn percent(document: &Document, key: &str) -> Option<u8> {
    match document.get(key)? {
        Value::Number(number) => number.as_f64().map(clamp_percent),
        Value::String(raw) => raw.trim().parse::<f64>().ok().map(clamp_percent),
        _ => None,
    }
}

fn timestamp(document: &Document, key: &str) -> Option<DateTime<Utc>> {
    match document.get(key)? {
        Value::Object(fields) => {
            let seconds = fields
                .get("seconds")
                .or_else(|| fields.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = fields
                .get("nanoseconds")
                .or_else(|| fields.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|nanos| u32::try_from(nanos).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos)
        }
        Value::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0)),
        _ => None,
    }
}
