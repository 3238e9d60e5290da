use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{require_user, ServiceError};
use crate::domain::{Identity, Stage, StartupProfile, Task, TaskPriority, TaskStatus};
use crate::normalize::{self, encode_timestamp, DEFAULT_ROLE};
use crate::store::{
    Collection, CollectionPath, Document, DocumentPatch, DocumentStore, StoreError,
};

/// Answers collected by the onboarding wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OnboardingForm {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub stage: Option<String>,
    pub types: Vec<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub customer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub title: String,
    pub priority: Option<String>,
    #[serde(alias = "goalId")]
    pub goal_id: Option<String>,
    #[serde(alias = "assigneeId")]
    pub assignee_id: Option<String>,
    #[serde(alias = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial edit of a task row; at least one field must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Writes that create the records the engines later score: the startup profile and its tasks.
pub struct WorkspaceService<S> {
    store: Arc<S>,
}

impl<S> WorkspaceService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create the caller's startup profile, keyed by their user id and queued for review.
    pub fn onboard(
        &self,
        identity: &Identity,
        form: OnboardingForm,
        now: DateTime<Utc>,
    ) -> Result<StartupProfile, ServiceError> {
        let user = require_user(identity)?;

        let name = required(&form.name, "startup name")?;
        let stage = match non_blank(form.stage.as_deref()) {
            Some(raw) => match Stage::parse(raw) {
                Some(stage) => Some(stage),
                None => {
                    return Err(ServiceError::InvalidRequest(format!(
                        "unknown stage '{raw}'"
                    )))
                }
            },
            None => None,
        };

        let mut types: Vec<String> = Vec::new();
        for tag in form.types.iter().map(|tag| tag.trim()) {
            if !tag.is_empty() && !types.iter().any(|seen| seen == tag) {
                types.push(tag.to_string());
            }
        }

        let document = Document::from_value(
            user.as_str(),
            json!({
                "name": name,
                "email": form.email.trim(),
                "role": non_blank(form.role.as_deref()).unwrap_or(DEFAULT_ROLE),
                "stage": stage.map(Stage::key),
                "types": types,
                "city": optional(form.city.as_deref()),
                "country": optional(form.country.as_deref()),
                "problem": optional(form.problem.as_deref()),
                "solution": optional(form.solution.as_deref()),
                "customer": optional(form.customer.as_deref()),
                "status": "pending",
                "healthScore": 0,
                "createdAt": encode_timestamp(now),
                "userId": user.as_str(),
            }),
        );
        let profile = normalize::startup_profile(&document);

        match self
            .store
            .insert(&CollectionPath::root(Collection::Startups), document)
        {
            Ok(_) => {}
            Err(StoreError::Conflict) => return Err(ServiceError::AlreadyOnboarded(user.clone())),
            Err(other) => return Err(other.into()),
        }

        info!(startup = %user, stage = ?profile.stage, "startup onboarded");
        Ok(profile)
    }

    /// Add a task to the caller's board; new tasks always start in To Do.
    pub fn create_task(
        &self,
        identity: &Identity,
        task: NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, ServiceError> {
        let user = require_user(identity)?;
        let title = required(&task.title, "task title")?;
        let priority = match non_blank(task.priority.as_deref()) {
            Some(raw) => parse_priority(raw)?,
            None => TaskPriority::default(),
        };

        let document = Document::from_value(
            "",
            json!({
                "title": title,
                "status": TaskStatus::ToDo.label(),
                "priority": priority.label(),
                "goalId": optional(task.goal_id.as_deref()),
                "assigneeId": optional(task.assignee_id.as_deref()),
                "dueDate": task.due_date.map(encode_timestamp),
                "createdAt": encode_timestamp(now),
            }),
        );

        let path = CollectionPath::scoped(user, Collection::Tasks);
        let id = self.store.insert(&path, document)?;
        info!(startup = %user, task = %id, priority = priority.label(), "task created");

        self.task(&path, &id)
    }

    /// Apply a partial edit, typically the Done / To Do toggle from the board.
    pub fn update_task(
        &self,
        identity: &Identity,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, ServiceError> {
        let user = require_user(identity)?;

        let mut patch = DocumentPatch::new();
        if let Some(title) = update.title.as_deref() {
            patch.insert("title".to_string(), json!(required(title, "task title")?));
        }
        if let Some(raw) = update.status.as_deref() {
            let status = TaskStatus::parse(raw).ok_or_else(|| {
                ServiceError::InvalidRequest(format!("unknown task status '{}'", raw.trim()))
            })?;
            patch.insert("status".to_string(), json!(status.label()));
        }
        if let Some(raw) = update.priority.as_deref() {
            patch.insert("priority".to_string(), json!(parse_priority(raw)?.label()));
        }
        if patch.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "task update carries no changes".to_string(),
            ));
        }

        let path = CollectionPath::scoped(user, Collection::Tasks);
        match self.store.update(&path, task_id, patch) {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                return Err(ServiceError::TaskNotFound(task_id.to_string()))
            }
            Err(other) => return Err(other.into()),
        }

        info!(startup = %user, task = task_id, "task updated");
        self.task(&path, task_id)
    }

    fn task(&self, path: &CollectionPath, id: &str) -> Result<Task, ServiceError> {
        self.store
            .fetch(path, id)?
            .map(|document| normalize::task(&document))
            .ok_or_else(|| ServiceError::TaskNotFound(id.to_string()))
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, ServiceError> {
    non_blank(Some(value))
        .ok_or_else(|| ServiceError::InvalidRequest(format!("{field} is required")))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn optional(value: Option<&str>) -> Value {
    non_blank(value).map_or(Value::Null, |value| json!(value))
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ServiceError> {
    TaskPriority::parse(raw).ok_or_else(|| {
        ServiceError::InvalidRequest(format!("unknown task priority '{}'", raw.trim()))
    })
}
