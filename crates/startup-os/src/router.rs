use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::DirectoryConfig;
use crate::domain::{Identity, StartupId, StartupProfile, StartupRecords};
use crate::health::compute_health_score;
use crate::matching::{rank_matches, DirectoryFilter, DirectorySurface};
use crate::service::{
    AdminService, DashboardService, DirectoryService, NewTask, OnboardingForm, ReviewDecision,
    ServiceError, TaskUpdate, WorkspaceService,
};
use crate::store::{DocumentStore, StoreError};

/// Header carrying the signed-in user's id, set by the session layer in front of the API.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Services shared by every handler.
pub struct AppServices<S> {
    pub dashboard: Arc<DashboardService<S>>,
    pub directory: Arc<DirectoryService<S>>,
    pub admin: Arc<AdminService<S>>,
    pub workspace: Arc<WorkspaceService<S>>,
}

impl<S> AppServices<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>, directory: DirectoryConfig) -> Self {
        Self {
            dashboard: Arc::new(DashboardService::new(store.clone())),
            directory: Arc::new(DirectoryService::new(store.clone(), directory)),
            admin: Arc::new(AdminService::new(store.clone())),
            workspace: Arc::new(WorkspaceService::new(store)),
        }
    }
}

impl<S> Clone for AppServices<S> {
    fn clone(&self) -> Self {
        Self {
            dashboard: self.dashboard.clone(),
            directory: self.directory.clone(),
            admin: self.admin.clone(),
            workspace: self.workspace.clone(),
        }
    }
}

/// Router builder exposing the engines, onboarding, dashboard, directory and admin endpoints.
pub fn startup_router<S>(services: AppServices<S>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/api/v1/score/health", post(health_score_handler))
        .route("/api/v1/score/matches", post(match_ranking_handler))
        .route("/api/v1/onboarding", post(onboarding_handler::<S>))
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .route(
            "/api/v1/dashboard/health/refresh",
            post(refresh_handler::<S>),
        )
        .route(
            "/api/v1/dashboard/tasks",
            get(task_board_handler::<S>).post(create_task_handler::<S>),
        )
        .route(
            "/api/v1/dashboard/tasks/:task_id",
            patch(update_task_handler::<S>),
        )
        .route("/api/v1/directory/:surface", get(directory_handler::<S>))
        .route("/api/v1/connections", post(connection_handler::<S>))
        .route("/api/v1/admin/startups", get(admin_list_handler::<S>))
        .route(
            "/api/v1/admin/startups/:startup_id/review",
            post(admin_review_handler::<S>),
        )
        .with_state(services)
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthScoreRequest {
    #[serde(default)]
    profile: Option<StartupProfile>,
    #[serde(default)]
    records: StartupRecords,
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchRankingRequest {
    #[serde(default)]
    me: Option<StartupProfile>,
    #[serde(default)]
    candidates: Vec<StartupProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionRequestBody {
    #[serde(alias = "toId")]
    to_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequestBody {
    decision: ReviewDecision,
}

pub(crate) async fn health_score_handler(
    payload: Result<Json<HealthScoreRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection),
    };
    let now = request.now.unwrap_or_else(Utc::now);
    let report = compute_health_score(request.profile.as_ref(), &request.records, now);
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn match_ranking_handler(
    payload: Result<Json<MatchRankingRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection),
    };
    let ranked = rank_matches(request.me.as_ref(), request.candidates);
    (StatusCode::OK, Json(ranked)).into_response()
}

pub(crate) async fn onboarding_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
    payload: Result<Json<OnboardingForm>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return json_rejection(rejection),
    };
    match services
        .workspace
        .onboard(&identity(&headers), form, Utc::now())
    {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
) -> Response
where
    S: DocumentStore + 'static,
{
    match services.dashboard.summary(&identity(&headers), Utc::now()) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn refresh_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
) -> Response
where
    S: DocumentStore + 'static,
{
    match services
        .dashboard
        .refresh_health(&identity(&headers), Utc::now())
    {
        Ok(refresh) => (StatusCode::OK, Json(refresh)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn task_board_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
) -> Response
where
    S: DocumentStore + 'static,
{
    match services.dashboard.task_board(&identity(&headers)) {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_task_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let task = match payload {
        Ok(Json(task)) => task,
        Err(rejection) => return json_rejection(rejection),
    };
    match services
        .workspace
        .create_task(&identity(&headers), task, Utc::now())
    {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_task_handler<S>(
    State(services): State<AppServices<S>>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return json_rejection(rejection),
    };
    match services
        .workspace
        .update_task(&identity(&headers), &task_id, update)
    {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn directory_handler<S>(
    State(services): State<AppServices<S>>,
    Path(surface): Path<String>,
    headers: HeaderMap,
    query: Result<Query<DirectoryFilter>, QueryRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let filter = match query {
        Ok(Query(filter)) => filter,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };
    let surface = match surface.parse::<DirectorySurface>() {
        Ok(surface) => surface,
        Err(message) => {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
        }
    };

    match services
        .directory
        .browse(&identity(&headers), surface, &filter)
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn connection_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
    payload: Result<Json<ConnectionRequestBody>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return json_rejection(rejection),
    };
    let target = StartupId(body.to_id);
    match services
        .directory
        .send_connection_request(&identity(&headers), &target, Utc::now())
    {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn admin_list_handler<S>(
    State(services): State<AppServices<S>>,
    headers: HeaderMap,
) -> Response
where
    S: DocumentStore + 'static,
{
    match services.admin.overview(&identity(&headers)) {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn admin_review_handler<S>(
    State(services): State<AppServices<S>>,
    Path(startup_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ReviewRequestBody>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return json_rejection(rejection),
    };
    let startup_id = StartupId(startup_id);
    match services
        .admin
        .review(&identity(&headers), &startup_id, body.decision, Utc::now())
    {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Read the caller identity from the session header; a missing or blank header is anonymous.
pub fn identity(headers: &HeaderMap) -> Identity {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Identity::signed_in)
        .unwrap_or_default()
}

pub(crate) fn service_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::ProfileNotFound(_)
        | ServiceError::TaskNotFound(_)
        | ServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::DuplicateRequest(_)
        | ServiceError::AlreadyOnboarded(_)
        | ServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ServiceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn error_response(error: ServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (service_status(&error), Json(payload)).into_response()
}

/// Malformed bodies get the same `{"error": ..}` shape as service failures.
fn json_rejection(rejection: JsonRejection) -> Response {
    rejection_response(rejection.status(), rejection.body_text())
}

fn rejection_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
