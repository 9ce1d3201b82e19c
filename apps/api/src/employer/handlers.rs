use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extract::EmployerUser;
use crate::employer::service::{self, ApplicationDetail, ApplicationSummary};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::employer::{EmployerProfile, EmployerProfileUpdate};
use crate::models::job_post::{JobPost, JobPostCreate};
use crate::pagination::{Page, PageParams, PageRequest, LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobPostsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub job_ad_title: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// POST /employer/create_job_post
pub async fn handle_create_job_post(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
    Json(req): Json<JobPostCreate>,
) -> Result<(StatusCode, Json<JobPost>), AppError> {
    let job = service::create_job_post(state.store.as_ref(), user.id, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /employer/get_job_posts
pub async fn handle_list_job_posts(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
    Query(query): Query<JobPostsQuery>,
) -> Result<Json<Page<JobPost>>, AppError> {
    let page = PageRequest::from_params(
        PageParams {
            page: query.page,
            limit: query.limit,
        },
        LIST_DEFAULT_LIMIT,
        Some(LIST_MAX_LIMIT),
    )?;
    let jobs = service::list_job_posts(
        state.store.as_ref(),
        user.id,
        query.job_ad_title.as_deref(),
        page,
    )
    .await?;
    Ok(Json(jobs))
}

/// GET /employer/me/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
) -> Result<Json<EmployerProfile>, AppError> {
    Ok(Json(service::get_profile(state.store.as_ref(), user.id).await?))
}

/// PUT /employer/me/profile/update
pub async fn handle_update_profile(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
    Json(req): Json<EmployerProfileUpdate>,
) -> Result<Json<EmployerProfile>, AppError> {
    let profile = service::update_profile(state.store.as_ref(), user.id, req).await?;
    Ok(Json(profile))
}

/// GET /employer/applications/:job_id
pub async fn handle_list_applications(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
    Path(job_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<ApplicationSummary>>, AppError> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            ApplicationStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown application status: {raw}")))?,
        ),
    };
    let summaries =
        service::list_applications(state.store.as_ref(), user.id, job_id, status).await?;
    Ok(Json(summaries))
}

/// GET /employer/applications/:job_id/:application_id
pub async fn handle_application_detail(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
    Path((job_id, application_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let detail =
        service::application_detail(state.store.as_ref(), user.id, job_id, application_id).await?;
    Ok(Json(detail))
}

/// PATCH /employer/applications/:job_id/:application_id
pub async fn handle_approve(
    State(state): State<AppState>,
    EmployerUser(user): EmployerUser,
    Path((job_id, application_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Application>, AppError> {
    let application =
        service::approve(state.store.as_ref(), user.id, job_id, application_id).await?;
    Ok(Json(application))
}
