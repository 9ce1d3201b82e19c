use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extract::CandidateUser;
use crate::candidate::service::{
    self, CandidateApplication, JobCriteriaUpdate, ProfileCvUpdate, SkillsUpdate, UploadedFile,
};
use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::candidate::{CandidateProfile, DesiredSalary, ExperienceLevel, ProfileCv, Region};
use crate::models::job_post::{JobFilter, JobPost};
use crate::pagination::{Page, PageParams, PageRequest, LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobSearchQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub region: Option<Region>,
    pub city: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_ad_title: Option<String>,
    pub offered_salary: Option<DesiredSalary>,
}

impl JobSearchQuery {
    /// `?city=` and `?job_ad_title=` with blank values mean "not filtered".
    fn filter(&self) -> JobFilter {
        JobFilter {
            region: self.region,
            city: non_blank(self.city.as_deref()),
            experience_level: self.experience_level,
            job_ad_title: non_blank(self.job_ad_title.as_deref()),
            offered_salary: self.offered_salary,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[derive(Deserialize)]
pub struct ApplicationsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub job_ad_title: Option<String>,
}

/// GET /candidate/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
) -> Result<Json<CandidateProfile>, AppError> {
    Ok(Json(service::get_profile(state.store.as_ref(), user.id).await?))
}

/// PATCH /candidate/profile/update
pub async fn handle_update_profile_cv(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Json(req): Json<ProfileCvUpdate>,
) -> Result<Json<CandidateProfile>, AppError> {
    let profile = service::update_profile_cv(state.store.as_ref(), user.id, req).await?;
    Ok(Json(profile))
}

/// PATCH /candidate/job_criteria/update
pub async fn handle_update_job_criteria(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Json(req): Json<JobCriteriaUpdate>,
) -> Result<Json<CandidateProfile>, AppError> {
    let profile = service::update_job_criteria(state.store.as_ref(), user.id, req).await?;
    Ok(Json(profile))
}

/// PATCH /candidate/skills/update
pub async fn handle_update_skills(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Json(req): Json<SkillsUpdate>,
) -> Result<Json<CandidateProfile>, AppError> {
    let profile = service::update_skills(state.store.as_ref(), user.id, req).await?;
    Ok(Json(profile))
}

/// PATCH /candidate/profile_files/edit
///
/// Expects two file parts, `profile_pic` and `cv_file`. Other parts are ignored.
pub async fn handle_upload_files(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    mut multipart: Multipart,
) -> Result<Json<ProfileCv>, AppError> {
    let mut profile_pic = None;
    let mut cv_file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != "profile_pic" && name != "cv_file" {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
        let file = UploadedFile {
            filename,
            content_type,
            bytes,
        };
        if name == "profile_pic" {
            profile_pic = Some(file);
        } else {
            cv_file = Some(file);
        }
    }

    let profile_pic =
        profile_pic.ok_or_else(|| AppError::Validation("profile_pic is required".to_string()))?;
    let cv_file = cv_file.ok_or_else(|| AppError::Validation("cv_file is required".to_string()))?;

    let profile_cv = service::upload_profile_files(
        state.store.as_ref(),
        state.files.as_ref(),
        user.id,
        profile_pic,
        cv_file,
    )
    .await?;
    Ok(Json(profile_cv))
}

/// GET /candidate/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    CandidateUser(_): CandidateUser,
    Query(query): Query<JobSearchQuery>,
) -> Result<Json<Page<JobPost>>, AppError> {
    let page = PageRequest::from_params(
        PageParams {
            page: query.page,
            limit: query.limit,
        },
        LIST_DEFAULT_LIMIT,
        Some(LIST_MAX_LIMIT),
    )?;
    let filter = query.filter();
    Ok(Json(service::list_jobs(state.store.as_ref(), &filter, page).await?))
}

/// GET /candidate/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    CandidateUser(_): CandidateUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobPost>, AppError> {
    Ok(Json(service::get_job(state.store.as_ref(), job_id).await?))
}

/// POST /candidate/jobs/apply/:job_id
pub async fn handle_apply(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Path(job_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let application = service::apply(state.store.as_ref(), user.id, job_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /candidate/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Query(query): Query<ApplicationsQuery>,
) -> Result<Json<Page<CandidateApplication>>, AppError> {
    let page = PageRequest::from_params(
        PageParams {
            page: query.page,
            limit: query.limit,
        },
        LIST_DEFAULT_LIMIT,
        Some(LIST_MAX_LIMIT),
    )?;
    let result = service::list_applications(
        state.store.as_ref(),
        user.id,
        non_blank(query.job_ad_title.as_deref()).as_deref(),
        page,
    )
    .await?;
    Ok(Json(result))
}

/// PATCH /candidate/applications/:application_id
pub async fn handle_withdraw(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Application>, AppError> {
    let application = service::withdraw(state.store.as_ref(), user.id, application_id).await?;
    Ok(Json(application))
}
