//! Candidate-side operations. Every function is scoped to the caller's own
//! candidate id, so cross-user access is impossible by construction.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::{
    Availability, CandidateProfile, CandidateSection, ContractType, DesiredSalary, Education,
    Experience, JobCriteria, ProfileCv, Region, Skills, SpokenLanguage,
};
use crate::models::employer::EmployerProfile;
use crate::models::job_post::{title_contains, JobFilter, JobPost};
use crate::pagination::{Page, PageRequest};
use crate::storage::{object_key, FileStorage};
use crate::store::RecordStore;
use crate::workflow;

// Partial updates. An absent field keeps the stored value; a present one
// replaces it, so `[]` or `""` deliberately clears.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileCvUpdate {
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobCriteriaUpdate {
    pub seeked_jobs: Option<Vec<String>>,
    pub business_sectors: Option<Vec<String>>,
    pub availability: Option<Vec<Availability>>,
    pub geographical_mobility: Option<Vec<Region>>,
    pub desired_contract_type: Option<ContractType>,
    pub desired_salary: Option<DesiredSalary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillsUpdate {
    pub skill_description: Option<String>,
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    pub expertise: Option<String>,
}

/// A file part received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// One of the caller's applications joined with its job post and company.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateApplication {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub job_post: JobPost,
    pub employer_profile: Option<EmployerProfile>,
}

/// Present-but-blank text clears the field.
fn merge_text(incoming: Option<String>, stored: Option<String>) -> Option<String> {
    match incoming {
        None => stored,
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value.trim().to_string()),
    }
}

fn merge_profile_cv(stored: ProfileCv, update: ProfileCvUpdate) -> ProfileCv {
    ProfileCv {
        picture: stored.picture,
        cv_file: stored.cv_file,
        experience: update.experience.unwrap_or(stored.experience),
        education: update.education.unwrap_or(stored.education),
        linkedin: merge_text(update.linkedin, stored.linkedin),
    }
}

fn merge_job_criteria(stored: JobCriteria, update: JobCriteriaUpdate) -> JobCriteria {
    JobCriteria {
        seeked_jobs: update.seeked_jobs.unwrap_or(stored.seeked_jobs),
        business_sectors: update.business_sectors.unwrap_or(stored.business_sectors),
        availability: update.availability.unwrap_or(stored.availability),
        geographical_mobility: update
            .geographical_mobility
            .unwrap_or(stored.geographical_mobility),
        desired_contract_type: update.desired_contract_type.or(stored.desired_contract_type),
        desired_salary: update.desired_salary.or(stored.desired_salary),
    }
}

fn merge_skills(stored: Skills, update: SkillsUpdate) -> Skills {
    Skills {
        skill_description: merge_text(update.skill_description, stored.skill_description),
        spoken_languages: update.spoken_languages.unwrap_or(stored.spoken_languages),
        expertise: merge_text(update.expertise, stored.expertise),
    }
}

pub async fn get_profile(
    store: &dyn RecordStore,
    candidate_id: Uuid,
) -> Result<CandidateProfile, AppError> {
    store
        .candidate_profile(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))
}

/// Writes one section back whole and returns the updated profile.
async fn replace_section(
    store: &dyn RecordStore,
    mut profile: CandidateProfile,
    section: CandidateSection,
) -> Result<CandidateProfile, AppError> {
    let field = section.field();
    if !store
        .replace_candidate_section(profile.candidate_id, section.clone())
        .await?
    {
        return Err(AppError::NotFound("Candidate profile not found".to_string()));
    }
    section.apply_to(&mut profile);
    info!(candidate_id = %profile.candidate_id, section = field, "Candidate profile updated");
    Ok(profile)
}

pub async fn update_profile_cv(
    store: &dyn RecordStore,
    candidate_id: Uuid,
    update: ProfileCvUpdate,
) -> Result<CandidateProfile, AppError> {
    let profile = get_profile(store, candidate_id).await?;
    let merged = merge_profile_cv(profile.profile_cv.clone(), update);
    replace_section(store, profile, CandidateSection::ProfileCv(merged)).await
}

pub async fn update_job_criteria(
    store: &dyn RecordStore,
    candidate_id: Uuid,
    update: JobCriteriaUpdate,
) -> Result<CandidateProfile, AppError> {
    let profile = get_profile(store, candidate_id).await?;
    let stored = profile.job_criteria.clone().unwrap_or_default();
    let merged = merge_job_criteria(stored, update);
    replace_section(store, profile, CandidateSection::JobCriteria(merged)).await
}

pub async fn update_skills(
    store: &dyn RecordStore,
    candidate_id: Uuid,
    update: SkillsUpdate,
) -> Result<CandidateProfile, AppError> {
    let profile = get_profile(store, candidate_id).await?;
    let merged = merge_skills(profile.skills.clone(), update);
    replace_section(store, profile, CandidateSection::Skills(merged)).await
}

/// Stores the picture and CV under fresh keys and records their URLs on the
/// profile.
pub async fn upload_profile_files(
    store: &dyn RecordStore,
    files: &dyn FileStorage,
    candidate_id: Uuid,
    profile_pic: UploadedFile,
    cv_file: UploadedFile,
) -> Result<ProfileCv, AppError> {
    for (name, file) in [("profile_pic", &profile_pic), ("cv_file", &cv_file)] {
        if file.bytes.is_empty() {
            return Err(AppError::Validation(format!("{name} must not be empty")));
        }
    }

    let profile = get_profile(store, candidate_id).await?;

    let pic_key = object_key(candidate_id, "profile_pic", profile_pic.filename.as_deref());
    let picture_url = files
        .put(&pic_key, profile_pic.bytes, profile_pic.content_type.as_deref())
        .await?;
    let cv_key = object_key(candidate_id, "cv_file", cv_file.filename.as_deref());
    let cv_url = files
        .put(&cv_key, cv_file.bytes, cv_file.content_type.as_deref())
        .await?;

    let profile_cv = ProfileCv {
        picture: Some(picture_url),
        cv_file: Some(cv_url),
        ..profile.profile_cv.clone()
    };
    let updated = replace_section(store, profile, CandidateSection::ProfileCv(profile_cv)).await?;
    info!(%candidate_id, "Candidate files uploaded");
    Ok(updated.profile_cv)
}

pub async fn list_jobs(
    store: &dyn RecordStore,
    filter: &JobFilter,
    page: PageRequest,
) -> Result<Page<JobPost>, AppError> {
    let (jobs, total) = store.search_job_posts(filter, page).await?;
    Ok(Page::new(jobs, total, page))
}

pub async fn get_job(store: &dyn RecordStore, job_id: Uuid) -> Result<JobPost, AppError> {
    store
        .job_post(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job post not found".to_string()))
}

pub async fn apply(
    store: &dyn RecordStore,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<Application, AppError> {
    let job = get_job(store, job_id).await?;
    let application = Application::new(job.id, candidate_id);
    store.insert_application(&application).await?;

    info!(application_id = %application.id, %job_id, %candidate_id, "Application submitted");
    Ok(application)
}

/// The caller's applications in store order, optionally narrowed to job
/// titles containing `title`. The total counts the narrowed set.
pub async fn list_applications(
    store: &dyn RecordStore,
    candidate_id: Uuid,
    title: Option<&str>,
    page: PageRequest,
) -> Result<Page<CandidateApplication>, AppError> {
    let applications = store.applications_for_candidate(candidate_id).await?;

    let mut joined = Vec::with_capacity(applications.len());
    for application in applications {
        let Some(job_post) = store.job_post(application.job_id).await? else {
            continue;
        };
        if let Some(needle) = title.filter(|t| !t.trim().is_empty()) {
            if !title_contains(&job_post.job_ad_title, needle.trim()) {
                continue;
            }
        }
        let employer_profile = store.employer_profile(job_post.employer_id).await?;
        joined.push(CandidateApplication {
            application_id: application.id,
            status: application.status,
            applied_at: application.created_at,
            updated_at: application.updated_at,
            job_post,
            employer_profile,
        });
    }

    Ok(Page::from_slice(&joined, page))
}

pub async fn withdraw(
    store: &dyn RecordStore,
    candidate_id: Uuid,
    application_id: Uuid,
) -> Result<Application, AppError> {
    let application = store
        .application(application_id)
        .await?
        .filter(|a| a.candidate_id == candidate_id)
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let application = workflow::commit(store, application, workflow::withdraw).await?;
    info!(%application_id, %candidate_id, "Application withdrawn");
    Ok(application)
}
