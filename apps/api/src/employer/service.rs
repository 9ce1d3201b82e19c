use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::{CandidateProfile, ProfileCv};
use crate::models::employer::{EmployerProfile, EmployerProfileUpdate};
use crate::models::job_post::{JobPost, JobPostCreate};
use crate::pagination::{Page, PageRequest};
use crate::store::RecordStore;
use crate::workflow;

/// Flattened row of the per-job application list.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub candidate_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub candidate_profile: Option<CandidateProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub candidate_id: Uuid,
    pub profile_cv: Option<ProfileCv>,
}

pub async fn get_profile(
    store: &dyn RecordStore,
    employer_id: Uuid,
) -> Result<EmployerProfile, AppError> {
    store
        .employer_profile(employer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employer profile not found".to_string()))
}

pub async fn update_profile(
    store: &dyn RecordStore,
    employer_id: Uuid,
    update: EmployerProfileUpdate,
) -> Result<EmployerProfile, AppError> {
    if update.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    let mut profile = get_profile(store, employer_id).await?;
    update.apply_to(&mut profile);
    if profile.company_name.trim().is_empty() {
        return Err(AppError::Validation("Company name is required".to_string()));
    }
    if !store.replace_employer_profile(&profile).await? {
        return Err(AppError::NotFound("Employer profile not found".to_string()));
    }

    info!(%employer_id, "Employer profile updated");
    Ok(profile)
}

pub async fn create_job_post(
    store: &dyn RecordStore,
    employer_id: Uuid,
    input: JobPostCreate,
) -> Result<JobPost, AppError> {
    if input.job_ad_title.trim().is_empty() {
        return Err(AppError::Validation("Job ad title is required".to_string()));
    }
    if input.number_of_positions < 1 {
        return Err(AppError::Validation(
            "number_of_positions must be >= 1".to_string(),
        ));
    }
    // A post must hang off an existing company profile.
    get_profile(store, employer_id).await?;

    let job = input.into_job_post(employer_id);
    store.insert_job_post(&job).await?;

    info!(job_id = %job.id, %employer_id, title = %job.job_ad_title, "Job post created");
    Ok(job)
}

pub async fn list_job_posts(
    store: &dyn RecordStore,
    employer_id: Uuid,
    title: Option<&str>,
    page: PageRequest,
) -> Result<Page<JobPost>, AppError> {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let (jobs, total) = store.employer_job_posts(employer_id, title, page).await?;
    Ok(Page::new(jobs, total, page))
}

/// Resolves a job the caller owns. Missing jobs are `NotFound`; someone
/// else's job is `Forbidden`.
async fn owned_job(
    store: &dyn RecordStore,
    employer_id: Uuid,
    job_id: Uuid,
) -> Result<JobPost, AppError> {
    let job = store
        .job_post(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job post not found".to_string()))?;
    if job.employer_id != employer_id {
        warn!(%job_id, %employer_id, "Employer does not own job post");
        return Err(AppError::Forbidden(
            "You are not authorized to access this job post".to_string(),
        ));
    }
    Ok(job)
}

/// An application on `job_id`. Applications on other jobs are `NotFound`.
async fn job_application(
    store: &dyn RecordStore,
    job_id: Uuid,
    application_id: Uuid,
) -> Result<Application, AppError> {
    store
        .application(application_id)
        .await?
        .filter(|a| a.job_id == job_id)
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
}

pub async fn list_applications(
    store: &dyn RecordStore,
    employer_id: Uuid,
    job_id: Uuid,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationSummary>, AppError> {
    owned_job(store, employer_id, job_id).await?;
    let applications = store.applications_for_job(job_id, status).await?;

    let mut summaries = Vec::with_capacity(applications.len());
    for application in applications {
        let user = store.find_user(application.candidate_id).await?;
        let candidate_profile = store.candidate_profile(application.candidate_id).await?;
        summaries.push(ApplicationSummary {
            application_id: application.id,
            job_id: application.job_id,
            status: application.status,
            created_at: application.created_at,
            candidate_id: application.candidate_id,
            first_name: user.as_ref().map(|u| u.first_name.clone()),
            last_name: user.as_ref().map(|u| u.last_name.clone()),
            email: user.map(|u| u.email),
            candidate_profile,
        });
    }
    Ok(summaries)
}

pub async fn application_detail(
    store: &dyn RecordStore,
    employer_id: Uuid,
    job_id: Uuid,
    application_id: Uuid,
) -> Result<ApplicationDetail, AppError> {
    owned_job(store, employer_id, job_id).await?;
    let application = job_application(store, job_id, application_id).await?;
    let profile = store.candidate_profile(application.candidate_id).await?;

    Ok(ApplicationDetail {
        application_id: application.id,
        status: application.status,
        candidate_id: application.candidate_id,
        profile_cv: profile.map(|p| p.profile_cv),
    })
}

pub async fn approve(
    store: &dyn RecordStore,
    employer_id: Uuid,
    job_id: Uuid,
    application_id: Uuid,
) -> Result<Application, AppError> {
    owned_job(store, employer_id, job_id).await?;
    let application = job_application(store, job_id, application_id).await?;

    let application = workflow::commit(store, application, workflow::approve).await?;
    info!(%application_id, %job_id, %employer_id, "Application approved");
    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::service::fixtures::{employer_registration, user_create};
    use crate::auth::service::{register_candidate, register_employer};
    use crate::candidate::service as candidate;
    use crate::models::job_post::fixtures::job_create;
    use crate::state::AppState;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    async fn employer(state: &AppState, email: &str) -> Uuid {
        register_employer(
            state.store.as_ref(),
            &state.credentials,
            employer_registration(email),
        )
        .await
        .unwrap()
        .user
        .id
    }

    async fn candidate_id(state: &AppState, email: &str) -> Uuid {
        register_candidate(state.store.as_ref(), &state.credentials, user_create(email))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_job_post_validates_input() {
        let state = AppState::for_tests();
        let id = employer(&state, "hr@corp.rw").await;

        let mut input = job_create("  ");
        assert!(matches!(
            create_job_post(state.store.as_ref(), id, input.clone()).await,
            Err(AppError::Validation(_))
        ));
        input.job_ad_title = "Backend Engineer".to_string();
        input.number_of_positions = 0;
        assert!(matches!(
            create_job_post(state.store.as_ref(), id, input).await,
            Err(AppError::Validation(_))
        ));

        let job = create_job_post(state.store.as_ref(), id, job_create("Backend Engineer"))
            .await
            .unwrap();
        assert_eq!(job.employer_id, id);
    }

    #[tokio::test]
    async fn test_list_job_posts_filters_own_titles() {
        let state = AppState::for_tests();
        let mine = employer(&state, "hr@corp.rw").await;
        let theirs = employer(&state, "hr@other.rw").await;
        for title in ["Backend Engineer", "Sales Lead"] {
            create_job_post(state.store.as_ref(), mine, job_create(title))
                .await
                .unwrap();
        }
        create_job_post(state.store.as_ref(), theirs, job_create("Backend Engineer"))
            .await
            .unwrap();

        let page = PageRequest::new(1, 10).unwrap();
        let all = list_job_posts(state.store.as_ref(), mine, None, page).await.unwrap();
        assert_eq!(all.total_count, 2);
        let filtered = list_job_posts(state.store.as_ref(), mine, Some("BACKEND"), page)
            .await
            .unwrap();
        assert_eq!(filtered.total_count, 1);
        assert_eq!(filtered.data[0].job_ad_title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let state = AppState::for_tests();
        let id = employer(&state, "hr@corp.rw").await;
        let update: EmployerProfileUpdate = serde_json::from_str(r#"{"city":"Huye"}"#).unwrap();
        let profile = update_profile(state.store.as_ref(), id, update).await.unwrap();
        assert_eq!(profile.city, "Huye");
        assert_eq!(profile.company_name, "Umurage Ltd");
        assert_eq!(get_profile(state.store.as_ref(), id).await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_foreign_job_is_forbidden() {
        let state = AppState::for_tests();
        let owner = employer(&state, "hr@corp.rw").await;
        let intruder = employer(&state, "hr@other.rw").await;
        let job = create_job_post(state.store.as_ref(), owner, job_create("Backend Engineer"))
            .await
            .unwrap();

        let listed = list_applications(state.store.as_ref(), intruder, job.id, None).await;
        assert!(matches!(listed, Err(AppError::Forbidden(_))));
        let approved = approve(state.store.as_ref(), intruder, job.id, Uuid::new_v4()).await;
        assert!(matches!(approved, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_approve_once_then_terminal() {
        let state = AppState::for_tests();
        let owner = employer(&state, "hr@corp.rw").await;
        let applicant = candidate_id(&state, "a@example.com").await;
        let job = create_job_post(state.store.as_ref(), owner, job_create("Backend Engineer"))
            .await
            .unwrap();
        let application = candidate::apply(state.store.as_ref(), applicant, job.id)
            .await
            .unwrap();

        let approved = approve(state.store.as_ref(), owner, job.id, application.id)
            .await
            .unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        assert!(approved.updated_at.is_some());

        let again = approve(state.store.as_ref(), owner, job.id, application.id).await;
        assert!(matches!(again, Err(AppError::InvalidTransition(_))));
        let withdraw = candidate::withdraw(state.store.as_ref(), applicant, application.id).await;
        assert!(matches!(withdraw, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_approve_after_withdraw_is_invalid() {
        let state = AppState::for_tests();
        let owner = employer(&state, "hr@corp.rw").await;
        let applicant = candidate_id(&state, "a@example.com").await;
        let job = create_job_post(state.store.as_ref(), owner, job_create("Backend Engineer"))
            .await
            .unwrap();
        let application = candidate::apply(state.store.as_ref(), applicant, job.id)
            .await
            .unwrap();
        candidate::withdraw(state.store.as_ref(), applicant, application.id)
            .await
            .unwrap();

        let result = approve(state.store.as_ref(), owner, job.id, application.id).await;
        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_approve_racing_withdraw_reports_invalid_transition() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_memory_store(store.clone());
        let owner = employer(&state, "hr@corp.rw").await;
        let applicant = candidate_id(&state, "a@example.com").await;
        let job = create_job_post(state.store.as_ref(), owner, job_create("Backend Engineer"))
            .await
            .unwrap();
        let application = candidate::apply(state.store.as_ref(), applicant, job.id)
            .await
            .unwrap();

        // The candidate withdraws between the employer's read and write.
        store
            .interleave_transition(application.id, ApplicationStatus::Withdrawn)
            .await;
        let result = approve(state.store.as_ref(), owner, job.id, application.id).await;
        assert!(matches!(result, Err(AppError::InvalidTransition(_))), "{result:?}");

        let stored = state.store.application(application.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Withdrawn);
    }

    #[tokio::test]
    async fn test_application_on_other_job_not_found() {
        let state = AppState::for_tests();
        let owner = employer(&state, "hr@corp.rw").await;
        let applicant = candidate_id(&state, "a@example.com").await;
        let first = create_job_post(state.store.as_ref(), owner, job_create("Backend Engineer"))
            .await
            .unwrap();
        let second = create_job_post(state.store.as_ref(), owner, job_create("Data Engineer"))
            .await
            .unwrap();
        let application = candidate::apply(state.store.as_ref(), applicant, first.id)
            .await
            .unwrap();

        let result = approve(state.store.as_ref(), owner, second.id, application.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_applications_joins_candidate_and_filters_status() {
        let state = AppState::for_tests();
        let owner = employer(&state, "hr@corp.rw").await;
        let a = candidate_id(&state, "a@example.com").await;
        let b = candidate_id(&state, "b@example.com").await;
        let job = create_job_post(state.store.as_ref(), owner, job_create("Backend Engineer"))
            .await
            .unwrap();
        let first = candidate::apply(state.store.as_ref(), a, job.id).await.unwrap();
        candidate::apply(state.store.as_ref(), b, job.id).await.unwrap();
        approve(state.store.as_ref(), owner, job.id, first.id)
            .await
            .unwrap();

        let all = list_applications(state.store.as_ref(), owner, job.id, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|s| s.candidate_profile.is_some()));

        let approved = list_applications(
            state.store.as_ref(),
            owner,
            job.id,
            Some(ApplicationStatus::Approved),
        )
        .await
        .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].email.as_deref(), Some("a@example.com"));

        let detail = application_detail(state.store.as_ref(), owner, job.id, first.id)
            .await
            .unwrap();
        assert_eq!(detail.candidate_id, a);
        assert!(detail.profile_cv.is_some());
    }
}
