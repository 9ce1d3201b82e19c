use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::{CandidateProfile, CandidateSection};
use crate::models::employer::EmployerProfile;
use crate::models::job_post::{title_contains, JobFilter, JobPost};
use crate::models::user::User;
use crate::pagination::PageRequest;
use crate::store::{
    Collection, GroupField, JobTally, RecordStore, StoreError, StoreResult, DUPLICATE_APPLICATION,
    DUPLICATE_EMAIL,
};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    candidate_profiles: Vec<CandidateProfile>,
    employer_profiles: Vec<EmployerProfile>,
    job_posts: Vec<JobPost>,
    applications: Vec<Application>,
}

/// In-process store with the same constraints as the Postgres schema.
/// Insertion order is the natural order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    interleaved: Mutex<Option<(Uuid, ApplicationStatus)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates another writer: the next `transition_application` call first
    /// finds application `id` already moved to `status`.
    pub async fn interleave_transition(&self, id: Uuid, status: ApplicationStatus) {
        *self.interleaved.lock().await = Some((id, status));
    }
}

fn check_email_free(collections: &Collections, email: &str) -> StoreResult<()> {
    if collections.users.iter().any(|u| u.email == email) {
        return Err(StoreError::Conflict(DUPLICATE_EMAIL.to_string()));
    }
    Ok(())
}

/// Keys of `field` in every document, lists un-nested.
fn group_keys(c: &Collections, field: GroupField) -> Vec<String> {
    let candidates = c.candidate_profiles.iter();
    let criteria = || c.candidate_profiles.iter().filter_map(|p| p.job_criteria.as_ref());
    let jobs = || c.job_posts.iter();
    let keys: Vec<&str> = match field {
        GroupField::CandidateRegion => criteria()
            .flat_map(|j| j.geographical_mobility.iter().map(|r| r.as_str()))
            .collect(),
        GroupField::CandidateSkillDescription => candidates
            .filter_map(|p| p.skills.skill_description.as_deref())
            .filter(|d| !d.trim().is_empty())
            .collect(),
        GroupField::CandidateEducationLevel => candidates
            .flat_map(|p| p.profile_cv.education.iter().map(|e| e.level.as_str()))
            .collect(),
        GroupField::CandidateLanguage => candidates
            .flat_map(|p| p.skills.spoken_languages.iter().map(|l| l.language.as_str()))
            .collect(),
        GroupField::CandidateSeekedJob => criteria()
            .flat_map(|j| j.seeked_jobs.iter().map(String::as_str))
            .collect(),
        GroupField::EmployerIndustry => c
            .employer_profiles
            .iter()
            .flat_map(|p| p.company_industry.iter().map(|i| i.as_str()))
            .collect(),
        GroupField::EmployerCity => c.employer_profiles.iter().map(|p| p.city.as_str()).collect(),
        GroupField::JobCategory => jobs().map(|j| j.job_category.as_str()).collect(),
        GroupField::JobEducationLevel => jobs().map(|j| j.education_level_required.as_str()).collect(),
        GroupField::JobSector => jobs().map(|j| j.sector.as_str()).collect(),
        GroupField::JobType => jobs().map(|j| j.job_type.as_str()).collect(),
        GroupField::JobRegion => jobs().map(|j| j.region.as_str()).collect(),
        GroupField::JobExperienceLevel => jobs().map(|j| j.experience_level.as_str()).collect(),
        GroupField::ApplicationStatus => c.applications.iter().map(|a| a.status.as_str()).collect(),
    };
    keys.into_iter().map(str::to_string).collect()
}

fn tally<K: Eq + Hash>(keys: impl IntoIterator<Item = K>) -> Vec<(K, u64)> {
    let mut counts: HashMap<K, u64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

fn to_values<T: serde::Serialize>(items: &[T]) -> StoreResult<Vec<serde_json::Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_candidate(&self, user: &User, profile: &CandidateProfile) -> StoreResult<()> {
        let mut c = self.inner.write().await;
        check_email_free(&c, &user.email)?;
        c.users.push(user.clone());
        c.candidate_profiles.push(profile.clone());
        Ok(())
    }

    async fn insert_employer(&self, user: &User, profile: &EmployerProfile) -> StoreResult<()> {
        let mut c = self.inner.write().await;
        check_email_free(&c, &user.email)?;
        c.users.push(user.clone());
        c.employer_profiles.push(profile.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.users.iter().find(|u| u.email == email).cloned())
    }

    async fn candidate_profile(&self, candidate_id: Uuid) -> StoreResult<Option<CandidateProfile>> {
        let c = self.inner.read().await;
        Ok(c
            .candidate_profiles
            .iter()
            .find(|p| p.candidate_id == candidate_id)
            .cloned())
    }

    async fn replace_candidate_section(
        &self,
        candidate_id: Uuid,
        section: CandidateSection,
    ) -> StoreResult<bool> {
        let mut c = self.inner.write().await;
        match c
            .candidate_profiles
            .iter_mut()
            .find(|p| p.candidate_id == candidate_id)
        {
            Some(profile) => {
                section.apply_to(profile);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn employer_profile(&self, employer_id: Uuid) -> StoreResult<Option<EmployerProfile>> {
        let c = self.inner.read().await;
        Ok(c.employer_profiles
            .iter()
            .find(|p| p.employer_id == employer_id)
            .cloned())
    }

    async fn replace_employer_profile(&self, profile: &EmployerProfile) -> StoreResult<bool> {
        let mut c = self.inner.write().await;
        match c
            .employer_profiles
            .iter_mut()
            .find(|p| p.employer_id == profile.employer_id)
        {
            Some(existing) => {
                *existing = profile.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_job_post(&self, job: &JobPost) -> StoreResult<()> {
        self.inner.write().await.job_posts.push(job.clone());
        Ok(())
    }

    async fn job_post(&self, id: Uuid) -> StoreResult<Option<JobPost>> {
        let c = self.inner.read().await;
        Ok(c.job_posts.iter().find(|j| j.id == id).cloned())
    }

    async fn search_job_posts(
        &self,
        filter: &JobFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<JobPost>, u64)> {
        let c = self.inner.read().await;
        let matching: Vec<JobPost> = c
            .job_posts
            .iter()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect();
        Ok((page.slice(&matching), matching.len() as u64))
    }

    async fn employer_job_posts(
        &self,
        employer_id: Uuid,
        title: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<(Vec<JobPost>, u64)> {
        let c = self.inner.read().await;
        let matching: Vec<JobPost> = c
            .job_posts
            .iter()
            .filter(|j| j.employer_id == employer_id)
            .filter(|j| title.map_or(true, |t| title_contains(&j.job_ad_title, t)))
            .cloned()
            .collect();
        Ok((page.slice(&matching), matching.len() as u64))
    }

    async fn insert_application(&self, application: &Application) -> StoreResult<()> {
        let mut c = self.inner.write().await;
        let duplicate = c.applications.iter().any(|a| {
            a.candidate_id == application.candidate_id && a.job_id == application.job_id
        });
        if duplicate {
            return Err(StoreError::Conflict(DUPLICATE_APPLICATION.to_string()));
        }
        c.applications.push(application.clone());
        Ok(())
    }

    async fn application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let c = self.inner.read().await;
        Ok(c.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn transition_application(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut c = self.inner.write().await;
        if let Some((raced, status)) = self.interleaved.lock().await.take() {
            if let Some(application) = c.applications.iter_mut().find(|a| a.id == raced) {
                application.status = status;
                application.updated_at = Some(Utc::now());
            }
        }
        match c
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.status == from)
        {
            Some(application) => {
                application.status = to;
                application.updated_at = Some(updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn applications_for_job(
        &self,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<Vec<Application>> {
        let c = self.inner.read().await;
        Ok(c.applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect())
    }

    async fn applications_for_candidate(&self, candidate_id: Uuid) -> StoreResult<Vec<Application>> {
        let c = self.inner.read().await;
        Ok(c.applications
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn group_counts(&self, field: GroupField) -> StoreResult<Vec<(String, u64)>> {
        let c = self.inner.read().await;
        Ok(tally(group_keys(&c, field)))
    }

    async fn employee_headcounts(&self) -> StoreResult<Vec<(Option<i64>, u64)>> {
        let c = self.inner.read().await;
        Ok(tally(c.employer_profiles.iter().map(|p| p.number_of_employees)))
    }

    async fn busiest_job_posts(&self, limit: u64) -> StoreResult<Vec<JobTally>> {
        let c = self.inner.read().await;
        let mut tallies: Vec<JobTally> = c
            .job_posts
            .iter()
            .map(|job| JobTally {
                job_id: job.id,
                job_ad_title: job.job_ad_title.clone(),
                applications: c.applications.iter().filter(|a| a.job_id == job.id).count() as u64,
            })
            .collect();
        tallies.sort_by(|a, b| {
            b.applications
                .cmp(&a.applications)
                .then_with(|| a.job_ad_title.cmp(&b.job_ad_title))
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        tallies.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(tallies)
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let c = self.inner.read().await;
        let n = match collection {
            Collection::Users => c.users.len(),
            Collection::CandidateProfiles => c.candidate_profiles.len(),
            Collection::EmployerProfiles => c.employer_profiles.len(),
            Collection::JobPosts => c.job_posts.len(),
            Collection::Applications => c.applications.len(),
        };
        Ok(n as u64)
    }

    async fn page_documents(
        &self,
        collection: Collection,
        page: PageRequest,
    ) -> StoreResult<Vec<serde_json::Value>> {
        let c = self.inner.read().await;
        match collection {
            Collection::Users => to_values(&page.slice(&c.users)),
            Collection::CandidateProfiles => to_values(&page.slice(&c.candidate_profiles)),
            Collection::EmployerProfiles => to_values(&page.slice(&c.employer_profiles)),
            Collection::JobPosts => to_values(&page.slice(&c.job_posts)),
            Collection::Applications => to_values(&page.slice(&c.applications)),
        }
    }

    async fn close(&self) {}
}
