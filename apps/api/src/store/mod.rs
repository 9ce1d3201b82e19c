//! Record store boundary.
//!
//! Services receive an `Arc<dyn RecordStore>` built by `main`. `PgStore` is the
//! production backend; `MemoryStore` backs the test suite.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::{CandidateProfile, CandidateSection};
use crate::models::employer::EmployerProfile;
use crate::models::job_post::{JobFilter, JobPost};
use crate::models::user::User;
use crate::pagination::PageRequest;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub const DUPLICATE_EMAIL: &str = "Email already registered";
pub const DUPLICATE_APPLICATION: &str = "You have already applied for this job";

/// The five collections exposed through the bulk data endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    CandidateProfiles,
    EmployerProfiles,
    JobPosts,
    Applications,
}

/// A document field the dashboard reports group by. List-valued fields are
/// un-nested, so a document counts once per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    /// `job_criteria.geographical_mobility[]`
    CandidateRegion,
    /// `skills.skill_description`, blanks skipped
    CandidateSkillDescription,
    /// `profile_cv.education[].level`
    CandidateEducationLevel,
    /// `skills.spoken_languages[].language`
    CandidateLanguage,
    /// `job_criteria.seeked_jobs[]`
    CandidateSeekedJob,
    /// `company_industry[]`
    EmployerIndustry,
    EmployerCity,
    JobCategory,
    JobEducationLevel,
    JobSector,
    JobType,
    JobRegion,
    JobExperienceLevel,
    ApplicationStatus,
}

/// Application count of one job post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTally {
    pub job_id: Uuid,
    pub job_ad_title: String,
    pub applications: u64,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::CandidateProfiles => "candidate_profiles",
            Collection::EmployerProfiles => "employer_profiles",
            Collection::JobPosts => "job_posts",
            Collection::Applications => "applications",
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    // Users and registration. Each registration writes the user and its
    // profile together or not at all.
    async fn insert_candidate(&self, user: &User, profile: &CandidateProfile) -> StoreResult<()>;
    async fn insert_employer(&self, user: &User, profile: &EmployerProfile) -> StoreResult<()>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    // Candidate profiles.
    async fn candidate_profile(&self, candidate_id: Uuid) -> StoreResult<Option<CandidateProfile>>;
    /// Replaces one nested section. Returns `false` when no profile matched.
    async fn replace_candidate_section(
        &self,
        candidate_id: Uuid,
        section: CandidateSection,
    ) -> StoreResult<bool>;

    // Employer profiles.
    async fn employer_profile(&self, employer_id: Uuid) -> StoreResult<Option<EmployerProfile>>;
    async fn replace_employer_profile(&self, profile: &EmployerProfile) -> StoreResult<bool>;

    // Job posts.
    async fn insert_job_post(&self, job: &JobPost) -> StoreResult<()>;
    async fn job_post(&self, id: Uuid) -> StoreResult<Option<JobPost>>;
    async fn search_job_posts(
        &self,
        filter: &JobFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<JobPost>, u64)>;
    async fn employer_job_posts(
        &self,
        employer_id: Uuid,
        title_contains: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<(Vec<JobPost>, u64)>;

    // Applications.
    /// Fails with `StoreError::Conflict` if the (candidate, job) pair exists.
    async fn insert_application(&self, application: &Application) -> StoreResult<()>;
    async fn application(&self, id: Uuid) -> StoreResult<Option<Application>>;
    /// Compare-and-set on the status: writes `to` only while the stored status
    /// is still `from`. Returns `false` if nothing was updated.
    async fn transition_application(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> StoreResult<bool>;
    async fn applications_for_job(
        &self,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<Vec<Application>>;
    async fn applications_for_candidate(&self, candidate_id: Uuid) -> StoreResult<Vec<Application>>;

    // Aggregates for the dashboard. Rows are unordered.
    async fn group_counts(&self, field: GroupField) -> StoreResult<Vec<(String, u64)>>;
    /// Employer profiles per distinct `number_of_employees`, `None` when unset.
    async fn employee_headcounts(&self) -> StoreResult<Vec<(Option<i64>, u64)>>;
    /// The `limit` busiest job posts: applications descending, then title and
    /// id ascending. Posts without applications are included with zero.
    async fn busiest_job_posts(&self, limit: u64) -> StoreResult<Vec<JobTally>>;

    // Generic collection access.
    async fn count(&self, collection: Collection) -> StoreResult<u64>;
    async fn page_documents(
        &self,
        collection: Collection,
        page: PageRequest,
    ) -> StoreResult<Vec<serde_json::Value>>;

    async fn close(&self);
}
