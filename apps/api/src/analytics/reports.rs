//! Dashboard reports.
//!
//! Grouping happens in the store (`GROUP BY` in Postgres), so no report loads
//! a whole collection. Rows are merged and ordered here: count descending,
//! then key ascending.

use serde::Serialize;
use uuid::Uuid;

use crate::analytics::buckets::employee_size_bucket;
use crate::analytics::grouping::{count_of, sum_by, top_n, GroupCount};
use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::store::{Collection, GroupField, JobTally, RecordStore};

const TOP_N: usize = 5;

#[derive(Debug, Serialize)]
pub struct RegionalDistribution {
    pub regional_distribution: Vec<GroupCount>,
}

#[derive(Debug, Serialize)]
pub struct OverallSummary {
    pub total_candidates: u64,
    pub total_employers: u64,
    pub total_job_posts: u64,
    pub applications_submitted: u64,
    pub application_status_breakdown: Vec<GroupCount>,
    /// Top job categories by number of posts.
    pub top_industries: Vec<GroupCount>,
}

#[derive(Debug, Serialize)]
pub struct CandidateInsights {
    pub total_candidates: u64,
    pub group_by_skill_description: Vec<GroupCount>,
    pub group_by_education_level: Vec<GroupCount>,
    pub group_by_region: Vec<GroupCount>,
    pub top_languages_known: Vec<GroupCount>,
    pub popular_job_types: Vec<GroupCount>,
}

#[derive(Debug, Serialize)]
pub struct EmployerInsights {
    pub total_employers: u64,
    pub employers_by_industry: Vec<GroupCount>,
    pub employers_by_size: Vec<GroupCount>,
    pub popular_regions_by_employers: Vec<GroupCount>,
}

#[derive(Debug, Serialize)]
pub struct JobPostInsights {
    pub total_job_posts: u64,
    pub jobs_by_education_level_required: Vec<GroupCount>,
    pub jobs_by_business_sector: Vec<GroupCount>,
    pub jobs_by_job_type: Vec<GroupCount>,
    pub jobs_by_region: Vec<GroupCount>,
    pub jobs_by_experience_level_required: Vec<GroupCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobApplicationCount {
    pub job_id: Uuid,
    pub job_ad_title: String,
    pub applications_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ApplicationInsights {
    pub total_applications: u64,
    pub applications_by_status: Vec<GroupCount>,
    pub average_applications_per_job_post: f64,
    pub top_job_posts_by_applications: Vec<JobApplicationCount>,
    /// approved / (approved + rejected); `None` until a decision exists.
    pub approval_rate: Option<f64>,
}

impl From<JobTally> for JobApplicationCount {
    fn from(tally: JobTally) -> Self {
        Self {
            job_id: tally.job_id,
            job_ad_title: tally.job_ad_title,
            applications_count: tally.applications,
        }
    }
}

async fn grouped(store: &dyn RecordStore, field: GroupField) -> Result<Vec<GroupCount>, AppError> {
    Ok(sum_by(store.group_counts(field).await?))
}

/// Folds per-headcount rows into the size histogram.
pub fn employers_by_size_from(headcounts: Vec<(Option<i64>, u64)>) -> Vec<GroupCount> {
    sum_by(
        headcounts
            .into_iter()
            .map(|(employees, count)| (employee_size_bucket(employees), count)),
    )
}

/// approved / (approved + rejected); `None` until a decision exists.
pub fn approval_rate(by_status: &[GroupCount]) -> Option<f64> {
    let approved = count_of(by_status, ApplicationStatus::Approved.as_str());
    let rejected = count_of(by_status, ApplicationStatus::Rejected.as_str());
    match approved + rejected {
        0 => None,
        decided => Some(approved as f64 / decided as f64),
    }
}

/// Every application references an existing post, so this is the mean over
/// all posts, including posts nobody applied to.
pub fn average_per_post(applications: u64, job_posts: u64) -> f64 {
    if job_posts == 0 {
        0.0
    } else {
        applications as f64 / job_posts as f64
    }
}

pub async fn regional_distribution(store: &dyn RecordStore) -> Result<RegionalDistribution, AppError> {
    Ok(RegionalDistribution {
        regional_distribution: grouped(store, GroupField::CandidateRegion).await?,
    })
}

pub async fn overall_summary(store: &dyn RecordStore) -> Result<OverallSummary, AppError> {
    Ok(OverallSummary {
        total_candidates: store.count(Collection::CandidateProfiles).await?,
        total_employers: store.count(Collection::EmployerProfiles).await?,
        total_job_posts: store.count(Collection::JobPosts).await?,
        applications_submitted: store.count(Collection::Applications).await?,
        application_status_breakdown: grouped(store, GroupField::ApplicationStatus).await?,
        top_industries: top_n(grouped(store, GroupField::JobCategory).await?, TOP_N),
    })
}

pub async fn candidate_insights(store: &dyn RecordStore) -> Result<CandidateInsights, AppError> {
    Ok(CandidateInsights {
        total_candidates: store.count(Collection::CandidateProfiles).await?,
        group_by_skill_description: grouped(store, GroupField::CandidateSkillDescription).await?,
        group_by_education_level: grouped(store, GroupField::CandidateEducationLevel).await?,
        group_by_region: grouped(store, GroupField::CandidateRegion).await?,
        top_languages_known: grouped(store, GroupField::CandidateLanguage).await?,
        popular_job_types: grouped(store, GroupField::CandidateSeekedJob).await?,
    })
}

pub async fn employer_insights(store: &dyn RecordStore) -> Result<EmployerInsights, AppError> {
    Ok(EmployerInsights {
        total_employers: store.count(Collection::EmployerProfiles).await?,
        employers_by_industry: grouped(store, GroupField::EmployerIndustry).await?,
        employers_by_size: employers_by_size_from(store.employee_headcounts().await?),
        popular_regions_by_employers: grouped(store, GroupField::EmployerCity).await?,
    })
}

pub async fn job_post_insights(store: &dyn RecordStore) -> Result<JobPostInsights, AppError> {
    Ok(JobPostInsights {
        total_job_posts: store.count(Collection::JobPosts).await?,
        jobs_by_education_level_required: grouped(store, GroupField::JobEducationLevel).await?,
        jobs_by_business_sector: grouped(store, GroupField::JobSector).await?,
        jobs_by_job_type: grouped(store, GroupField::JobType).await?,
        jobs_by_region: grouped(store, GroupField::JobRegion).await?,
        jobs_by_experience_level_required: grouped(store, GroupField::JobExperienceLevel).await?,
    })
}

pub async fn application_insights(store: &dyn RecordStore) -> Result<ApplicationInsights, AppError> {
    let total_applications = store.count(Collection::Applications).await?;
    let job_posts = store.count(Collection::JobPosts).await?;
    let by_status = grouped(store, GroupField::ApplicationStatus).await?;
    let busiest = store.busiest_job_posts(TOP_N as u64).await?;

    Ok(ApplicationInsights {
        total_applications,
        approval_rate: approval_rate(&by_status),
        applications_by_status: by_status,
        average_applications_per_job_post: average_per_post(total_applications, job_posts),
        top_job_posts_by_applications: busiest.into_iter().map(JobApplicationCount::from).collect(),
    })
}
