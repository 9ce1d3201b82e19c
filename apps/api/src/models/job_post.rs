use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::{
    ContractType, DesiredSalary, EducationLevel, ExperienceLevel, Region, SpokenLanguage,
};
use crate::models::employer::Industry;
use crate::models::labelled_enum;

labelled_enum! {
    pub enum RemoteWork {
        No => "No",
        Yes => "Yes",
        Hybrid => "Hybrid",
    }
}

labelled_enum! {
    pub enum TeamManagement {
        Yes => "Yes",
        No => "No",
    }
}

/// A published vacancy. Immutable once posted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPost {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub job_ad_title: String,
    pub number_of_positions: i32,
    pub job_description: String,
    pub required_profile_description: String,
    pub sector: Industry,
    pub job_category: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub languages_required: Vec<SpokenLanguage>,
    pub education_level_required: EducationLevel,
    pub job_type: ContractType,
    pub region: Region,
    pub city: Option<String>,
    pub remote_work: RemoteWork,
    pub team_management: TeamManagement,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub offered_salary: DesiredSalary,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPostCreate {
    pub job_ad_title: String,
    pub number_of_positions: i32,
    pub job_description: String,
    pub required_profile_description: String,
    pub sector: Industry,
    pub job_category: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub languages_required: Vec<SpokenLanguage>,
    pub education_level_required: EducationLevel,
    pub job_type: ContractType,
    pub region: Region,
    pub city: Option<String>,
    pub remote_work: RemoteWork,
    pub team_management: TeamManagement,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub offered_salary: DesiredSalary,
}

impl JobPostCreate {
    pub fn into_job_post(self, employer_id: Uuid) -> JobPost {
        JobPost {
            id: Uuid::new_v4(),
            employer_id,
            job_ad_title: self.job_ad_title,
            number_of_positions: self.number_of_positions,
            job_description: self.job_description,
            required_profile_description: self.required_profile_description,
            sector: self.sector,
            job_category: self.job_category,
            experience_level: self.experience_level,
            languages_required: self.languages_required,
            education_level_required: self.education_level_required,
            job_type: self.job_type,
            region: self.region,
            city: self.city,
            remote_work: self.remote_work,
            team_management: self.team_management,
            key_skills: self.key_skills,
            offered_salary: self.offered_salary,
            created_at: Utc::now(),
        }
    }
}

/// Equality filters for the public job search. Absent fields are not applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub region: Option<Region>,
    pub city: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_ad_title: Option<String>,
    pub offered_salary: Option<DesiredSalary>,
}

/// In-memory twin of the SQL filter in `PgStore::search_job_posts`.
#[cfg(test)]
impl JobFilter {
    pub fn matches(&self, job: &JobPost) -> bool {
        self.region.map_or(true, |r| job.region == r)
            && self
                .city
                .as_deref()
                .map_or(true, |c| job.city.as_deref() == Some(c))
            && self
                .experience_level
                .map_or(true, |e| job.experience_level == e)
            && self
                .job_ad_title
                .as_deref()
                .map_or(true, |t| job.job_ad_title == t)
            && self.offered_salary.map_or(true, |s| job.offered_salary == s)
    }
}

/// Case-insensitive substring match used by the title searches on the
/// employer and candidate listings.
pub fn title_contains(title: &str, needle: &str) -> bool {
    title.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn job_create(title: &str) -> JobPostCreate {
        JobPostCreate {
            job_ad_title: title.to_string(),
            number_of_positions: 2,
            job_description: "Build and run services".to_string(),
            required_profile_description: "Curious engineer".to_string(),
            sector: Industry::ItSoftwareEngineeringInternet,
            job_category: "Engineering".to_string(),
            experience_level: ExperienceLevel::TwoToFiveYears,
            languages_required: vec![],
            education_level_required: EducationLevel::Bachelor,
            job_type: ContractType::Permanent,
            region: Region::Kigali,
            city: Some("Kigali".to_string()),
            remote_work: RemoteWork::Hybrid,
            team_management: TeamManagement::No,
            key_skills: vec!["rust".to_string()],
            offered_salary: DesiredSalary::From1100kTo1300k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::job_create;
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let job = job_create("Backend Engineer").into_job_post(Uuid::new_v4());
        assert!(JobFilter::default().matches(&job));
    }

    #[test]
    fn test_filters_are_anded() {
        let job = job_create("Backend Engineer").into_job_post(Uuid::new_v4());
        let filter = JobFilter {
            region: Some(Region::Kigali),
            city: Some("Kigali".to_string()),
            ..JobFilter::default()
        };
        assert!(filter.matches(&job));

        let filter = JobFilter {
            region: Some(Region::Kigali),
            experience_level: Some(ExperienceLevel::NoExperience),
            ..JobFilter::default()
        };
        assert!(!filter.matches(&job));
    }

    #[test]
    fn test_title_filter_is_exact_in_search() {
        let job = job_create("Backend Engineer").into_job_post(Uuid::new_v4());
        let filter = JobFilter {
            job_ad_title: Some("Backend".to_string()),
            ..JobFilter::default()
        };
        assert!(!filter.matches(&job));
    }

    #[test]
    fn test_title_contains_ignores_case() {
        assert!(title_contains("Senior Backend Engineer", "backend"));
        assert!(!title_contains("Accountant", "engineer"));
    }
}
