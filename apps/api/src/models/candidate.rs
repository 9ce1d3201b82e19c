use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::labelled_enum;

labelled_enum! {
    pub enum EducationLevel {
        HighSchool => "High School",
        TechnicalSchool => "Technical School",
        College => "College",
        Hnd => "HND",
        Bachelor => "Bachelor",
        Master => "Master",
        Doctorate => "Doctorate",
    }
}

labelled_enum! {
    pub enum ExperienceLevel {
        NoExperience => "No Experience",
        LessThanTwoYears => "Less than two years",
        TwoToFiveYears => "2 to 5 years",
        FiveToTenYears => "5 to 10 years",
        MoreThanTenYears => "More than 10 years",
    }
}

labelled_enum! {
    pub enum Availability {
        Immediately => "Immediately",
        InOneMonth => "In 1 month",
        InTwoMonths => "In 2 months",
        InThreeMonths => "In 3 months",
        InSixMonths => "In 6 months",
        NotAvailable => "Not available",
    }
}

labelled_enum! {
    pub enum ContractType {
        Permanent => "Permanent contract",
        FixedTerm => "Fixed-term contract",
        Temporary => "Temporary work",
        Internship => "Internship",
        Freelance => "Freelance",
        Cooperative => "Cooperative education program",
        PartTime => "Part-time work",
    }
}

labelled_enum! {
    pub enum Region {
        Eastern => "Eastern",
        Western => "Western",
        Northern => "Northern",
        Southern => "Southern",
        International => "International",
        Kigali => "Kigali",
    }
}

labelled_enum! {
    pub enum DesiredSalary {
        Under300k => "Under 300,000 FRW",
        From300kTo400k => "Between 300,000 FRW and 400,000 FRW",
        From400kTo600k => "Between 400,000 FRW and 600,000 FRW",
        From850kTo1100k => "Between 850,000 FRW and 1,100,000 FRW",
        From1100kTo1300k => "Between 1,100,000 FRW and 1,300,000 FRW",
        From1300kTo1600k => "Between 1,300,000 FRW and 1,600,000 FRW",
        From1600kTo2100k => "Between 1,600,000 FRW and 2,100,000 FRW",
        From2100kTo3200k => "Between 2,100,000 FRW and 3,200,000 FRW",
        From3200kTo4200k => "Between 3,200,000 FRW and 4,200,000 FRW",
    }
}

labelled_enum! {
    pub enum Fluency {
        Native => "Native",
        Fluent => "Fluent",
        GoodLevel => "Good Level",
        Intermediate => "Intermediate",
        Beginner => "Beginner",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpokenLanguage {
    pub language: String,
    pub fluency: Fluency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    pub level: EducationLevel,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub is_present: bool,
    #[serde(default)]
    pub type_of_training: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub is_present: bool,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Background section: CV history plus the uploaded picture/CV file URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileCv {
    pub picture: Option<String>,
    pub cv_file: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobCriteria {
    #[serde(default)]
    pub seeked_jobs: Vec<String>,
    #[serde(default)]
    pub business_sectors: Vec<String>,
    #[serde(default)]
    pub availability: Vec<Availability>,
    #[serde(default)]
    pub geographical_mobility: Vec<Region>,
    pub desired_contract_type: Option<ContractType>,
    pub desired_salary: Option<DesiredSalary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Skills {
    pub skill_description: Option<String>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    pub expertise: Option<String>,
}

/// One-to-one with a candidate `User`, keyed by `candidate_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub profile_cv: ProfileCv,
    /// `None` until the candidate fills in their criteria for the first time.
    pub job_criteria: Option<JobCriteria>,
    pub skills: Skills,
    pub created_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// The blank profile created alongside every candidate account.
    pub fn empty(candidate_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id,
            profile_cv: ProfileCv::default(),
            job_criteria: None,
            skills: Skills::default(),
            created_at: Utc::now(),
        }
    }
}

/// Whole-subdocument replacement written by the three profile merges.
#[derive(Debug, Clone)]
pub enum CandidateSection {
    ProfileCv(ProfileCv),
    JobCriteria(JobCriteria),
    Skills(Skills),
}

impl CandidateSection {
    pub fn field(&self) -> &'static str {
        match self {
            CandidateSection::ProfileCv(_) => "profile_cv",
            CandidateSection::JobCriteria(_) => "job_criteria",
            CandidateSection::Skills(_) => "skills",
        }
    }

    pub fn apply_to(self, profile: &mut CandidateProfile) {
        match self {
            CandidateSection::ProfileCv(cv) => profile.profile_cv = cv,
            CandidateSection::JobCriteria(criteria) => profile.job_criteria = Some(criteria),
            CandidateSection::Skills(skills) => profile.skills = skills,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            CandidateSection::ProfileCv(cv) => serde_json::to_value(cv),
            CandidateSection::JobCriteria(criteria) => serde_json::to_value(criteria),
            CandidateSection::Skills(skills) => serde_json::to_value(skills),
        }
    }
}
