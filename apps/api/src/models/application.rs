use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::labelled_enum;

labelled_enum! {
    pub enum ApplicationStatus {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
        Withdrawn => "Withdrawn",
    }
}

impl ApplicationStatus {
    pub fn parse(raw: &str) -> Option<ApplicationStatus> {
        ApplicationStatus::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == raw)
    }
}

/// Links a candidate to a job post. At most one per (candidate, job) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn new(job_id: Uuid, candidate_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            candidate_id,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}
