use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::labelled_enum;

labelled_enum! {
    pub enum Gender {
        Male => "Male",
        Female => "Female",
    }
}

labelled_enum! {
    /// Gates which half of the API a caller may use.
    pub enum Role {
        Candidate => "candidate",
        Employer => "employer",
    }
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.as_str() == raw)
    }
}

/// Account record. Stored relationally; the password hash is never serialized
/// so bulk dumps and registration responses cannot leak it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub password: String,
}
