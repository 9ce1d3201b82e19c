use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::credentials::Credentials;
use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::models::employer::{EmployerProfile, EmployerProfileCreate};
use crate::models::user::{Role, User, UserCreate};
use crate::store::RecordStore;

#[derive(Debug, Deserialize)]
pub struct EmployerRegistration {
    pub user: UserCreate,
    pub employer_profile: EmployerProfileCreate,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EmployerAccount {
    pub user: User,
    pub employer_profile: EmployerProfile,
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
fn validate_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!("Invalid email address: {raw}")));
    }
    Ok(email)
}

async fn build_user(
    credentials: &Credentials,
    input: UserCreate,
    role: Role,
) -> Result<User, AppError> {
    let email = validate_email(&input.email)?;
    if input.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".to_string()));
    }
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::Validation("First and last name are required".to_string()));
    }

    Ok(User {
        id: Uuid::new_v4(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        email,
        gender: Some(input.gender.as_str().to_string()),
        password_hash: credentials.hash_password(&input.password).await?,
        role: role.as_str().to_string(),
        created_at: Utc::now(),
    })
}

/// Creates the candidate account together with its blank profile.
pub async fn register_candidate(
    store: &dyn RecordStore,
    credentials: &Credentials,
    input: UserCreate,
) -> Result<User, AppError> {
    let user = build_user(credentials, input, Role::Candidate).await?;
    let profile = CandidateProfile::empty(user.id);
    store.insert_candidate(&user, &profile).await?;

    info!(user_id = %user.id, "Registered candidate");
    Ok(user)
}

pub async fn register_employer(
    store: &dyn RecordStore,
    credentials: &Credentials,
    input: EmployerRegistration,
) -> Result<EmployerAccount, AppError> {
    if input.employer_profile.company_name.trim().is_empty() {
        return Err(AppError::Validation("Company name is required".to_string()));
    }
    let user = build_user(credentials, input.user, Role::Employer).await?;
    let profile = input.employer_profile.into_profile(user.id);
    store.insert_employer(&user, &profile).await?;

    info!(user_id = %user.id, company = %profile.company_name, "Registered employer");
    Ok(EmployerAccount {
        user,
        employer_profile: profile,
    })
}

pub async fn login(
    store: &dyn RecordStore,
    credentials: &Credentials,
    username: &str,
    password: &str,
) -> Result<TokenResponse, AppError> {
    let invalid = || AppError::Unauthorized("Incorrect email or password".to_string());

    let email = username.trim().to_lowercase();
    let user = store.find_user_by_email(&email).await?.ok_or_else(invalid)?;
    if !credentials.verify_password(password, &user.password_hash).await? {
        return Err(invalid());
    }

    info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(TokenResponse {
        access_token: credentials.issue_token(&user)?,
        token_type: "bearer",
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::employer::Industry;
    use crate::models::user::Gender;

    pub fn user_create(email: &str) -> UserCreate {
        UserCreate {
            first_name: "Aline".to_string(),
            last_name: "Uwase".to_string(),
            email: email.to_string(),
            gender: Gender::Female,
            password: "s3cret-pass".to_string(),
        }
    }

    pub fn employer_registration(email: &str) -> EmployerRegistration {
        EmployerRegistration {
            user: user_create(email),
            employer_profile: EmployerProfileCreate {
                company_name: "Umurage Ltd".to_string(),
                address: "KN 5 Rd".to_string(),
                zip_code: "00000".to_string(),
                city: "Kigali".to_string(),
                country: "Rwanda".to_string(),
                company_industry: vec![Industry::ItSoftwareEngineeringInternet],
                number_of_employees: Some(35),
                company_description: "Software studio".to_string(),
                position_in_organization: "CTO".to_string(),
            },
        }
    }
}
