//! Bearer-token extractors. Handlers take `CandidateUser` or `EmployerUser`
//! to gate on role; `CurrentUser` accepts any signed-in account.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Clone)]
pub struct CandidateUser(pub User);

#[derive(Debug, Clone)]
pub struct EmployerUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.credentials.verify_token(token)?;
        let user = state
            .store
            .find_user(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;
        Ok(CurrentUser(user))
    }
}

async fn require_role(parts: &mut Parts, state: &AppState, role: Role) -> Result<User, AppError> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    if user.role() != Some(role) {
        return Err(AppError::Forbidden(
            "You are not authorized to perform this action".to_string(),
        ));
    }
    Ok(user)
}

#[async_trait]
impl FromRequestParts<AppState> for CandidateUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Candidate)
            .await
            .map(CandidateUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for EmployerUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Employer)
            .await
            .map(EmployerUser)
    }
}
