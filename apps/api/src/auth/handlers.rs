use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;

use crate::auth::service::{self, EmployerAccount, EmployerRegistration, TokenResponse};
use crate::errors::AppError;
use crate::models::user::{User, UserCreate};
use crate::state::AppState;

/// OAuth2 password-flow form. `username` carries the email.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /auth/register/candidate
pub async fn handle_register_candidate(
    State(state): State<AppState>,
    Json(req): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = service::register_candidate(state.store.as_ref(), &state.credentials, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/register/employer
pub async fn handle_register_employer(
    State(state): State<AppState>,
    Json(req): Json<EmployerRegistration>,
) -> Result<(StatusCode, Json<EmployerAccount>), AppError> {
    let account = service::register_employer(state.store.as_ref(), &state.credentials, req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = service::login(
        state.store.as_ref(),
        &state.credentials,
        &form.username,
        &form.password,
    )
    .await?;
    Ok(Json(token))
}
