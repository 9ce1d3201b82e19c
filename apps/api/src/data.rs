//! Raw paginated dumps of each collection for external consumers.

use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;

use crate::errors::AppError;
use crate::pagination::{Page, PageParams, PageRequest};
use crate::state::AppState;
use crate::store::{Collection, RecordStore};

const DEFAULT_LIMIT: u64 = 100;

pub async fn dump(
    store: &dyn RecordStore,
    collection: Collection,
    page: PageRequest,
) -> Result<Page<Value>, AppError> {
    let total = store.count(collection).await?;
    let documents = store.page_documents(collection, page).await?;
    Ok(Page::new(documents, total, page))
}

async fn handle_dump(
    state: AppState,
    collection: Collection,
    params: PageParams,
) -> Result<Json<Page<Value>>, AppError> {
    let page = PageRequest::from_params(params, DEFAULT_LIMIT, None)?;
    Ok(Json(dump(state.store.as_ref(), collection, page).await?))
}

/// GET /data/job_posts
pub async fn handle_job_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Value>>, AppError> {
    handle_dump(state, Collection::JobPosts, params).await
}

/// GET /data/employer_profiles
pub async fn handle_employer_profiles(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Value>>, AppError> {
    handle_dump(state, Collection::EmployerProfiles, params).await
}

/// GET /data/candidate_profiles
pub async fn handle_candidate_profiles(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Value>>, AppError> {
    handle_dump(state, Collection::CandidateProfiles, params).await
}

/// GET /data/applications
pub async fn handle_applications(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Value>>, AppError> {
    handle_dump(state, Collection::Applications, params).await
}

/// GET /data/users
pub async fn handle_users(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Value>>, AppError> {
    handle_dump(state, Collection::Users, params).await
}
