use axum::{extract::State, Json};

use crate::analytics::reports::{
    self, ApplicationInsights, CandidateInsights, EmployerInsights, JobPostInsights,
    OverallSummary, RegionalDistribution,
};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /analytics/
pub async fn handle_regional_distribution(
    State(state): State<AppState>,
) -> Result<Json<RegionalDistribution>, AppError> {
    Ok(Json(reports::regional_distribution(state.store.as_ref()).await?))
}

/// GET /analytics/data_summary
pub async fn handle_data_summary(
    State(state): State<AppState>,
) -> Result<Json<OverallSummary>, AppError> {
    Ok(Json(reports::overall_summary(state.store.as_ref()).await?))
}

/// GET /analytics/candidate_insights
pub async fn handle_candidate_insights(
    State(state): State<AppState>,
) -> Result<Json<CandidateInsights>, AppError> {
    Ok(Json(reports::candidate_insights(state.store.as_ref()).await?))
}

/// GET /analytics/employer_insights
pub async fn handle_employer_insights(
    State(state): State<AppState>,
) -> Result<Json<EmployerInsights>, AppError> {
    Ok(Json(reports::employer_insights(state.store.as_ref()).await?))
}

/// GET /analytics/job_post_insights
pub async fn handle_job_post_insights(
    State(state): State<AppState>,
) -> Result<Json<JobPostInsights>, AppError> {
    Ok(Json(reports::job_post_insights(state.store.as_ref()).await?))
}

/// GET /analytics/job_application_insights
pub async fn handle_application_insights(
    State(state): State<AppState>,
) -> Result<Json<ApplicationInsights>, AppError> {
    Ok(Json(reports::application_insights(state.store.as_ref()).await?))
}
