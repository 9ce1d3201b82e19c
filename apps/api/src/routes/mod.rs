pub mod health;

use axum::{
    http::HeaderValue,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::analytics::handlers as analytics;
use crate::auth::handlers as auth;
use crate::candidate::handlers as candidate;
use crate::data;
use crate::employer::handlers as employer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route(
            "/auth/register/candidate",
            post(auth::handle_register_candidate),
        )
        .route(
            "/auth/register/employer",
            post(auth::handle_register_employer),
        )
        .route("/auth/login", post(auth::handle_login))
        // Candidate
        .route("/candidate/profile", get(candidate::handle_get_profile))
        .route(
            "/candidate/profile/update",
            patch(candidate::handle_update_profile_cv),
        )
        .route(
            "/candidate/job_criteria/update",
            patch(candidate::handle_update_job_criteria),
        )
        .route(
            "/candidate/skills/update",
            patch(candidate::handle_update_skills),
        )
        .route(
            "/candidate/profile_files/edit",
            patch(candidate::handle_upload_files),
        )
        .route("/candidate/jobs", get(candidate::handle_list_jobs))
        .route("/candidate/jobs/:job_id", get(candidate::handle_get_job))
        .route(
            "/candidate/jobs/apply/:job_id",
            post(candidate::handle_apply),
        )
        .route(
            "/candidate/applications",
            get(candidate::handle_list_applications),
        )
        .route(
            "/candidate/applications/:application_id",
            patch(candidate::handle_withdraw),
        )
        // Employer
        .route(
            "/employer/create_job_post",
            post(employer::handle_create_job_post),
        )
        .route(
            "/employer/get_job_posts",
            get(employer::handle_list_job_posts),
        )
        .route("/employer/me/profile", get(employer::handle_get_profile))
        .route(
            "/employer/me/profile/update",
            put(employer::handle_update_profile),
        )
        .route(
            "/employer/applications/:job_id",
            get(employer::handle_list_applications),
        )
        .route(
            "/employer/applications/:job_id/:application_id",
            get(employer::handle_application_detail).patch(employer::handle_approve),
        )
        // Analytics
        .route(
            "/analytics/",
            get(analytics::handle_regional_distribution),
        )
        .route("/analytics/data_summary", get(analytics::handle_data_summary))
        .route(
            "/analytics/candidate_insights",
            get(analytics::handle_candidate_insights),
        )
        .route(
            "/analytics/employer_insights",
            get(analytics::handle_employer_insights),
        )
        .route(
            "/analytics/job_post_insights",
            get(analytics::handle_job_post_insights),
        )
        .route(
            "/analytics/job_application_insights",
            get(analytics::handle_application_insights),
        )
        // Bulk data
        .route("/data/job_posts", get(data::handle_job_posts))
        .route(
            "/data/employer_profiles",
            get(data::handle_employer_profiles),
        )
        .route(
            "/data/candidate_profiles",
            get(data::handle_candidate_profiles),
        )
        .route("/data/applications", get(data::handle_applications))
        .route("/data/users", get(data::handle_users))
        .with_state(state)
}

/// CORS for the configured origins; `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(600));

    if origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
