use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::requests::UpdateMatchStatusRequest;
use shared::models::responses::{MatchGenerationResponse, UserMatchesResponse};
use shared::models::skill_match::SkillMatch;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches/generate", post(generate_matches))
        .route("/matches", get(get_matches))
        .route("/matches/{match_id}/status", put(update_match_status))
}

async fn generate_matches(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<MatchGenerationResponse>, ApiError> {
    let outcome = state
        .match_generation_service
        .generate_matches(&authenticated_user.user_id)
        .await?;

    Ok(Json(MatchGenerationResponse {
        created_as_learner: outcome.created_as_learner,
        created_as_teacher: outcome.created_as_teacher,
        teaching_matches: outcome.teaching_matches,
    }))
}

async fn get_matches(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<UserMatchesResponse>, ApiError> {
    let response = state
        .match_status_service
        .get_user_matches(&authenticated_user.user_id)
        .await?;
    Ok(Json(response))
}

async fn update_match_status(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(match_id): Path<String>,
    Json(payload): Json<UpdateMatchStatusRequest>,
) -> Result<Json<SkillMatch>, ApiError> {
    let updated = state
        .match_status_service
        .update_match_status(&authenticated_user.user_id, &match_id, &payload)
        .await?;
    Ok(Json(updated))
}
