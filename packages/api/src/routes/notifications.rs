use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::notification::Notification;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", post(mark_all_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state
        .notification_service
        .list_notifications(&authenticated_user.user_id)
        .await?;
    Ok(Json(notifications))
}

async fn mark_all_read(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state
        .notification_service
        .mark_all_read(&authenticated_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
