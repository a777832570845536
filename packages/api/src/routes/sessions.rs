use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::requests::{
    CancelSessionRequest, CreateSessionRequest, MeetingLinkRequest, StudentFeedbackRequest,
    TeacherFeedbackRequest,
};
use shared::models::session::Session;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{session_id}", get(get_session))
        .route("/sessions/{session_id}/complete", post(complete_session))
        .route("/sessions/{session_id}/cancel", post(cancel_session))
        .route(
            "/sessions/{session_id}/meeting-link",
            put(update_meeting_link),
        )
        .route(
            "/sessions/{session_id}/feedback/teacher",
            post(submit_teacher_feedback),
        )
        .route(
            "/sessions/{session_id}/feedback/student",
            post(submit_student_feedback),
        )
}

async fn create_session(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let session = state
        .session_service
        .create_session(&authenticated_user.user_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_session(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state.session_service.get_session(&session_id).await?;
    if !session.is_party(&authenticated_user.user_id) {
        return Err(ApiError::Unauthorized);
    }
    Ok(Json(session))
}

async fn complete_session(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .session_service
        .complete_session(&authenticated_user.user_id, &session_id)
        .await?;
    Ok(Json(session))
}

async fn cancel_session(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(session_id): Path<String>,
    Json(payload): Json<CancelSessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .session_service
        .cancel_session(&authenticated_user.user_id, &session_id, &payload)
        .await?;
    Ok(Json(session))
}

async fn update_meeting_link(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(session_id): Path<String>,
    Json(payload): Json<MeetingLinkRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .session_service
        .update_meeting_link(
            &authenticated_user.user_id,
            &session_id,
            &payload.meeting_link,
        )
        .await?;
    Ok(Json(session))
}

async fn submit_teacher_feedback(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(session_id): Path<String>,
    Json(payload): Json<TeacherFeedbackRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .session_service
        .submit_teacher_feedback(&authenticated_user.user_id, &session_id, &payload.feedback)
        .await?;
    Ok(Json(session))
}

async fn submit_student_feedback(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(session_id): Path<String>,
    Json(payload): Json<StudentFeedbackRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .session_service
        .submit_student_feedback(
            &authenticated_user.user_id,
            &session_id,
            payload.rating,
            &payload.feedback,
        )
        .await?;
    Ok(Json(session))
}
