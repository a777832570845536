use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::responses::ErrorResponse;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, match_service_errors::MatchServiceError,
    notification_service_errors::NotificationServiceError,
    session_service_errors::SessionServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    AuthService(AuthServiceError),
    MatchService(MatchServiceError),
    SessionService(SessionServiceError),
    NotificationService(NotificationServiceError),
    Unauthorized,
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl From<MatchServiceError> for ApiError {
    fn from(error: MatchServiceError) -> Self {
        ApiError::MatchService(error)
    }
}

impl From<SessionServiceError> for ApiError {
    fn from(error: SessionServiceError) -> Self {
        ApiError::SessionService(error)
    }
}

impl From<NotificationServiceError> for ApiError {
    fn from(error: NotificationServiceError) -> Self {
        ApiError::NotificationService(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::AuthService(
                AuthServiceError::InvalidToken | AuthServiceError::ExpiredToken,
            ) => (StatusCode::UNAUTHORIZED, self.message()),
            ApiError::AuthService(AuthServiceError::ValidationError(_)) => {
                (StatusCode::BAD_REQUEST, self.message())
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),

            ApiError::MatchService(e) => (
                match e {
                    MatchServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                    MatchServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                    MatchServiceError::MatchNotFound => StatusCode::NOT_FOUND,
                    MatchServiceError::Conflict(_) => StatusCode::CONFLICT,
                    MatchServiceError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                },
                e.to_string(),
            ),

            ApiError::SessionService(e) => (
                match e {
                    SessionServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                    SessionServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                    SessionServiceError::MatchNotFound | SessionServiceError::SessionNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    SessionServiceError::Conflict(_) => StatusCode::CONFLICT,
                    SessionServiceError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                },
                e.to_string(),
            ),

            ApiError::NotificationService(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::AuthService(e) => e.to_string(),
            ApiError::MatchService(e) => e.to_string(),
            ApiError::SessionService(e) => e.to_string(),
            ApiError::NotificationService(e) => e.to_string(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
        }
    }
}
