use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;

#[derive(Debug)]
pub enum SessionServiceError {
    ValidationError(String),
    Forbidden(String),
    MatchNotFound,
    SessionNotFound,
    Conflict(String),
    RepositoryError(String),
}

impl std::fmt::Display for SessionServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SessionServiceError::Forbidden(msg) => write!(f, "Not authorized: {}", msg),
            SessionServiceError::MatchNotFound => write!(f, "Match not found"),
            SessionServiceError::SessionNotFound => write!(f, "Session not found"),
            SessionServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            SessionServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SessionServiceError {}

impl From<SessionRepositoryError> for SessionServiceError {
    fn from(err: SessionRepositoryError) -> Self {
        match err {
            SessionRepositoryError::NotFound => SessionServiceError::SessionNotFound,
            other => SessionServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<MatchRepositoryError> for SessionServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        match err {
            MatchRepositoryError::NotFound => SessionServiceError::MatchNotFound,
            other => SessionServiceError::RepositoryError(other.to_string()),
        }
    }
}
