use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::skill_repository_errors::SkillRepositoryError;
use crate::services::errors::session_service_errors::SessionServiceError;

#[derive(Debug)]
pub enum MatchServiceError {
    ValidationError(String),
    Forbidden(String),
    MatchNotFound,
    Conflict(String),
    RepositoryError(String),
}

impl std::fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            MatchServiceError::Forbidden(msg) => write!(f, "Not authorized: {}", msg),
            MatchServiceError::MatchNotFound => write!(f, "Match not found"),
            MatchServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            MatchServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for MatchServiceError {}

impl From<MatchRepositoryError> for MatchServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        match err {
            MatchRepositoryError::NotFound => MatchServiceError::MatchNotFound,
            other => MatchServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<SkillRepositoryError> for MatchServiceError {
    fn from(err: SkillRepositoryError) -> Self {
        MatchServiceError::RepositoryError(err.to_string())
    }
}

impl From<SessionServiceError> for MatchServiceError {
    fn from(err: SessionServiceError) -> Self {
        match err {
            SessionServiceError::ValidationError(msg) => MatchServiceError::ValidationError(msg),
            SessionServiceError::Forbidden(msg) => MatchServiceError::Forbidden(msg),
            SessionServiceError::MatchNotFound => MatchServiceError::MatchNotFound,
            SessionServiceError::SessionNotFound => {
                MatchServiceError::RepositoryError("Session not found".to_string())
            }
            SessionServiceError::Conflict(msg) => MatchServiceError::Conflict(msg),
            SessionServiceError::RepositoryError(msg) => MatchServiceError::RepositoryError(msg),
        }
    }
}
