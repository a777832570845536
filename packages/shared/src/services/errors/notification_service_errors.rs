use crate::repositories::errors::notification_repository_errors::NotificationRepositoryError;

#[derive(Debug)]
pub enum NotificationServiceError {
    RepositoryError(String),
}

impl std::fmt::Display for NotificationServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for NotificationServiceError {}

impl From<NotificationRepositoryError> for NotificationServiceError {
    fn from(err: NotificationRepositoryError) -> Self {
        NotificationServiceError::RepositoryError(err.to_string())
    }
}
