#[derive(Debug)]
pub enum NotificationRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for NotificationRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            NotificationRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for NotificationRepositoryError {}
