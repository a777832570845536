#[derive(Debug)]
pub enum SkillRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for SkillRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            SkillRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for SkillRepositoryError {}
