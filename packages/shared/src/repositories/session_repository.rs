use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};

use crate::models::session::Session;
use crate::repositories::errors::session_repository_errors::SessionRepositoryError;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<(), SessionRepositoryError>;

    async fn get_session(&self, session_id: &str)
        -> Result<Option<Session>, SessionRepositoryError>;

    async fn update_session(&self, session: &Session) -> Result<(), SessionRepositoryError>;
}

pub struct DynamoDbSessionRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbSessionRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("SESSIONS_TABLE")
            .expect("SESSIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl SessionRepository for DynamoDbSessionRepository {
    async fn create_session(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let item =
            to_item(session).map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(sessionId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(SessionRepositoryError::AlreadyExists);
                    }
                }
                Err(SessionRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("sessionId", AttributeValue::S(session_id.to_string()))
            .send()
            .await
            .map_err(|e| SessionRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let session: Session = from_item(item)
                .map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }

    async fn update_session(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let item =
            to_item(session).map_err(|e| SessionRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(sessionId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(SessionRepositoryError::NotFound);
                    }
                }
                Err(SessionRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }
}
