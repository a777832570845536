use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::from_item;

use crate::models::notification::Notification;
use crate::repositories::errors::notification_repository_errors::NotificationRepositoryError;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Single atomic upsert keyed by `(userId, key)`: inserts the row with
    /// `count = 1`, or refreshes title/message, bumps `count` and resets
    /// `read = false` when the same-day key already exists.
    async fn upsert(&self, notification: &Notification)
        -> Result<(), NotificationRepositoryError>;

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    async fn mark_all_read(&self, user_id: &str) -> Result<(), NotificationRepositoryError>;
}

pub struct DynamoDbNotificationRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbNotificationRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("NOTIFICATIONS_TABLE")
            .expect("NOTIFICATIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl NotificationRepository for DynamoDbNotificationRepository {
    async fn upsert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        let now = notification.updated_at.to_rfc3339();

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("userId", AttributeValue::S(notification.user_id.clone()))
            .key("key", AttributeValue::S(notification.key.clone()))
            .update_expression(
                "SET #type = :type, title = :title, message = :message, \
                 relatedId = :relatedId, relatedModel = :relatedModel, \
                 #read = :false, createdAt = if_not_exists(createdAt, :now), \
                 updatedAt = :now ADD #count :one",
            )
            .expression_attribute_names("#type", "type")
            .expression_attribute_names("#read", "read")
            .expression_attribute_names("#count", "count")
            .expression_attribute_values(
                ":type",
                AttributeValue::S(notification.notification_type.as_str().to_string()),
            )
            .expression_attribute_values(":title", AttributeValue::S(notification.title.clone()))
            .expression_attribute_values(
                ":message",
                AttributeValue::S(notification.message.clone()),
            )
            .expression_attribute_values(
                ":relatedId",
                AttributeValue::S(notification.related_id.clone()),
            )
            .expression_attribute_values(
                ":relatedModel",
                AttributeValue::S(notification.related_model.clone()),
            )
            .expression_attribute_values(":false", AttributeValue::Bool(false))
            .expression_attribute_values(":now", AttributeValue::S(now))
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .send()
            .await
            .map_err(|e| NotificationRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("userId = :userId")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| NotificationRepositoryError::DynamoDb(e.to_string()))?;

        let mut notifications = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let notification: Notification = from_item(item)
                    .map_err(|e| NotificationRepositoryError::Serialization(e.to_string()))?;
                notifications.push(notification);
            }
        }
        Ok(notifications)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<(), NotificationRepositoryError> {
        let notifications = self.list_for_user(user_id).await?;

        for notification in notifications.into_iter().filter(|n| !n.read) {
            self.client
                .update_item()
                .table_name(&self.table_name)
                .key("userId", AttributeValue::S(notification.user_id.clone()))
                .key("key", AttributeValue::S(notification.key.clone()))
                .update_expression("SET #read = :true")
                .expression_attribute_names("#read", "read")
                .expression_attribute_values(":true", AttributeValue::Bool(true))
                .send()
                .await
                .map_err(|e| NotificationRepositoryError::DynamoDb(e.to_string()))?;
        }

        Ok(())
    }
}
