use aws_lambda_events::event::dynamodb::EventRecord;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;
use tracing::info;

use shared::models::notification::Notification;
use shared::repositories::connection_repository::ConnectionRepository;

/// Handles one stream record from the notifications table. INSERT is a new
/// notification, MODIFY is a same-day dedup bump; both are worth pushing.
pub async fn process_record(
    record: EventRecord,
    connections: &dyn ConnectionRepository,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match record.event_name.as_str() {
        "INSERT" | "MODIFY" => {
            let notification: Notification = from_item(record.change.new_image.into())?;
            push_notification(&notification, connections).await
        }
        other => {
            info!("Unhandled event type: {}", other);
            Ok(())
        }
    }
}

/// Pushes the notification to the recipient's live connection if one is
/// open. A recipient without a connection is not an error; the row is
/// already persisted and shows up on their next load.
pub async fn push_notification(
    notification: &Notification,
    connections: &dyn ConnectionRepository,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if notification.read {
        // Mark-all-read writes also land on the stream; nothing to push.
        return Ok(());
    }

    let connection_id = match connections.get_connection_id(&notification.user_id).await? {
        Some(connection_id) => connection_id,
        None => {
            info!(
                "No live connection for user {}; skipping push",
                notification.user_id
            );
            return Ok(());
        }
    };

    let payload = serde_json::to_string(notification)?;
    connections.send_message(&connection_id, &payload).await?;

    info!(
        "Pushed {} notification to user {}",
        notification.notification_type.as_str(),
        notification.user_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use shared::models::notification::NotificationType;

    struct MockConnectionRepository {
        connections: HashMap<String, String>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl MockConnectionRepository {
        fn new(connections: Vec<(&str, &str)>) -> Self {
            Self {
                connections: connections
                    .into_iter()
                    .map(|(u, c)| (u.to_string(), c.to_string()))
                    .collect(),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConnectionRepository for MockConnectionRepository {
        async fn get_connection_id(
            &self,
            user_id: &str,
        ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.connections.get(user_id).cloned())
        }

        async fn send_message(
            &self,
            connection_id: &str,
            message: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.sent
                .lock()
                .unwrap()
                .push((connection_id.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn notification(user_id: &str, read: bool) -> Notification {
        let now = Utc::now();
        Notification {
            user_id: user_id.to_string(),
            key: format!("match_accepted#match-1#{}", now.format("%Y-%m-%d")),
            notification_type: NotificationType::MatchAccepted,
            title: "Match accepted".to_string(),
            message: "Tara accepted your guitar match".to_string(),
            related_id: "match-1".to_string(),
            related_model: "Match".to_string(),
            read,
            count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_pushes_to_live_connection() {
        let connections = MockConnectionRepository::new(vec![("learner", "conn-1")]);

        push_notification(&notification("learner", false), &connections)
            .await
            .unwrap();

        let sent = connections.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "conn-1");
        assert!(sent[0].1.contains("\"type\":\"match_accepted\""));
        assert!(sent[0].1.contains("\"relatedId\":\"match-1\""));
    }

    #[tokio::test]
    async fn test_offline_recipient_is_skipped_without_error() {
        let connections = MockConnectionRepository::new(vec![]);

        push_notification(&notification("learner", false), &connections)
            .await
            .unwrap();

        assert!(connections.sent().is_empty());
    }

    #[tokio::test]
    async fn test_read_notifications_are_not_pushed() {
        let connections = MockConnectionRepository::new(vec![("learner", "conn-1")]);

        push_notification(&notification("learner", true), &connections)
            .await
            .unwrap();

        assert!(connections.sent().is_empty());
    }
}
