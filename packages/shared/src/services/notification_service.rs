use std::sync::Arc;

use chrono::Utc;

use crate::models::notification::{Notification, NotificationType};
use crate::repositories::notification_repository::NotificationRepository;
use crate::services::errors::notification_service_errors::NotificationServiceError;

/// Records notifications with same-day dedup. Live delivery happens out of
/// band from the notifications table stream, so a recipient without an open
/// connection still sees everything on next load.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository + Send + Sync>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository + Send + Sync>) -> Self {
        NotificationService { repository }
    }

    /// Upserts one notification row keyed by (recipient, type, subject,
    /// UTC day). A repeat of the same event on the same day bumps `count`
    /// and resets `read` instead of inserting a duplicate.
    pub async fn notify(
        &self,
        recipient_id: &str,
        notification_type: NotificationType,
        related_id: &str,
        related_model: &str,
        title: &str,
        message: &str,
    ) -> Result<(), NotificationServiceError> {
        let now = Utc::now();
        let notification = Notification {
            user_id: recipient_id.to_string(),
            key: Notification::dedup_key(notification_type, related_id, now.date_naive()),
            notification_type,
            title: title.to_string(),
            message: message.to_string(),
            related_id: related_id.to_string(),
            related_model: related_model.to_string(),
            read: false,
            count: 1,
            created_at: now,
            updated_at: now,
        };

        self.repository.upsert(&notification).await?;
        Ok(())
    }

    pub async fn list_notifications(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, NotificationServiceError> {
        let mut notifications = self.repository.list_for_user(user_id).await?;
        notifications.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notifications)
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<(), NotificationServiceError> {
        self.repository.mark_all_read(user_id).await?;
        Ok(())
    }
}
