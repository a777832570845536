use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Event types a notification can carry. One type per negotiation or
/// session transition, selected by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    SessionProposed,
    MatchAccepted,
    SessionRescheduled,
    MatchRejected,
    SessionCompleted,
    SessionMessage,
    SessionCanceled,
    FeedbackRequested,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::SessionProposed => "session_proposed",
            NotificationType::MatchAccepted => "match_accepted",
            NotificationType::SessionRescheduled => "session_rescheduled",
            NotificationType::MatchRejected => "match_rejected",
            NotificationType::SessionCompleted => "session_completed",
            NotificationType::SessionMessage => "session_message",
            NotificationType::SessionCanceled => "session_canceled",
            NotificationType::FeedbackRequested => "feedback_requested",
        }
    }
}

/// A notification row. `(userId, key)` is the table's composite primary key;
/// because the key embeds a UTC date bucket, a repeat of the same event on
/// the same day lands on the same item and bumps `count` instead of
/// inserting a duplicate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub related_id: String,
    pub related_model: String,
    pub read: bool,
    pub count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Composite dedup key for same-day upserts.
    /// Example: "session_proposed#match-uuid#2025-06-01"
    pub fn dedup_key(
        notification_type: NotificationType,
        related_id: &str,
        date: NaiveDate,
    ) -> String {
        format!(
            "{}#{}#{}",
            notification_type.as_str(),
            related_id,
            date.format("%Y-%m-%d")
        )
    }
}
