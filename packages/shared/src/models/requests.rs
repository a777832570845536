use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A time slot as submitted by a client; `proposedBy`/`selectedBy` stamps
/// are applied server-side from the authenticated actor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotInput {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchStatusRequest {
    pub status: String,
    #[serde(default)]
    pub proposed_time_slots: Option<Vec<TimeSlotInput>>,
    #[serde(default)]
    pub selected_time_slot: Option<TimeSlotInput>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub match_id: String,
    pub selected_time_slot: TimeSlotInput,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_rescheduling: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSessionRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingLinkRequest {
    pub meeting_link: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherFeedbackRequest {
    pub feedback: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeedbackRequest {
    pub rating: u8,
    pub feedback: String,
}
