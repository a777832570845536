use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::skill::normalize_skill_name;

/// Negotiation state of a match. `rejected`, `completed` and `canceled` are
/// terminal: a match in one of those states no longer blocks the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotRequested,
    Pending,
    Accepted,
    Rejected,
    Rescheduled,
    Completed,
    Canceled,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MatchStatus::Rejected | MatchStatus::Completed | MatchStatus::Canceled
        )
    }

    /// Parses a caller-supplied target status. Only the five statuses a
    /// negotiation request may ask for are accepted; `not_requested` and
    /// `canceled` are never valid targets (cancellation goes through the
    /// session, not the match).
    pub fn parse_requested(value: &str) -> Option<MatchStatus> {
        match value {
            "pending" => Some(MatchStatus::Pending),
            "accepted" => Some(MatchStatus::Accepted),
            "rejected" => Some(MatchStatus::Rejected),
            "completed" => Some(MatchStatus::Completed),
            "rescheduled" => Some(MatchStatus::Rescheduled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::NotRequested => "not_requested",
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Rescheduled => "rescheduled",
            MatchStatus::Completed => "completed",
            MatchStatus::Canceled => "canceled",
        }
    }

    /// Explicit transition table for the negotiation state machine. Self
    /// loops on `pending`, `accepted` and `rescheduled` carry
    /// counter-proposals, implicit reschedules and message threads.
    pub fn can_transition_to(&self, target: MatchStatus) -> bool {
        use MatchStatus::*;
        matches!(
            (self, target),
            (NotRequested, Pending)
                | (Pending, Pending)
                | (Pending, Accepted)
                | (Pending, Rejected)
                | (Pending, Rescheduled)
                | (Accepted, Accepted)
                | (Accepted, Rejected)
                | (Accepted, Rescheduled)
                | (Accepted, Completed)
                | (Rescheduled, Pending)
                | (Rescheduled, Accepted)
                | (Rescheduled, Rejected)
                | (Rescheduled, Rescheduled)
                | (Rescheduled, Completed)
        )
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time slot offered by one of the parties during negotiation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub proposed_by: String,
}

/// The slot both parties settled on.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub selected_by: String,
    pub selected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub user_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// One round of slot proposals, kept so the UI can render the negotiation
/// history after slots are replaced.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotProposal {
    pub proposed_by: String,
    pub proposed_at: DateTime<Utc>,
    pub slots: Vec<TimeSlot>,
}

/// The negotiation record between a requester (learner) and a teacher for
/// one named skill. Stored in DynamoDB partitioned by `dedupKey` so that at
/// most one non-terminal match can exist per (requester, teacher, skill)
/// triple.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub dedup_key: String,
    pub match_id: String,
    pub requester_id: String,
    pub teacher_id: String,
    pub skill_name: String,
    #[serde(default)]
    pub skill_id: Option<String>,
    pub status: MatchStatus,
    #[serde(default)]
    pub proposed_time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub selected_time_slot: Option<SelectedTimeSlot>,
    #[serde(default)]
    pub status_messages: Vec<StatusMessage>,
    #[serde(default)]
    pub time_slot_history: Vec<TimeSlotProposal>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub current_session_id: Option<String>,
    #[serde(default)]
    pub previous_session_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SkillMatch {
    pub fn new(
        requester_id: &str,
        teacher_id: &str,
        skill_name: &str,
        skill_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        SkillMatch {
            dedup_key: Self::dedup_key(requester_id, teacher_id, skill_name),
            match_id: Uuid::new_v4().to_string(),
            requester_id: requester_id.to_string(),
            teacher_id: teacher_id.to_string(),
            skill_name: skill_name.to_string(),
            skill_id,
            status: MatchStatus::NotRequested,
            proposed_time_slots: vec![],
            selected_time_slot: None,
            status_messages: vec![],
            time_slot_history: vec![],
            rejection_reason: None,
            current_session_id: None,
            previous_session_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    /// Composite key enforcing match uniqueness.
    /// Example: "learner-uuid#teacher-uuid#guitar"
    pub fn dedup_key(requester_id: &str, teacher_id: &str, skill_name: &str) -> String {
        format!(
            "{}#{}#{}",
            requester_id,
            teacher_id,
            normalize_skill_name(skill_name)
        )
    }

    pub fn is_party(&self, user_id: &str) -> bool {
        self.requester_id == user_id || self.teacher_id == user_id
    }

    /// The party that did not act; negotiation notifications always go to
    /// this user, never to the actor.
    pub fn other_party(&self, actor_id: &str) -> &str {
        if self.requester_id == actor_id {
            &self.teacher_id
        } else {
            &self.requester_id
        }
    }
}
