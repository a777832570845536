use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::skill_match::{SelectedTimeSlot, SkillMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Canceled,
}

impl SessionStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Scheduled)
    }
}

/// Rating plus free text left by the student after a completed session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeedback {
    pub rating: u8,
    pub feedback: String,
}

/// Optional presentation fields supplied when a session is booked.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
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
}

/// The concrete scheduled meeting derived from an accepted match. Teacher,
/// student and skill name are copied in from the match for fast reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub match_id: String,
    pub teacher_id: String,
    pub student_id: String,
    pub skill_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: SessionStatus,
    #[serde(default)]
    pub teacher_feedback: Option<String>,
    #[serde(default)]
    pub student_feedback: Option<StudentFeedback>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(skill_match: &SkillMatch, slot: &SelectedTimeSlot, details: &SessionDetails) -> Self {
        let now = Utc::now();
        Session {
            session_id: Uuid::new_v4().to_string(),
            match_id: skill_match.match_id.clone(),
            teacher_id: skill_match.teacher_id.clone(),
            student_id: skill_match.requester_id.clone(),
            skill_name: skill_match.skill_name.clone(),
            title: details.title.clone(),
            description: details.description.clone(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            meeting_link: details.meeting_link.clone(),
            prerequisites: details.prerequisites.clone(),
            notes: details.notes.clone(),
            status: SessionStatus::Scheduled,
            teacher_feedback: None,
            student_feedback: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_party(&self, user_id: &str) -> bool {
        self.teacher_id == user_id || self.student_id == user_id
    }

    pub fn other_party(&self, actor_id: &str) -> &str {
        if self.teacher_id == actor_id {
            &self.student_id
        } else {
            &self.teacher_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_slot() -> SelectedTimeSlot {
        let start = Utc::now() + Duration::days(1);
        SelectedTimeSlot {
            start_time: start,
            end_time: start + Duration::hours(1),
            selected_by: "teacher".to_string(),
            selected_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_session_copies_match_identity() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let slot = sample_slot();
        let session = Session::new(&m, &slot, &SessionDetails::default());

        assert_eq!(session.match_id, m.match_id);
        assert_eq!(session.teacher_id, "teacher");
        assert_eq!(session.student_id, "learner");
        assert_eq!(session.skill_name, "guitar");
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.start_time, slot.start_time);
        assert_eq!(session.end_time, slot.end_time);
        assert!(session.teacher_feedback.is_none());
        assert!(session.student_feedback.is_none());
    }

    #[test]
    fn test_session_id_uniqueness() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let slot = sample_slot();
        let s1 = Session::new(&m, &slot, &SessionDetails::default());
        let s2 = Session::new(&m, &slot, &SessionDetails::default());

        assert_ne!(s1.session_id, s2.session_id);
    }

    #[test]
    fn test_only_scheduled_sessions_are_open() {
        assert!(SessionStatus::Scheduled.is_open());
        assert!(!SessionStatus::Completed.is_open());
        assert!(!SessionStatus::Canceled.is_open());
    }

    #[test]
    fn test_session_wire_field_names() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let session = Session::new(&m, &sample_slot(), &SessionDetails::default());
        let serialized = serde_json::to_string(&session).unwrap();

        assert!(serialized.contains("\"matchId\""));
        assert!(serialized.contains("\"teacherId\""));
        assert!(serialized.contains("\"studentId\""));
        assert!(serialized.contains("\"startTime\""));
        assert!(serialized.contains("\"meetingLink\""));
        assert!(serialized.contains("\"status\":\"scheduled\""));
    }

    #[test]
    fn test_session_details_copied_in() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let details = SessionDetails {
            title: Some("Intro to barre chords".to_string()),
            meeting_link: Some("https://meet.example.com/abc".to_string()),
            ..Default::default()
        };
        let session = Session::new(&m, &sample_slot(), &details);

        assert_eq!(session.title.as_deref(), Some("Intro to barre chords"));
        assert_eq!(
            session.meeting_link.as_deref(),
            Some("https://meet.example.com/abc")
        );
    }
}
