use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::models::notification::NotificationType;
use crate::models::requests::{CancelSessionRequest, CreateSessionRequest};
use crate::models::session::{Session, SessionDetails, SessionStatus, StudentFeedback};
use crate::models::skill_match::{MatchStatus, SelectedTimeSlot, SkillMatch};
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::session_repository::SessionRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::session_service_errors::SessionServiceError;
use crate::services::notification_service::NotificationService;

/// Manages the lifecycle of scheduled sessions and keeps the owning match
/// in step with it. Writes are ordered match-first so a crash between the
/// two leaves at worst a dangling `currentSessionId`, which reads treat as
/// absent.
#[derive(Clone)]
pub struct SessionService {
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    notification_service: NotificationService,
}

impl SessionService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        notification_service: NotificationService,
    ) -> Self {
        SessionService {
            session_repository,
            match_repository,
            user_repository,
            notification_service,
        }
    }

    /// Books a session directly from a match, accepting (or rescheduling)
    /// the match as a side effect.
    pub async fn create_session(
        &self,
        actor_id: &str,
        request: &CreateSessionRequest,
    ) -> Result<Session, SessionServiceError> {
        if request.selected_time_slot.end_time <= request.selected_time_slot.start_time {
            return Err(SessionServiceError::ValidationError(
                "Time slot end must be after its start".to_string(),
            ));
        }
        if let Some(link) = &request.meeting_link {
            validate_meeting_link(link)?;
        }

        let mut skill_match = self
            .match_repository
            .get_match(&request.match_id)
            .await?
            .ok_or(SessionServiceError::MatchNotFound)?;

        if !skill_match.is_party(actor_id) {
            return Err(SessionServiceError::Forbidden(
                "Only a participant of the match can book a session".to_string(),
            ));
        }

        let slot = SelectedTimeSlot {
            start_time: request.selected_time_slot.start_time,
            end_time: request.selected_time_slot.end_time,
            selected_by: actor_id.to_string(),
            selected_at: Utc::now(),
        };
        let details = SessionDetails {
            title: request.title.clone(),
            description: request.description.clone(),
            meeting_link: request.meeting_link.clone(),
            prerequisites: request.prerequisites.clone(),
            notes: request.notes.clone(),
        };

        skill_match.status = if request.is_rescheduling {
            MatchStatus::Rescheduled
        } else {
            MatchStatus::Accepted
        };
        skill_match.selected_time_slot = Some(slot.clone());
        skill_match.updated_at = Utc::now();

        let session = self
            .create_or_update_session(&mut skill_match, &slot, &details, request.is_rescheduling)
            .await?;

        let notification_type = if request.is_rescheduling {
            NotificationType::SessionRescheduled
        } else {
            NotificationType::MatchAccepted
        };
        let actor_name = self.display_name(actor_id).await;
        let (title, message) = if request.is_rescheduling {
            (
                "Session rescheduled".to_string(),
                format!(
                    "{} moved your {} session to a new time",
                    actor_name, skill_match.skill_name
                ),
            )
        } else {
            (
                "Session booked".to_string(),
                format!(
                    "{} booked a {} session with you",
                    actor_name, skill_match.skill_name
                ),
            )
        };
        self.notify_best_effort(
            skill_match.other_party(actor_id),
            notification_type,
            &skill_match.match_id,
            "Match",
            &title,
            &message,
        )
        .await;

        Ok(session)
    }

    /// Materializes the selected slot as a session row, reusing the active
    /// session on reschedule. The match is persisted before the session so
    /// a failure in between cannot strand a session the match knows nothing
    /// about.
    pub async fn create_or_update_session(
        &self,
        skill_match: &mut SkillMatch,
        slot: &SelectedTimeSlot,
        details: &SessionDetails,
        is_reschedule: bool,
    ) -> Result<Session, SessionServiceError> {
        if let Some(session_id) = skill_match.current_session_id.clone() {
            match self.session_repository.get_session(&session_id).await? {
                Some(mut session) => match session.status {
                    SessionStatus::Completed => {
                        // A finished session rolls into history; the new
                        // booking gets a fresh row below.
                        skill_match.previous_session_ids.push(session.session_id);
                        skill_match.current_session_id = None;
                    }
                    SessionStatus::Scheduled | SessionStatus::Canceled => {
                        if !is_reschedule {
                            if session.status == SessionStatus::Scheduled {
                                return Err(SessionServiceError::Conflict(
                                    "Match already has an active session".to_string(),
                                ));
                            }
                            // Canceled and not rescheduling: archive it and
                            // fall through to a fresh row.
                            skill_match.previous_session_ids.push(session.session_id);
                            skill_match.current_session_id = None;
                        } else {
                            session.start_time = slot.start_time;
                            session.end_time = slot.end_time;
                            if details.meeting_link.is_some() {
                                session.meeting_link = details.meeting_link.clone();
                            }
                            if details.notes.is_some() {
                                session.notes = details.notes.clone();
                            }
                            session.status = SessionStatus::Scheduled;
                            session.cancellation_reason = None;
                            session.updated_at = Utc::now();

                            self.match_repository.update_match(skill_match).await?;
                            self.session_repository.update_session(&session).await?;
                            return Ok(session);
                        }
                    }
                },
                None => {
                    warn!(
                        "Match {} points at missing session {}; treating as absent",
                        skill_match.match_id, session_id
                    );
                    skill_match.current_session_id = None;
                }
            }
        }

        let session = Session::new(skill_match, slot, details);
        skill_match.current_session_id = Some(session.session_id.clone());
        skill_match.updated_at = Utc::now();

        self.match_repository.update_match(skill_match).await?;
        self.session_repository.create_session(&session).await?;

        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session, SessionServiceError> {
        self.session_repository
            .get_session(session_id)
            .await?
            .ok_or(SessionServiceError::SessionNotFound)
    }

    pub async fn complete_session(
        &self,
        actor_id: &str,
        session_id: &str,
    ) -> Result<Session, SessionServiceError> {
        let mut session = self.get_session(session_id).await?;

        if session.teacher_id != actor_id {
            return Err(SessionServiceError::Forbidden(
                "Only the teacher can complete a session".to_string(),
            ));
        }
        match session.status {
            SessionStatus::Completed => {
                return Err(SessionServiceError::Conflict(
                    "Session is already completed".to_string(),
                ))
            }
            SessionStatus::Canceled => {
                return Err(SessionServiceError::Conflict(
                    "Canceled sessions cannot be completed".to_string(),
                ))
            }
            SessionStatus::Scheduled => {}
        }

        session.status = SessionStatus::Completed;
        session.updated_at = Utc::now();
        self.session_repository.update_session(&session).await?;

        // Rewards accrual hooks in here once the points service lands.
        info!(
            "Session {} completed by teacher {} for skill {}",
            session.session_id, session.teacher_id, session.skill_name
        );

        for user_id in [&session.teacher_id, &session.student_id] {
            self.notify_best_effort(
                user_id,
                NotificationType::FeedbackRequested,
                &session.session_id,
                "Session",
                "How did it go?",
                &format!(
                    "Your {} session is complete. Leave feedback for the other participant.",
                    session.skill_name
                ),
            )
            .await;
        }

        Ok(session)
    }

    pub async fn cancel_session(
        &self,
        actor_id: &str,
        session_id: &str,
        request: &CancelSessionRequest,
    ) -> Result<Session, SessionServiceError> {
        if request.reason.trim().is_empty() {
            return Err(SessionServiceError::ValidationError(
                "Cancellation reason is required".to_string(),
            ));
        }

        let mut session = self.get_session(session_id).await?;

        if !session.is_party(actor_id) {
            return Err(SessionServiceError::Forbidden(
                "Only a participant can cancel the session".to_string(),
            ));
        }
        if !session.status.is_open() {
            return Err(SessionServiceError::Conflict(
                "Only scheduled sessions can be canceled".to_string(),
            ));
        }

        session.status = SessionStatus::Canceled;
        session.cancellation_reason = Some(request.reason.clone());
        session.updated_at = Utc::now();
        self.session_repository.update_session(&session).await?;

        // Mirror the cancellation onto the match so its dedup key frees up
        // for a future re-match.
        match self.match_repository.get_match(&session.match_id).await? {
            Some(mut skill_match) => {
                skill_match.status = MatchStatus::Canceled;
                skill_match.updated_at = Utc::now();
                self.match_repository.update_match(&skill_match).await?;
            }
            None => {
                warn!(
                    "Session {} canceled but its match {} no longer exists",
                    session.session_id, session.match_id
                );
            }
        }

        let actor_name = self.display_name(actor_id).await;
        self.notify_best_effort(
            session.other_party(actor_id),
            NotificationType::SessionCanceled,
            &session.session_id,
            "Session",
            "Session canceled",
            &format!(
                "{} canceled your {} session: {}",
                actor_name, session.skill_name, request.reason
            ),
        )
        .await;

        Ok(session)
    }

    pub async fn update_meeting_link(
        &self,
        actor_id: &str,
        session_id: &str,
        meeting_link: &str,
    ) -> Result<Session, SessionServiceError> {
        validate_meeting_link(meeting_link)?;

        let mut session = self.get_session(session_id).await?;

        if session.teacher_id != actor_id {
            return Err(SessionServiceError::Forbidden(
                "Only the teacher can set the meeting link".to_string(),
            ));
        }
        if !session.status.is_open() {
            return Err(SessionServiceError::Conflict(
                "Meeting link can only be set on a scheduled session".to_string(),
            ));
        }

        session.meeting_link = Some(meeting_link.to_string());
        session.updated_at = Utc::now();
        self.session_repository.update_session(&session).await?;

        Ok(session)
    }

    pub async fn submit_teacher_feedback(
        &self,
        actor_id: &str,
        session_id: &str,
        feedback: &str,
    ) -> Result<Session, SessionServiceError> {
        if feedback.trim().is_empty() {
            return Err(SessionServiceError::ValidationError(
                "Feedback cannot be empty".to_string(),
            ));
        }

        let mut session = self.get_session(session_id).await?;

        if session.teacher_id != actor_id {
            return Err(SessionServiceError::Forbidden(
                "Only the teacher can leave teacher feedback".to_string(),
            ));
        }
        if session.status != SessionStatus::Completed {
            return Err(SessionServiceError::Conflict(
                "Feedback can only be left on a completed session".to_string(),
            ));
        }
        if session.teacher_feedback.is_some() {
            return Err(SessionServiceError::Conflict(
                "Teacher feedback was already submitted".to_string(),
            ));
        }

        session.teacher_feedback = Some(feedback.to_string());
        session.updated_at = Utc::now();
        self.session_repository.update_session(&session).await?;

        Ok(session)
    }

    pub async fn submit_student_feedback(
        &self,
        actor_id: &str,
        session_id: &str,
        rating: u8,
        feedback: &str,
    ) -> Result<Session, SessionServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(SessionServiceError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let mut session = self.get_session(session_id).await?;

        if session.student_id != actor_id {
            return Err(SessionServiceError::Forbidden(
                "Only the student can leave student feedback".to_string(),
            ));
        }
        if session.status != SessionStatus::Completed {
            return Err(SessionServiceError::Conflict(
                "Feedback can only be left on a completed session".to_string(),
            ));
        }
        if session.student_feedback.is_some() {
            return Err(SessionServiceError::Conflict(
                "Student feedback was already submitted".to_string(),
            ));
        }

        session.student_feedback = Some(StudentFeedback {
            rating,
            feedback: feedback.to_string(),
        });
        session.updated_at = Utc::now();
        self.session_repository.update_session(&session).await?;

        Ok(session)
    }

    async fn display_name(&self, user_id: &str) -> String {
        match self.user_repository.get_user_by_id(user_id).await {
            Ok(user) => user.name,
            Err(e) => {
                warn!("Failed to resolve display name for {}: {}", user_id, e);
                user_id.to_string()
            }
        }
    }

    /// Notifications never fail the owning operation; the durable state
    /// already committed.
    async fn notify_best_effort(
        &self,
        recipient_id: &str,
        notification_type: NotificationType,
        related_id: &str,
        related_model: &str,
        title: &str,
        message: &str,
    ) {
        if let Err(e) = self
            .notification_service
            .notify(
                recipient_id,
                notification_type,
                related_id,
                related_model,
                title,
                message,
            )
            .await
        {
            error!("Failed to record notification for {}: {}", recipient_id, e);
        }
    }
}

fn validate_meeting_link(link: &str) -> Result<(), SessionServiceError> {
    if !link.starts_with("https://") {
        return Err(SessionServiceError::ValidationError(
            "Meeting link must be an https URL".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::requests::TimeSlotInput;
    use crate::models::user::User;
    use crate::repositories::match_repository::tests::InMemoryMatchRepository;
    use crate::repositories::notification_repository::tests::InMemoryNotificationRepository;
    use crate::repositories::session_repository::tests::InMemorySessionRepository;
    use crate::repositories::user_repository::tests::InMemoryUserRepository;

    struct Fixture {
        service: SessionService,
        matches: Arc<InMemoryMatchRepository>,
        sessions: Arc<InMemorySessionRepository>,
        notifications: Arc<InMemoryNotificationRepository>,
    }

    fn fixture(initial_matches: Vec<SkillMatch>, initial_sessions: Vec<Session>) -> Fixture {
        let matches = Arc::new(InMemoryMatchRepository::new().with_matches(initial_matches));
        let sessions = Arc::new(InMemorySessionRepository::new().with_sessions(initial_sessions));
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let users = Arc::new(InMemoryUserRepository::new().with_users(vec![
            User {
                id: "teacher".to_string(),
                name: "Tara".to_string(),
                email: "tara@example.com".to_string(),
            },
            User {
                id: "learner".to_string(),
                name: "Liam".to_string(),
                email: "liam@example.com".to_string(),
            },
        ]));
        let service = SessionService::new(
            sessions.clone(),
            matches.clone(),
            users,
            NotificationService::new(notifications.clone()),
        );
        Fixture {
            service,
            matches,
            sessions,
            notifications,
        }
    }

    fn slot_input() -> TimeSlotInput {
        let start = Utc::now() + Duration::days(1);
        TimeSlotInput {
            start_time: start,
            end_time: start + Duration::hours(1),
        }
    }

    fn booking_request(match_id: &str) -> CreateSessionRequest {
        CreateSessionRequest {
            match_id: match_id.to_string(),
            selected_time_slot: slot_input(),
            title: None,
            description: None,
            meeting_link: None,
            prerequisites: None,
            notes: None,
            is_rescheduling: false,
        }
    }

    fn accepted_match_with_session() -> (SkillMatch, Session) {
        let mut m = SkillMatch::new("learner", "teacher", "guitar", None);
        m.status = MatchStatus::Accepted;
        let input = slot_input();
        let slot = SelectedTimeSlot {
            start_time: input.start_time,
            end_time: input.end_time,
            selected_by: "teacher".to_string(),
            selected_at: Utc::now(),
        };
        m.selected_time_slot = Some(slot.clone());
        let session = Session::new(&m, &slot, &SessionDetails::default());
        m.current_session_id = Some(session.session_id.clone());
        (m, session)
    }

    #[tokio::test]
    async fn test_create_session_accepts_match_and_notifies_other_party() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let match_id = m.match_id.clone();
        let f = fixture(vec![m], vec![]);

        let session = f
            .service
            .create_session("teacher", &booking_request(&match_id))
            .await
            .unwrap();

        assert_eq!(session.status, SessionStatus::Scheduled);

        let stored = f.matches.all();
        assert_eq!(stored[0].status, MatchStatus::Accepted);
        assert_eq!(
            stored[0].current_session_id.as_deref(),
            Some(session.session_id.as_str())
        );
        assert_eq!(
            stored[0].selected_time_slot.as_ref().unwrap().selected_by,
            "teacher"
        );

        let notes = f.notifications.all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].user_id, "learner");
        assert_eq!(notes[0].notification_type, NotificationType::MatchAccepted);
        assert!(notes[0].message.contains("Tara"));
    }

    #[tokio::test]
    async fn test_create_session_rejects_inverted_slot() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let match_id = m.match_id.clone();
        let f = fixture(vec![m], vec![]);

        let mut request = booking_request(&match_id);
        std::mem::swap(
            &mut request.selected_time_slot.start_time,
            &mut request.selected_time_slot.end_time,
        );

        let result = f.service.create_session("teacher", &request).await;
        assert!(matches!(
            result,
            Err(SessionServiceError::ValidationError(_))
        ));
        assert!(f.sessions.all().is_empty());
    }

    #[tokio::test]
    async fn test_create_session_rejects_non_participant() {
        let m = SkillMatch::new("learner", "teacher", "guitar", None);
        let match_id = m.match_id.clone();
        let f = fixture(vec![m], vec![]);

        let result = f
            .service
            .create_session("stranger", &booking_request(&match_id))
            .await;
        assert!(matches!(result, Err(SessionServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_second_booking_on_active_session_conflicts() {
        let (m, session) = accepted_match_with_session();
        let match_id = m.match_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .create_session("learner", &booking_request(&match_id))
            .await;
        assert!(matches!(result, Err(SessionServiceError::Conflict(_))));
        assert_eq!(f.sessions.all().len(), 1);
    }

    #[tokio::test]
    async fn test_reschedule_reuses_active_session_row() {
        let (m, session) = accepted_match_with_session();
        let match_id = m.match_id.clone();
        let original_session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let mut request = booking_request(&match_id);
        request.is_rescheduling = true;
        let new_start = Utc::now() + Duration::days(3);
        request.selected_time_slot = TimeSlotInput {
            start_time: new_start,
            end_time: new_start + Duration::hours(2),
        };

        let updated = f.service.create_session("learner", &request).await.unwrap();

        assert_eq!(updated.session_id, original_session_id);
        assert_eq!(updated.start_time, new_start);
        assert_eq!(f.sessions.all().len(), 1);

        let stored = f.matches.all();
        assert_eq!(stored[0].status, MatchStatus::Rescheduled);

        let notes = f.notifications.all();
        assert_eq!(
            notes[0].notification_type,
            NotificationType::SessionRescheduled
        );
    }

    #[tokio::test]
    async fn test_rebooking_after_completed_session_archives_it() {
        let (m, mut session) = accepted_match_with_session();
        let match_id = m.match_id.clone();
        let completed_id = session.session_id.clone();
        session.status = SessionStatus::Completed;
        let f = fixture(vec![m], vec![session]);

        let new_session = f
            .service
            .create_session("learner", &booking_request(&match_id))
            .await
            .unwrap();

        assert_ne!(new_session.session_id, completed_id);

        let stored = f.matches.all();
        assert_eq!(stored[0].previous_session_ids, vec![completed_id]);
        assert_eq!(
            stored[0].current_session_id.as_deref(),
            Some(new_session.session_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_dangling_session_pointer_is_self_healed() {
        let (mut m, _session) = accepted_match_with_session();
        m.current_session_id = Some("gone".to_string());
        let match_id = m.match_id.clone();
        let f = fixture(vec![m], vec![]);

        let session = f
            .service
            .create_session("learner", &booking_request(&match_id))
            .await
            .unwrap();

        let stored = f.matches.all();
        assert_eq!(
            stored[0].current_session_id.as_deref(),
            Some(session.session_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_complete_session_is_teacher_only() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f.service.complete_session("learner", &session_id).await;
        assert!(matches!(result, Err(SessionServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_complete_session_requests_feedback_from_both_parties() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let completed = f
            .service
            .complete_session("teacher", &session_id)
            .await
            .unwrap();
        assert_eq!(completed.status, SessionStatus::Completed);

        let notes = f.notifications.all();
        assert_eq!(notes.len(), 2);
        assert!(notes
            .iter()
            .all(|n| n.notification_type == NotificationType::FeedbackRequested));
        let recipients: Vec<&str> = notes.iter().map(|n| n.user_id.as_str()).collect();
        assert!(recipients.contains(&"teacher"));
        assert!(recipients.contains(&"learner"));
    }

    #[tokio::test]
    async fn test_complete_session_twice_conflicts() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        f.service
            .complete_session("teacher", &session_id)
            .await
            .unwrap();
        let result = f.service.complete_session("teacher", &session_id).await;
        assert!(matches!(result, Err(SessionServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cancel_requires_reason() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .cancel_session(
                "learner",
                &session_id,
                &CancelSessionRequest {
                    reason: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(SessionServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_mirrors_onto_match_and_notifies() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let canceled = f
            .service
            .cancel_session(
                "learner",
                &session_id,
                &CancelSessionRequest {
                    reason: "Double booked".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(canceled.status, SessionStatus::Canceled);
        assert_eq!(canceled.cancellation_reason.as_deref(), Some("Double booked"));

        let stored = f.matches.all();
        assert_eq!(stored[0].status, MatchStatus::Canceled);

        let notes = f.notifications.all();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].user_id, "teacher");
        assert_eq!(
            notes[0].notification_type,
            NotificationType::SessionCanceled
        );
        assert!(notes[0].message.contains("Double booked"));
    }

    #[tokio::test]
    async fn test_cancel_completed_session_conflicts() {
        let (m, mut session) = accepted_match_with_session();
        session.status = SessionStatus::Completed;
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .cancel_session(
                "teacher",
                &session_id,
                &CancelSessionRequest {
                    reason: "Too late".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(SessionServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_meeting_link_must_be_https_and_teacher_set() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .update_meeting_link("teacher", &session_id, "http://meet.example.com/x")
            .await;
        assert!(matches!(
            result,
            Err(SessionServiceError::ValidationError(_))
        ));

        let result = f
            .service
            .update_meeting_link("learner", &session_id, "https://meet.example.com/x")
            .await;
        assert!(matches!(result, Err(SessionServiceError::Forbidden(_))));

        let updated = f
            .service
            .update_meeting_link("teacher", &session_id, "https://meet.example.com/x")
            .await
            .unwrap();
        assert_eq!(
            updated.meeting_link.as_deref(),
            Some("https://meet.example.com/x")
        );
    }

    #[tokio::test]
    async fn test_teacher_feedback_rules() {
        let (m, mut session) = accepted_match_with_session();
        session.status = SessionStatus::Completed;
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .submit_teacher_feedback("learner", &session_id, "Great student")
            .await;
        assert!(matches!(result, Err(SessionServiceError::Forbidden(_))));

        let updated = f
            .service
            .submit_teacher_feedback("teacher", &session_id, "Great student")
            .await
            .unwrap();
        assert_eq!(updated.teacher_feedback.as_deref(), Some("Great student"));

        let result = f
            .service
            .submit_teacher_feedback("teacher", &session_id, "Again")
            .await;
        assert!(matches!(result, Err(SessionServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_teacher_feedback_requires_completed_session() {
        let (m, session) = accepted_match_with_session();
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .submit_teacher_feedback("teacher", &session_id, "Too early")
            .await;
        assert!(matches!(result, Err(SessionServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_student_feedback_rules() {
        let (m, mut session) = accepted_match_with_session();
        session.status = SessionStatus::Completed;
        let session_id = session.session_id.clone();
        let f = fixture(vec![m], vec![session]);

        let result = f
            .service
            .submit_student_feedback("learner", &session_id, 0, "x")
            .await;
        assert!(matches!(
            result,
            Err(SessionServiceError::ValidationError(_))
        ));

        let result = f
            .service
            .submit_student_feedback("teacher", &session_id, 5, "x")
            .await;
        assert!(matches!(result, Err(SessionServiceError::Forbidden(_))));

        let updated = f
            .service
            .submit_student_feedback("learner", &session_id, 5, "Learned a lot")
            .await
            .unwrap();
        let feedback = updated.student_feedback.unwrap();
        assert_eq!(feedback.rating, 5);
        assert_eq!(feedback.feedback, "Learned a lot");

        let result = f
            .service
            .submit_student_feedback("learner", &session_id, 4, "Again")
            .await;
        assert!(matches!(result, Err(SessionServiceError::Conflict(_))));
    }
}
