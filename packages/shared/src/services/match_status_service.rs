use std::sync::Arc;

use chrono::Utc;
use tracing::error;

use crate::models::notification::NotificationType;
use crate::models::requests::UpdateMatchStatusRequest;
use crate::models::responses::UserMatchesResponse;
use crate::models::session::SessionDetails;
use crate::models::skill_match::{
    MatchStatus, SelectedTimeSlot, SkillMatch, StatusMessage, TimeSlot, TimeSlotProposal,
};
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::match_service_errors::MatchServiceError;
use crate::services::notification_service::NotificationService;
use crate::services::session_service::SessionService;

/// What a status update actually means, derived from the previous status,
/// the requested status and the slots attached to the request. The same
/// `accepted` target is an acceptance the first time and an implicit
/// reschedule when the match was already accepted and a new slot arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Proposed,
    Accepted,
    Reschedule,
    Rejected,
    Completed,
    MessageOnly,
}

impl TransitionKind {
    fn notification_type(&self) -> NotificationType {
        match self {
            TransitionKind::Proposed => NotificationType::SessionProposed,
            TransitionKind::Accepted => NotificationType::MatchAccepted,
            TransitionKind::Reschedule => NotificationType::SessionRescheduled,
            TransitionKind::Rejected => NotificationType::MatchRejected,
            TransitionKind::Completed => NotificationType::SessionCompleted,
            TransitionKind::MessageOnly => NotificationType::SessionMessage,
        }
    }
}

pub fn classify_transition(
    previous: MatchStatus,
    requested: MatchStatus,
    has_selected_slot: bool,
    has_proposed_slots: bool,
) -> TransitionKind {
    match requested {
        MatchStatus::Completed => TransitionKind::Completed,
        MatchStatus::Rejected => TransitionKind::Rejected,
        MatchStatus::Rescheduled => TransitionKind::Reschedule,
        MatchStatus::Accepted if previous == MatchStatus::Accepted && has_selected_slot => {
            TransitionKind::Reschedule
        }
        MatchStatus::Accepted if previous == MatchStatus::Accepted => TransitionKind::MessageOnly,
        MatchStatus::Accepted => TransitionKind::Accepted,
        MatchStatus::Pending
            if previous == MatchStatus::Pending && !has_selected_slot && !has_proposed_slots =>
        {
            TransitionKind::MessageOnly
        }
        _ => TransitionKind::Proposed,
    }
}

/// Drives the negotiation state machine over a match and fans the outcome
/// out to the session lifecycle and the notification dispatcher.
#[derive(Clone)]
pub struct MatchStatusService {
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    session_service: SessionService,
    notification_service: NotificationService,
}

impl MatchStatusService {
    pub fn new(
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        session_service: SessionService,
        notification_service: NotificationService,
    ) -> Self {
        MatchStatusService {
            match_repository,
            user_repository,
            session_service,
            notification_service,
        }
    }

    pub async fn get_user_matches(
        &self,
        user_id: &str,
    ) -> Result<UserMatchesResponse, MatchServiceError> {
        let as_learner = self.match_repository.find_by_requester(user_id).await?;
        let as_teacher = self.match_repository.find_by_teacher(user_id).await?;
        Ok(UserMatchesResponse {
            as_learner,
            as_teacher,
        })
    }

    pub async fn update_match_status(
        &self,
        actor_id: &str,
        match_id: &str,
        request: &UpdateMatchStatusRequest,
    ) -> Result<SkillMatch, MatchServiceError> {
        let requested = MatchStatus::parse_requested(&request.status).ok_or_else(|| {
            MatchServiceError::ValidationError(format!(
                "'{}' is not a valid target status",
                request.status
            ))
        })?;

        let mut skill_match = self
            .match_repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if !skill_match.is_party(actor_id) {
            return Err(MatchServiceError::Forbidden(
                "Only a participant of the match can update it".to_string(),
            ));
        }

        let has_proposed_slots = request
            .proposed_time_slots
            .as_ref()
            .is_some_and(|slots| !slots.is_empty());
        let kind = classify_transition(
            skill_match.status,
            requested,
            request.selected_time_slot.is_some(),
            has_proposed_slots,
        );

        if !skill_match.status.can_transition_to(requested) {
            return Err(MatchServiceError::Conflict(format!(
                "Cannot move match from {} to {}",
                skill_match.status, requested
            )));
        }

        let now = Utc::now();

        // Completion forces the status; any slot payload riding along with
        // it is ignored rather than recorded.
        if let Some(slots) = &request.proposed_time_slots {
            if kind != TransitionKind::Completed && !slots.is_empty() {
                for slot in slots {
                    if slot.end_time <= slot.start_time {
                        return Err(MatchServiceError::ValidationError(
                            "Time slot end must be after its start".to_string(),
                        ));
                    }
                }
                let stamped: Vec<TimeSlot> = slots
                    .iter()
                    .map(|s| TimeSlot {
                        start_time: s.start_time,
                        end_time: s.end_time,
                        proposed_by: actor_id.to_string(),
                    })
                    .collect();
                skill_match.time_slot_history.push(TimeSlotProposal {
                    proposed_by: actor_id.to_string(),
                    proposed_at: now,
                    slots: stamped.clone(),
                });
                skill_match.proposed_time_slots = stamped;
            }
        }

        let selected_slot = match &request.selected_time_slot {
            Some(_) if kind == TransitionKind::Completed => None,
            Some(input) => {
                if input.end_time <= input.start_time {
                    return Err(MatchServiceError::ValidationError(
                        "Time slot end must be after its start".to_string(),
                    ));
                }
                let slot = SelectedTimeSlot {
                    start_time: input.start_time,
                    end_time: input.end_time,
                    selected_by: actor_id.to_string(),
                    selected_at: now,
                };
                skill_match.selected_time_slot = Some(slot.clone());
                Some(slot)
            }
            None => None,
        };

        if let Some(message) = &request.message {
            if !message.trim().is_empty() {
                skill_match.status_messages.push(StatusMessage {
                    user_id: actor_id.to_string(),
                    message: message.clone(),
                    timestamp: now,
                });
                if requested == MatchStatus::Rejected {
                    skill_match.rejection_reason = Some(message.clone());
                }
            }
        }

        if kind != TransitionKind::MessageOnly {
            skill_match.status = requested;
        }
        skill_match.updated_at = now;

        // Booking a session persists the match itself; everything else is a
        // plain match write.
        match (&kind, &selected_slot) {
            (TransitionKind::Accepted | TransitionKind::Reschedule, Some(slot)) => {
                self.session_service
                    .create_or_update_session(
                        &mut skill_match,
                        slot,
                        &SessionDetails::default(),
                        kind == TransitionKind::Reschedule,
                    )
                    .await?;
            }
            _ => {
                self.match_repository.update_match(&skill_match).await?;
            }
        }

        self.notify_other_party(actor_id, &skill_match, kind, request.message.as_deref())
            .await;

        Ok(skill_match)
    }

    async fn notify_other_party(
        &self,
        actor_id: &str,
        skill_match: &SkillMatch,
        kind: TransitionKind,
        message: Option<&str>,
    ) {
        let actor_name = match self.user_repository.get_user_by_id(actor_id).await {
            Ok(user) => user.name,
            Err(_) => actor_id.to_string(),
        };
        let skill = &skill_match.skill_name;

        let (title, body) = match kind {
            TransitionKind::Proposed => (
                "New session proposal".to_string(),
                format!("{} proposed times for a {} session", actor_name, skill),
            ),
            TransitionKind::Accepted => (
                "Match accepted".to_string(),
                format!("{} accepted your {} match", actor_name, skill),
            ),
            TransitionKind::Reschedule => (
                "Session rescheduled".to_string(),
                format!("{} moved your {} session to a new time", actor_name, skill),
            ),
            TransitionKind::Rejected => (
                "Match declined".to_string(),
                match message {
                    Some(reason) => {
                        format!("{} declined your {} match: {}", actor_name, skill, reason)
                    }
                    None => format!("{} declined your {} match", actor_name, skill),
                },
            ),
            TransitionKind::Completed => (
                "Match completed".to_string(),
                format!("{} marked your {} match as completed", actor_name, skill),
            ),
            TransitionKind::MessageOnly => (
                "New message".to_string(),
                match message {
                    Some(text) => format!("{}: {}", actor_name, text),
                    None => format!("{} sent an update on your {} match", actor_name, skill),
                },
            ),
        };

        if let Err(e) = self
            .notification_service
            .notify(
                skill_match.other_party(actor_id),
                kind.notification_type(),
                &skill_match.match_id,
                "Match",
                &title,
                &body,
            )
            .await
        {
            error!(
                "Failed to record notification for match {}: {}",
                skill_match.match_id, e
            );
        }
    }
}
