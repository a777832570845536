use std::sync::Arc;

use shared::services::auth_service::AuthService;
use shared::services::match_generation_service::MatchGenerationService;
use shared::services::match_status_service::MatchStatusService;
use shared::services::notification_service::NotificationService;
use shared::services::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub match_generation_service: Arc<MatchGenerationService>,
    pub match_status_service: Arc<MatchStatusService>,
    pub session_service: Arc<SessionService>,
    pub notification_service: Arc<NotificationService>,
}
