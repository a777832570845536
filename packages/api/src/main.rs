use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::notification_repository::DynamoDbNotificationRepository;
use shared::repositories::session_repository::DynamoDbSessionRepository;
use shared::repositories::skill_repository::DynamoDbSkillRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::auth_service::AuthService;
use shared::services::match_generation_service::MatchGenerationService;
use shared::services::match_status_service::MatchStatusService;
use shared::services::notification_service::NotificationService;
use shared::services::session_service::SessionService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    // Set up services
    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
    let session_repository = Arc::new(DynamoDbSessionRepository::new(client.clone()));
    let skill_repository = Arc::new(DynamoDbSkillRepository::new(client.clone()));
    let notification_repository = Arc::new(DynamoDbNotificationRepository::new(client.clone()));
    let user_repository = Arc::new(DynamoDbUserRepository::new(client.clone()));

    let auth_service = Arc::new(AuthService::new());
    let notification_service = NotificationService::new(notification_repository);
    let session_service = SessionService::new(
        session_repository,
        match_repository.clone(),
        user_repository.clone(),
        notification_service.clone(),
    );
    let match_generation_service = Arc::new(MatchGenerationService::new(
        skill_repository,
        match_repository.clone(),
    ));
    let match_status_service = Arc::new(MatchStatusService::new(
        match_repository,
        user_repository,
        session_service.clone(),
        notification_service.clone(),
    ));

    let app_state = state::AppState {
        auth_service,
        match_generation_service,
        match_status_service,
        session_service: Arc::new(session_service),
        notification_service: Arc::new(notification_service),
    };

    // Configure CORS
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Merge routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::matches::routes())
        .merge(routes::sessions::routes())
        .merge(routes::notifications::routes())
        .layer(cors)
        .with_state(app_state);

    run(app).await
}
