pub mod match_repository_errors;
pub mod notification_repository_errors;
pub mod session_repository_errors;
pub mod skill_repository_errors;
pub mod user_repository_errors;
