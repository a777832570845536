pub mod auth_service_errors;
pub mod match_service_errors;
pub mod notification_service_errors;
pub mod session_service_errors;
