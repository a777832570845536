pub mod auth_service;
pub mod errors;
pub mod match_generation_service;
pub mod match_status_service;
pub mod notification_service;
pub mod session_service;
