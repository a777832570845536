pub mod connection_repository;
pub mod errors;
pub mod match_repository;
pub mod notification_repository;
pub mod session_repository;
pub mod skill_repository;
pub mod user_repository;
