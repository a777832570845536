pub mod health;
pub mod matches;
pub mod notifications;
pub mod sessions;
