pub mod notification;
pub mod requests;
pub mod responses;
pub mod session;
pub mod skill;
pub mod skill_match;
pub mod user;
