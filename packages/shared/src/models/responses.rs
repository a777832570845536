use serde::Serialize;

use crate::models::skill_match::SkillMatch;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Result of one match-generation run: how many matches the run created in
/// each role, plus the caller's full teaching list for UI refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGenerationResponse {
    pub created_as_learner: usize,
    pub created_as_teacher: usize,
    pub teaching_matches: Vec<SkillMatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMatchesResponse {
    pub as_learner: Vec<SkillMatch>,
    pub as_teacher: Vec<SkillMatch>,
}
