use serde::{Deserialize, Serialize};

/// Self-reported proficiency for a skill. Any value we do not recognize
/// deserializes to `Unknown`, which ranks below `Beginner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Expert,
    #[serde(other)]
    Unknown,
}

impl ProficiencyLevel {
    /// Ordinal used to gate teacher/learner pairings: a match requires the
    /// teacher's ordinal to be strictly greater than the learner's.
    pub fn ordinal(&self) -> u8 {
        match self {
            ProficiencyLevel::Beginner => 1,
            ProficiencyLevel::Intermediate => 2,
            ProficiencyLevel::Expert => 3,
            ProficiencyLevel::Unknown => 0,
        }
    }
}

/// A skill inventory entry owned by the external skill store. The core only
/// reads these; it never writes them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    pub skill_name: String,
    pub proficiency_level: ProficiencyLevel,
    pub is_teaching: bool,
    pub is_learning: bool,
}

/// Canonical form of a skill name used for matching: trimmed and case-folded.
pub fn normalize_skill_name(name: &str) -> String {
    name.trim().to_lowercase()
}
