use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::skill::{normalize_skill_name, SkillRecord};
use crate::models::skill_match::SkillMatch;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::skill_repository::SkillRepository;
use crate::services::errors::match_service_errors::MatchServiceError;

/// Result of one generation run for a single user.
#[derive(Debug)]
pub struct MatchGenerationOutcome {
    pub created_as_learner: usize,
    pub created_as_teacher: usize,
    pub teaching_matches: Vec<SkillMatch>,
}

/// Discovers reciprocal teach/learn pairings and materializes them as
/// matches. Safe to re-run at any time: every create is an atomic
/// conditional put on the match dedup key, so repeated or concurrent runs
/// converge on the same set of rows.
#[derive(Clone)]
pub struct MatchGenerationService {
    skill_repository: Arc<dyn SkillRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
}

impl MatchGenerationService {
    pub fn new(
        skill_repository: Arc<dyn SkillRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
    ) -> Self {
        MatchGenerationService {
            skill_repository,
            match_repository,
        }
    }

    pub async fn generate_matches(
        &self,
        user_id: &str,
    ) -> Result<MatchGenerationOutcome, MatchServiceError> {
        if user_id.is_empty() {
            return Err(MatchServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }

        let my_skills = self.skill_repository.find_by_user(user_id).await?;
        let my_learning: Vec<&SkillRecord> =
            my_skills.iter().filter(|s| s.is_learning).collect();
        let my_teaching: Vec<&SkillRecord> =
            my_skills.iter().filter(|s| s.is_teaching).collect();

        let mut created_as_learner = 0;
        let mut created_as_teacher = 0;
        // Each candidate teacher's inventory is inspected once per run even
        // when they teach several of the user's learning skills.
        let mut inspected_teachers: HashSet<String> = HashSet::new();

        for learning in &my_learning {
            let normalized = normalize_skill_name(&learning.skill_name);
            if normalized.is_empty() {
                warn!(
                    "Skipping unnamed learning skill for user {} during generation",
                    user_id
                );
                continue;
            }

            let candidates = match self.skill_repository.find_teachers_of(&normalized).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    // Skip-and-continue: one bad lookup must not abort the
                    // run, a later re-run picks the skill up again.
                    warn!(
                        "Failed to look up teachers of '{}' for user {}: {}",
                        normalized, user_id, e
                    );
                    continue;
                }
            };

            for teaching in candidates.iter().filter(|t| t.user_id != user_id) {
                if teaching.proficiency_level.ordinal() <= learning.proficiency_level.ordinal() {
                    debug!(
                        "Skipping teacher {} for '{}': proficiency not strictly higher",
                        teaching.user_id, normalized
                    );
                    continue;
                }

                let skill_match = SkillMatch::new(
                    user_id,
                    &teaching.user_id,
                    &teaching.skill_name,
                    teaching.id.clone(),
                );
                match self.match_repository.create_if_absent(&skill_match).await {
                    Ok(true) => created_as_learner += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(
                            "Failed to create match {} during generation: {}",
                            skill_match.dedup_key, e
                        );
                        continue;
                    }
                }

                if inspected_teachers.insert(teaching.user_id.clone()) {
                    created_as_teacher += self
                        .reciprocal_pass(user_id, &teaching.user_id, &my_teaching)
                        .await;
                }
            }
        }

        let teaching_matches = self.match_repository.find_by_teacher(user_id).await?;

        info!(
            "Match generation for user {}: {} as learner, {} as teacher",
            user_id, created_as_learner, created_as_teacher
        );

        Ok(MatchGenerationOutcome {
            created_as_learner,
            created_as_teacher,
            teaching_matches,
        })
    }

    /// Checks whether `user_id` can teach any of `candidate_id`'s learning
    /// skills at a strictly higher proficiency and creates the mirrored
    /// matches. Failures are logged and skipped like the forward pass.
    async fn reciprocal_pass(
        &self,
        user_id: &str,
        candidate_id: &str,
        my_teaching: &[&SkillRecord],
    ) -> usize {
        let candidate_skills = match self.skill_repository.find_by_user(candidate_id).await {
            Ok(skills) => skills,
            Err(e) => {
                warn!(
                    "Failed to load skills of candidate teacher {}: {}",
                    candidate_id, e
                );
                return 0;
            }
        };

        let mut created = 0;
        for their_learning in candidate_skills.iter().filter(|s| s.is_learning) {
            let normalized = normalize_skill_name(&their_learning.skill_name);
            if normalized.is_empty() {
                continue;
            }

            for mine in my_teaching {
                if normalize_skill_name(&mine.skill_name) != normalized {
                    continue;
                }
                if mine.proficiency_level.ordinal()
                    <= their_learning.proficiency_level.ordinal()
                {
                    continue;
                }

                let skill_match =
                    SkillMatch::new(candidate_id, user_id, &mine.skill_name, mine.id.clone());
                match self.match_repository.create_if_absent(&skill_match).await {
                    Ok(true) => created += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(
                            "Failed to create reciprocal match {}: {}",
                            skill_match.dedup_key, e
                        );
                    }
                }
            }
        }
        created
    }
}
