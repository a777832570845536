use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};

use crate::models::skill_match::SkillMatch;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Atomically creates the match unless a non-terminal match already
    /// occupies its dedup key. Returns `false` when the key was taken,
    /// which callers treat as a silent skip. When a terminal match is
    /// replaced, its session ids are folded into the fresh row's
    /// `previousSessionIds` so old Session rows stay reachable.
    async fn create_if_absent(&self, skill_match: &SkillMatch)
        -> Result<bool, MatchRepositoryError>;

    async fn get_match(&self, match_id: &str) -> Result<Option<SkillMatch>, MatchRepositoryError>;

    async fn update_match(&self, skill_match: &SkillMatch) -> Result<(), MatchRepositoryError>;

    async fn find_by_requester(
        &self,
        user_id: &str,
    ) -> Result<Vec<SkillMatch>, MatchRepositoryError>;

    async fn find_by_teacher(&self, user_id: &str)
        -> Result<Vec<SkillMatch>, MatchRepositoryError>;
}

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("MATCHES_TABLE").expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }

    async fn query_gsi(
        &self,
        index_name: &str,
        key_attribute: &str,
        key_value: &str,
    ) -> Result<Vec<SkillMatch>, MatchRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index_name)
            .key_condition_expression(format!("{} = :value", key_attribute))
            .expression_attribute_values(":value", AttributeValue::S(key_value.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        let mut matches = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let skill_match: SkillMatch = from_item(item)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
                matches.push(skill_match);
            }
        }
        Ok(matches)
    }

    async fn get_by_dedup_key(
        &self,
        dedup_key: &str,
    ) -> Result<Option<SkillMatch>, MatchRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("dedupKey", AttributeValue::S(dedup_key.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let skill_match: SkillMatch =
                from_item(item).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(skill_match))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_if_absent(
        &self,
        skill_match: &SkillMatch,
    ) -> Result<bool, MatchRepositoryError> {
        let mut skill_match = skill_match.clone();

        // A terminal match no longer blocks the key, but matches are never
        // hard-deleted: fold the replaced row's session ids forward so its
        // Session rows stay reachable from the live match.
        match self.get_by_dedup_key(&skill_match.dedup_key).await? {
            Some(existing) if !existing.status.is_terminal() => return Ok(false),
            Some(existing) => {
                let mut session_ids = existing.previous_session_ids;
                if let Some(session_id) = existing.current_session_id {
                    session_ids.push(session_id);
                }
                session_ids.extend(skill_match.previous_session_ids);
                skill_match.previous_session_ids = session_ids;
            }
            None => {}
        }

        let item = to_item(&skill_match)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        // The table is partitioned by dedupKey, so one conditional put is
        // the whole uniqueness check; it also guards the read-to-write gap
        // above against a concurrent writer reactivating the key.
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(
                "attribute_not_exists(dedupKey) OR #st IN (:rejected, :completed, :canceled)",
            )
            .expression_attribute_names("#st", "status")
            .expression_attribute_values(":rejected", AttributeValue::S("rejected".to_string()))
            .expression_attribute_values(":completed", AttributeValue::S("completed".to_string()))
            .expression_attribute_values(":canceled", AttributeValue::S("canceled".to_string()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Ok(false);
                    }
                }
                Err(MatchRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<SkillMatch>, MatchRepositoryError> {
        let matches = self.query_gsi("GSI_MatchById", "matchId", match_id).await?;
        Ok(matches.into_iter().next())
    }

    async fn update_match(&self, skill_match: &SkillMatch) -> Result<(), MatchRepositoryError> {
        let item =
            to_item(skill_match).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        // Guard against resurrecting a deleted row or clobbering a row that
        // has since been replaced by a different match on the same key.
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(dedupKey) AND matchId = :matchId")
            .expression_attribute_values(
                ":matchId",
                AttributeValue::S(skill_match.match_id.clone()),
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(MatchRepositoryError::NotFound);
                    }
                }
                Err(MatchRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn find_by_requester(
        &self,
        user_id: &str,
    ) -> Result<Vec<SkillMatch>, MatchRepositoryError> {
        self.query_gsi("GSI_MatchByRequester", "requesterId", user_id)
            .await
    }

    async fn find_by_teacher(
        &self,
        user_id: &str,
    ) -> Result<Vec<SkillMatch>, MatchRepositoryError> {
        self.query_gsi("GSI_MatchByTeacher", "teacherId", user_id)
            .await
    }
}
