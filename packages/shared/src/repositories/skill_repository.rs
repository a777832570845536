use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::from_item;

use crate::models::skill::{normalize_skill_name, SkillRecord};
use crate::repositories::errors::skill_repository_errors::SkillRepositoryError;

/// Read-only view over the external skill inventory. The matching core
/// never writes skill records.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<SkillRecord>, SkillRepositoryError>;

    /// All teaching-tagged records whose normalized name equals
    /// `normalized_name`. Case and surrounding whitespace in the stored
    /// name are ignored.
    async fn find_teachers_of(
        &self,
        normalized_name: &str,
    ) -> Result<Vec<SkillRecord>, SkillRepositoryError>;
}

pub struct DynamoDbSkillRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbSkillRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("SKILLS_TABLE").expect("SKILLS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl SkillRepository for DynamoDbSkillRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<SkillRecord>, SkillRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("userId = :userId")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| SkillRepositoryError::DynamoDb(e.to_string()))?;

        let mut records = Vec::new();
        if let Some(items) = result.items {
            for item in items {
                let record: SkillRecord = from_item(item)
                    .map_err(|e| SkillRepositoryError::Serialization(e.to_string()))?;
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn find_teachers_of(
        &self,
        normalized_name: &str,
    ) -> Result<Vec<SkillRecord>, SkillRepositoryError> {
        // Skill names are stored as the user typed them, so an exact-key
        // index cannot answer a case-folded lookup. Scan the teaching
        // records and normalize on the way out; the inventory is small
        // relative to the match tables.
        let mut records = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("isTeaching = :true")
                .expression_attribute_values(":true", AttributeValue::Bool(true))
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await
                .map_err(|e| SkillRepositoryError::DynamoDb(e.to_string()))?;

            if let Some(items) = result.items {
                for item in items {
                    let record: SkillRecord = from_item(item)
                        .map_err(|e| SkillRepositoryError::Serialization(e.to_string()))?;
                    if normalize_skill_name(&record.skill_name) == normalized_name {
                        records.push(record);
                    }
                }
            }

            exclusive_start_key = result.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }

        Ok(records)
    }
}
