use async_trait::async_trait;
use aws_sdk_apigatewaymanagement::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::env;
use tracing::info;

/// Lookup and delivery for live WebSocket connections. Delivery is
/// best-effort: a user without a live connection is not an error, they will
/// see the persisted notification on next load.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn get_connection_id(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub struct DynamoDbConnectionRepository {
    dynamodb_client: DynamoDbClient,
    table_name: String,
}

impl DynamoDbConnectionRepository {
    pub fn new(dynamodb_client: DynamoDbClient) -> Self {
        let table_name = env::var("USER_CONNECTIONS_TABLE")
            .expect("USER_CONNECTIONS_TABLE environment variable must be set");

        Self {
            dynamodb_client,
            table_name,
        }
    }

    fn api_gateway_endpoint(&self) -> String {
        // Format: https://{api-id}.execute-api.{region}.amazonaws.com/{stage}
        if let Ok(endpoint) = env::var("WEBSOCKET_API_ENDPOINT") {
            endpoint
        } else {
            let region = env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string());
            let api_id = env::var("WEBSOCKET_API_ID").unwrap_or_default();
            let stage = env::var("STAGE").unwrap_or_else(|_| "dev".to_string());

            format!(
                "https://{}.execute-api.{}.amazonaws.com/{}",
                api_id, region, stage
            )
        }
    }
}

#[async_trait]
impl ConnectionRepository for DynamoDbConnectionRepository {
    async fn get_connection_id(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .send()
            .await?;

        if let Some(item) = result.item {
            if let Some(AttributeValue::S(connection_id)) = item.get("connectionId") {
                return Ok(Some(connection_id.clone()));
            }
        }

        Ok(None)
    }

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let config = aws_config::load_from_env().await;
        let api_gateway_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
            .endpoint_url(self.api_gateway_endpoint())
            .build();
        let api_gateway_client =
            aws_sdk_apigatewaymanagement::Client::from_conf(api_gateway_config);

        api_gateway_client
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(message.as_bytes()))
            .send()
            .await?;

        info!("Pushed message to connection: {}", connection_id);
        Ok(())
    }
}
