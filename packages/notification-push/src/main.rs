use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{error, info};

use shared::repositories::connection_repository::DynamoDbConnectionRepository;

pub mod processor;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    info!("Notification push Lambda function starting");

    let config = aws_config::load_from_env().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);
    let connections = DynamoDbConnectionRepository::new(dynamodb_client);

    run(service_fn(|event: LambdaEvent<Event>| async {
        let (event, _context) = event.into_parts();

        info!("Processing {} records", event.records.len());

        for record in event.records {
            if let Err(e) = processor::process_record(record, &connections).await {
                error!("Failed to process record: {}", e);
            }
        }

        Ok::<(), Error>(())
    }))
    .await
}
