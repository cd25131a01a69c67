//! TTS Lambda
//!
//! Lambda function converting text to speech using Amazon Polly and S3.

use anyhow::{Result, anyhow};
use lambda_http::{Request, run, service_fn};
use tts_lambda::SpeechFunction;
use tts_lambda_common::Config;
use tts_lambda_common::tracing::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("tts-lambda starting...");

    let config = Config::from_env()?;
    tracing::info!(bucket = %config.bucket_name, "Loaded configuration");

    // Clients are built once per cold start and shared by every invocation.
    let function = SpeechFunction::from_config(config).await;
    let function = &function;

    run(service_fn(move |event: Request| async move {
        Ok::<_, lambda_http::Error>(function.handle(event).await)
    }))
    .await
    .map_err(|e| anyhow!(e))?;

    Ok(())
}
