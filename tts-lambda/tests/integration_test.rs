//! Integration tests for the tts-lambda function.
//!
//! Run with: `cargo test --package tts-lambda --test integration_test`
//! Skip in CI: `cargo test --package tts-lambda --lib`
//!
//! The live tests require:
//! - AWS credentials resolvable by the default provider chain
//! - S3_BUCKET_NAME environment variable set to a writable bucket
//! - Access to Amazon Polly in the configured region

use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request};
use tts_lambda::handler::{DEFAULT_LANGUAGE_CODE, DEFAULT_VOICE, MAX_TEXT_LENGTH};
use tts_lambda::{
    SpeechEngine, SpeechFunction, SpeechHandler, SpeechRequest, SpeechSynthesizer,
    SynthesisRequest, ValidationError,
};
use tts_lambda_common::config::Config;
use tts_lambda_common::error::{Error, StorageError};
use tts_lambda_common::s3::{ObjectStore, S3Uri, UploadOptions};

static INIT: Once = Once::new();

/// Initialize environment from .env file once
fn init_env() {
    INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Helper to get live test configuration from environment.
fn get_test_config() -> Option<Config> {
    init_env();

    env::var("S3_BUCKET_NAME").ok()?;
    Config::from_env().ok()
}

/// Check if live integration tests should run.
fn should_run_integration_tests() -> bool {
    if env::var("SKIP_INTEGRATION_TESTS").is_ok() {
        return false;
    }
    get_test_config().is_some()
}

/// Macro to skip test if integration tests are disabled.
macro_rules! skip_if_no_integration {
    () => {
        if !should_run_integration_tests() {
            eprintln!("Skipping integration test: no valid configuration");
            return;
        }
    };
}

fn offline_config() -> Config {
    Config {
        bucket_name: "offline-bucket".to_string(),
        audio_expiry_secs: 3600,
        aws_profile: None,
        region: None,
    }
}

/// Synthesizer that only supports the standard engine.
#[derive(Default)]
struct StandardOnlySynthesizer {
    engines: Mutex<Vec<SpeechEngine>>,
}

#[async_trait]
impl SpeechSynthesizer for StandardOnlySynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error> {
        self.engines.lock().unwrap().push(request.engine);
        match request.engine {
            SpeechEngine::Neural => Err(Error::synthesis("neural", "engine not supported")),
            SpeechEngine::Standard => Ok(request.text.as_bytes().to_vec()),
        }
    }
}

/// Store that records keys it was asked to write.
#[derive(Default)]
struct KeyRecordingStore {
    keys: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStore for KeyRecordingStore {
    async fn put(
        &self,
        uri: &S3Uri,
        _data: Vec<u8>,
        _options: &UploadOptions,
    ) -> Result<(), StorageError> {
        self.keys.lock().unwrap().push(uri.key.clone());
        Ok(())
    }
}

fn post(body: &str) -> Request {
    let mut request = Request::new(Body::from(body));
    *request.method_mut() = Method::POST;
    request
}

#[test]
fn test_validation_empty_text() {
    let request = SpeechRequest::new("");
    assert_eq!(request.validate(), Err(ValidationError::MissingText));
}

#[test]
fn test_validation_text_too_long() {
    let request = SpeechRequest::new("x".repeat(MAX_TEXT_LENGTH + 1));
    let err = request.validate().unwrap_err();
    assert!(err.to_string().contains("3000"));
}

#[test]
fn test_request_defaults() {
    let request = SpeechRequest::from_json(br#"{"text": "Hello world"}"#).unwrap();
    assert_eq!(request.get_voice(), DEFAULT_VOICE);
    assert_eq!(request.get_language(), DEFAULT_LANGUAGE_CODE);
}

#[tokio::test]
async fn test_function_with_custom_collaborators() {
    let synth = Arc::new(StandardOnlySynthesizer::default());
    let store = Arc::new(KeyRecordingStore::default());
    let handler = SpeechHandler::with_deps(offline_config(), synth.clone(), store.clone());
    let function = SpeechFunction::new(handler);

    let response = function.handle(post(r#"{"text": "Hello world"}"#)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    let keys = store.keys.lock().unwrap().clone();
    assert_eq!(keys.len(), 1);
    assert_eq!(body["fileName"], keys[0].as_str());
    assert_eq!(
        *synth.engines.lock().unwrap(),
        vec![SpeechEngine::Neural, SpeechEngine::Standard]
    );
}

#[tokio::test]
async fn test_live_convert_hello_world() {
    skip_if_no_integration!();

    let config = get_test_config().unwrap();
    let bucket = config.bucket_name.clone();
    let handler = SpeechHandler::new(config).await;

    let result = handler.convert(&SpeechRequest::new("Hello world")).await;
    assert!(result.is_ok(), "Conversion failed: {:?}", result.err());

    let result = result.unwrap();
    assert_eq!(result.voice, "Joanna");
    assert_eq!(result.language, "en-US");
    assert!(result.file_name.starts_with("speech-") && result.file_name.ends_with(".mp3"));
    assert_eq!(
        result.audio_url,
        format!("https://{}.s3.amazonaws.com/{}", bucket, result.file_name)
    );
}

#[tokio::test]
async fn test_live_standard_only_voice_falls_back() {
    skip_if_no_integration!();

    // Raveena (en-IN) has no neural variant, so the neural attempt is rejected.
    let config = get_test_config().unwrap();
    let function = SpeechFunction::from_config(config).await;

    let response = function
        .handle(post(
            r#"{"text": "Fallback check", "voiceId": "Raveena", "languageCode": "en-IN"}"#,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_live_unknown_voice_returns_500() {
    skip_if_no_integration!();

    let config = get_test_config().unwrap();
    let function = SpeechFunction::from_config(config).await;

    let response = function
        .handle(post(r#"{"text": "Hello", "voiceId": "NotAVoice"}"#))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"], "Failed to convert text to speech");
    assert!(body["message"].is_string());
}
