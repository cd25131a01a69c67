//! Text-to-speech conversion handler.
//!
//! This module provides the `SpeechHandler` struct and request types. A
//! conversion validates the request, synthesizes MP3 audio with Polly
//! (neural engine first, standard engine as fallback), uploads it to S3 and
//! describes where it was stored.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use tts_lambda_common::config::Config;
use tts_lambda_common::error::Error;
use tts_lambda_common::s3::{ObjectStore, S3Store, S3Uri, UploadOptions};
use uuid::Uuid;

use crate::synthesizer::{
    PollySynthesizer, SpeechSynthesizer, SynthesisRequest, synthesize_with_fallback,
};

/// Default Polly voice.
pub const DEFAULT_VOICE: &str = "Joanna";

/// Default language code.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Maximum accepted text length, in UTF-16 code units.
pub const MAX_TEXT_LENGTH: usize = 3000;

/// Content type of the stored audio.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Cache directive attached to the stored audio.
pub const AUDIO_CACHE_CONTROL: &str = "max-age=3600";

/// Text-to-speech request body.
///
/// Fields that are absent, not strings, or (for voice and language) empty
/// are treated as not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    /// Text to synthesize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Polly voice id (e.g. "Joanna", "Matthew").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    /// Language code (e.g. "en-US", "es-ES").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// Request validation failures, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `text` is missing or only whitespace.
    #[error("Text is required")]
    MissingText,

    /// `text` exceeds `MAX_TEXT_LENGTH` UTF-16 code units.
    #[error("Text is too long. Maximum {max} characters allowed.", max = MAX_TEXT_LENGTH)]
    TextTooLong {
        /// Length of the submitted text, in UTF-16 code units.
        length: usize,
    },
}

impl SpeechRequest {
    /// Create a request with only `text` set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Parse a JSON request body.
    ///
    /// # Errors
    /// Returns the parse error if `body` is not valid JSON. A valid JSON
    /// value that is not an object yields an empty request.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(&value))
    }

    /// Extract the request fields from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            text: field("text"),
            voice_id: field("voiceId"),
            language_code: field("languageCode"),
        }
    }

    /// Validate the request and return the text to synthesize.
    ///
    /// The text is returned untrimmed; trimming only decides emptiness.
    /// Length is measured in UTF-16 code units, so a character outside the
    /// Basic Multilingual Plane (most emoji) counts twice.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let text = match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ValidationError::MissingText),
        };

        let length = text.encode_utf16().count();
        if length > MAX_TEXT_LENGTH {
            return Err(ValidationError::TextTooLong { length });
        }

        Ok(text)
    }

    /// Get the voice to use, defaulting if not specified.
    pub fn get_voice(&self) -> &str {
        self.voice_id
            .as_deref()
            .filter(|voice| !voice.is_empty())
            .unwrap_or(DEFAULT_VOICE)
    }

    /// Get the language code to use, defaulting if not specified.
    pub fn get_language(&self) -> &str {
        self.language_code
            .as_deref()
            .filter(|language| !language.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE_CODE)
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResult {
    /// Public (unsigned) URL of the stored audio.
    pub audio_url: String,
    /// Object key, `speech-<uuid>.mp3`.
    pub file_name: String,
    /// Voice actually used.
    pub voice: String,
    /// Language actually used.
    pub language: String,
    /// Configured expiry in seconds; informational only.
    pub expires_in: u64,
}

/// Generate a unique object key for a new audio file.
pub fn new_file_name() -> String {
    format!("speech-{}.mp3", Uuid::new_v4())
}

/// Text-to-speech handler.
///
/// Holds the process-wide collaborators. Cheap to share by reference across
/// concurrent invocations.
pub struct SpeechHandler {
    /// Application configuration.
    pub config: Config,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn ObjectStore>,
}

impl SpeechHandler {
    /// Create a handler backed by Amazon Polly and Amazon S3.
    #[instrument(level = "debug", name = "speech_handler_new", skip_all)]
    pub async fn new(config: Config) -> Self {
        debug!(bucket = %config.bucket_name, "Initializing SpeechHandler");

        let sdk_config = config.aws_sdk_config().await;
        let synthesizer = Arc::new(PollySynthesizer::new(&sdk_config));
        let store = Arc::new(S3Store::new(&sdk_config));

        Self::with_deps(config, synthesizer, store)
    }

    /// Create a handler with provided collaborators.
    pub fn with_deps(
        config: Config,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            synthesizer,
            store,
        }
    }

    /// Convert the request's text to speech and store it.
    ///
    /// # Returns
    /// * `Ok(SpeechResult)` - Where the audio was stored and how it was voiced
    /// * `Err(Error::Validation)` - If the request is invalid; nothing is called
    /// * `Err(Error)` - If synthesis (after fallback) or the upload fails
    #[instrument(level = "info", name = "convert_text_to_speech", skip(self, request))]
    pub async fn convert(&self, request: &SpeechRequest) -> Result<SpeechResult, Error> {
        let text = request
            .validate()
            .map_err(|e| Error::validation(e.to_string()))?;

        let voice = request.get_voice();
        let language = request.get_language();
        info!(voice, language, "Converting text to speech");

        let synthesis = SynthesisRequest::new(text, voice, language);
        let audio = synthesize_with_fallback(self.synthesizer.as_ref(), &synthesis).await?;

        let file_name = new_file_name();
        let uri = S3Uri::new(&self.config.bucket_name, &file_name);
        let options = UploadOptions {
            content_type: AUDIO_CONTENT_TYPE.to_string(),
            cache_control: Some(AUDIO_CACHE_CONTROL.to_string()),
        };
        self.store.put(&uri, audio, &options).await?;
        info!(uri = %uri, "Audio file uploaded to S3");

        Ok(SpeechResult {
            audio_url: uri.public_url(),
            file_name,
            voice: voice.to_string(),
            language: language.to_string(),
            expires_in: self.config.audio_expiry_secs,
        })
    }
}
