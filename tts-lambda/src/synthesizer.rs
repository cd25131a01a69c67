//! Speech synthesis seam and the Amazon Polly implementation.
//!
//! Polly rejects some voice/engine combinations (not every voice has a
//! neural variant), so a conversion first asks for the neural engine and
//! falls back to the standard engine exactly once.

use async_trait::async_trait;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, VoiceId};
use tts_lambda_common::error::{Error, Result};
use tracing::{debug, instrument, warn};

/// Engine requested first.
pub const PRIMARY_ENGINE: SpeechEngine = SpeechEngine::Neural;

/// Engine requested when the primary engine fails.
pub const FALLBACK_ENGINE: SpeechEngine = SpeechEngine::Standard;

/// Audio format requested from the synthesis service.
pub const OUTPUT_FORMAT: &str = "mp3";

/// Polly synthesis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeechEngine {
    Neural,
    Standard,
}

impl SpeechEngine {
    /// Wire name of the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechEngine::Neural => "neural",
            SpeechEngine::Standard => "standard",
        }
    }
}

impl std::fmt::Display for SpeechEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SpeechEngine> for Engine {
    fn from(engine: SpeechEngine) -> Self {
        match engine {
            SpeechEngine::Neural => Engine::Neural,
            SpeechEngine::Standard => Engine::Standard,
        }
    }
}

/// Parameters for a single synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Text to speak, exactly as submitted
    pub text: String,
    /// Polly voice id (e.g. "Joanna")
    pub voice_id: String,
    /// BCP-47 language code (e.g. "en-US")
    pub language_code: String,
    /// Engine for this attempt
    pub engine: SpeechEngine,
}

impl SynthesisRequest {
    /// Build a request using the primary engine.
    pub fn new(
        text: impl Into<String>,
        voice_id: impl Into<String>,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            language_code: language_code.into(),
            engine: PRIMARY_ENGINE,
        }
    }

    /// Same parameters with a different engine.
    pub fn with_engine(&self, engine: SpeechEngine) -> Self {
        Self {
            engine,
            ..self.clone()
        }
    }
}

/// Text-to-speech seam.
///
/// Implementations are shared across concurrent invocations.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `request` into encoded MP3 bytes.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>>;
}

/// Synthesize with the primary engine, retrying once with the fallback engine.
///
/// The first failure is logged and discarded; only the fallback's error is
/// returned to the caller.
#[instrument(level = "debug", skip_all, fields(voice = %request.voice_id))]
pub async fn synthesize_with_fallback(
    synthesizer: &dyn SpeechSynthesizer,
    request: &SynthesisRequest,
) -> Result<Vec<u8>> {
    match synthesizer.synthesize(&request.with_engine(PRIMARY_ENGINE)).await {
        Ok(audio) => Ok(audio),
        Err(err) => {
            warn!(error = %err, "Neural engine failed, trying standard engine");
            synthesizer
                .synthesize(&request.with_engine(FALLBACK_ENGINE))
                .await
        }
    }
}

/// Amazon Polly synthesizer.
#[derive(Debug, Clone)]
pub struct PollySynthesizer {
    client: aws_sdk_polly::Client,
}

impl PollySynthesizer {
    /// Create a synthesizer from shared AWS SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::with_client(aws_sdk_polly::Client::new(sdk_config))
    }

    /// Create a synthesizer around an existing client.
    pub fn with_client(client: aws_sdk_polly::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    #[instrument(level = "debug", name = "polly_synthesize_speech", skip_all, fields(engine = %request.engine))]
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let engine = request.engine;

        let output = self
            .client
            .synthesize_speech()
            .text(&request.text)
            .output_format(OutputFormat::from(OUTPUT_FORMAT))
            .voice_id(VoiceId::from(request.voice_id.as_str()))
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .engine(Engine::from(engine))
            .send()
            .await
            .map_err(|e| Error::synthesis(engine.as_str(), DisplayErrorContext(&e).to_string()))?;

        // Chunks are appended in the order Polly streams them.
        let mut stream = output.audio_stream;
        let mut audio = Vec::new();
        while let Some(chunk) = stream.try_next().await.map_err(|e| {
            Error::synthesis(engine.as_str(), format!("Failed to read audio stream: {}", e))
        })? {
            audio.extend_from_slice(&chunk);
        }

        debug!(bytes = audio.len(), "Received audio stream from Polly");
        Ok(audio)
    }
}
