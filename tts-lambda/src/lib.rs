//! TTS Lambda Library
//!
//! This library converts text to speech with Amazon Polly, stores the MP3 in
//! Amazon S3 and answers with a public URL, packaged as an HTTP Lambda
//! function.

pub mod function;
pub mod handler;
pub mod synthesizer;

#[cfg(test)]
mod test_support;

pub use function::SpeechFunction;
pub use handler::{SpeechHandler, SpeechRequest, SpeechResult, ValidationError};
pub use synthesizer::{
    PollySynthesizer, SpeechEngine, SpeechSynthesizer, SynthesisRequest, synthesize_with_fallback,
};
