//! Configuration module for loading environment variables and settings.

use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::error::ConfigError;

/// Bucket used when `S3_BUCKET_NAME` is unset or empty.
pub const DEFAULT_BUCKET_NAME: &str = "your-audio-bucket-name";

/// Expiry reported to clients, in seconds (1 hour).
pub const DEFAULT_AUDIO_EXPIRY_SECS: u64 = 3600;

/// Application configuration loaded from environment variables.
///
/// Built once per cold start and shared read-only by every invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// S3 bucket receiving the synthesized audio
    pub bucket_name: String,
    /// Value reported as `expiresIn`; not enforced on the stored object
    pub audio_expiry_secs: u64,
    /// Named AWS profile (local runs only)
    pub aws_profile: Option<String>,
    /// AWS region override
    pub region: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if AUDIO_EXPIRY_SECONDS is not an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let bucket_name =
            non_empty("S3_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string());

        let audio_expiry_secs = match non_empty("AUDIO_EXPIRY_SECONDS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::invalid_value(
                    "AUDIO_EXPIRY_SECONDS",
                    format!("expected a whole number of seconds, got '{}'", raw),
                )
            })?,
            None => DEFAULT_AUDIO_EXPIRY_SECS,
        };

        Ok(Self {
            bucket_name,
            audio_expiry_secs,
            aws_profile: non_empty("AWS_PROFILE"),
            region: non_empty("AWS_REGION"),
        })
    }

    /// Load the shared AWS SDK configuration honoring the profile/region overrides.
    pub async fn aws_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &self.aws_profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }

        loader.load().await
    }
}
