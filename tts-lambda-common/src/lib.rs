//! TTS Lambda Common Library
//!
//! Shared utilities for configuration, S3 storage, error handling, and
//! tracing used by the text-to-speech Lambda function.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod s3;
pub mod tracing;


pub use config::Config;
pub use error::{ConfigError, Error, Result, StorageError, StorageOperation};
pub use s3::{ObjectStore, S3Store, S3Uri, UploadOptions};
