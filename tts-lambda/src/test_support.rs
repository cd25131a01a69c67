//! In-memory test doubles for the synthesis and storage seams.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tts_lambda_common::error::{Error, StorageError, StorageOperation};
use tts_lambda_common::s3::{ObjectStore, S3Uri, UploadOptions};

use crate::synthesizer::{SpeechEngine, SpeechSynthesizer, SynthesisRequest};

/// Synthesizer that fails for configured engines and records every call.
pub struct ScriptedSynthesizer {
    audio: Vec<u8>,
    failing: HashSet<SpeechEngine>,
    calls: Mutex<Vec<SynthesisRequest>>,
}

impl ScriptedSynthesizer {
    pub fn new(audio: &[u8]) -> Self {
        Self {
            audio: audio.to_vec(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, engine: SpeechEngine) -> Self {
        self.failing.insert(engine);
        self
    }

    pub fn calls(&self) -> Vec<SynthesisRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn engines(&self) -> Vec<SpeechEngine> {
        self.calls().into_iter().map(|c| c.engine).collect()
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error> {
        self.calls.lock().unwrap().push(request.clone());

        if self.failing.contains(&request.engine) {
            return Err(Error::synthesis(
                request.engine.as_str(),
                format!("This voice does not support the selected engine: {}", request.engine),
            ));
        }
        Ok(self.audio.clone())
    }
}

/// A stored object as seen by `MemoryStore`.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub uri: S3Uri,
    pub data: Vec<u8>,
    pub options: UploadOptions,
}

/// Object store keeping uploads in memory.
#[derive(Default)]
pub struct MemoryStore {
    fail: bool,
    objects: Mutex<Vec<StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        uri: &S3Uri,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::operation_failed(
                uri.to_string(),
                StorageOperation::Upload,
                "Access Denied",
            ));
        }

        self.objects.lock().unwrap().push(StoredObject {
            uri: uri.clone(),
            data,
            options: options.clone(),
        });
        Ok(())
    }
}
