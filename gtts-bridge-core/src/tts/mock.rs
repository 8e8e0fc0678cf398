use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::lang;
use super::provider::TextToSpeech;
use super::types::{AudioData, Language};
use crate::error::TtsError;
use crate::options::SynthesisOptions;

/// A tiny MP3: ID3v2 header followed by one MPEG frame sync.
pub const MOCK_MP3: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00\xff\xfb\x90\x64\x00";

/// Mock behavior for the mock provider
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Return [`MOCK_MP3`]
    #[default]
    Success,
    /// Always fail with a transient network error
    AlwaysTransientError,
    /// Always fail with a permanent service error carrying this message
    AlwaysServiceError(String),
    /// Validate the language like the real service, then succeed
    CheckLanguage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub text: String,
    pub options: SynthesisOptions,
}

/// Mock TTS provider for testing
#[derive(Clone, Default)]
pub struct MockTextToSpeech {
    behavior: Arc<Mutex<MockBehavior>>,
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockTextToSpeech {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_call_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn get_captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextToSpeech for MockTextToSpeech {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<AudioData, TtsError> {
        self.captured_requests
            .lock()
            .unwrap()
            .push(CapturedRequest {
                text: text.to_string(),
                options: options.clone(),
            });

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            MockBehavior::Success => Ok(AudioData::mp3(MOCK_MP3.to_vec())),
            MockBehavior::AlwaysTransientError => Err(TtsError::TransientNetwork(
                "Failed to connect. Probable cause: mock".to_string(),
            )),
            MockBehavior::AlwaysServiceError(message) => Err(TtsError::PermanentService(message)),
            MockBehavior::CheckLanguage => {
                lang::resolve(&options.lang)?;
                Ok(AudioData::mp3(MOCK_MP3.to_vec()))
            }
        }
    }

    fn supported_languages(&self) -> Vec<Language> {
        lang::supported_languages()
    }
}
