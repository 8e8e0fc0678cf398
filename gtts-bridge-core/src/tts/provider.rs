use async_trait::async_trait;

use super::types::{AudioData, Language};
use crate::error::TtsError;
use crate::options::SynthesisOptions;

/// Trait for text-to-speech providers
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Synthesize the whole text into one MP3 buffer
    async fn synthesize(&self, text: &str, options: &SynthesisOptions)
        -> Result<AudioData, TtsError>;

    /// Languages this provider accepts
    fn supported_languages(&self) -> Vec<Language>;
}
