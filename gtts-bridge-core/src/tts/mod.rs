pub mod google_translate;
pub mod gtts_cli;
pub mod lang;
pub mod mock;
pub mod provider;
pub mod tokenizer;
pub mod types;

use std::time::Duration;

use crate::error::TtsError;
use crate::settings::{Backend, Settings};

use self::google_translate::{GoogleTranslate, GoogleTranslateConfig};
use self::gtts_cli::{GttsCli, GttsCliConfig};
use self::provider::TextToSpeech;

/// Build the provider selected in `settings`.
pub fn create_provider(settings: &Settings) -> Result<Box<dyn TextToSpeech>, TtsError> {
    match settings.backend {
        Backend::GoogleTranslate => Ok(Box::new(GoogleTranslate::new(
            GoogleTranslateConfig::from(&settings.google),
        )?)),
        Backend::GttsCli => Ok(Box::new(GttsCli::new(GttsCliConfig {
            program: settings.gtts_cli.program.clone(),
            tld: settings.google.tld.clone(),
            timeout: Duration::from_secs(settings.google.request_timeout_secs),
        }))),
    }
}
