//! Google Translate text-to-speech implementation
//!
//! Speaks through the same web RPC the Translate page uses: each text part
//! is posted to `batchexecute` and comes back as base64 encoded MP3 inside
//! a JSON-ish envelope. Parts are requested in order and concatenated.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::lang;
use super::provider::TextToSpeech;
use super::tokenizer;
use super::types::{AudioData, Language};
use crate::error::TtsError;
use crate::options::SynthesisOptions;
use crate::settings::GoogleSettings;

const RPC_ID: &str = "jQ1olc";
const RPC_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";
const REFERER: &str = "http://translate.google.com/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/47.0.2526.106 Safari/537.36";

#[derive(Debug, Clone)]
pub struct GoogleTranslateConfig {
    pub tld: String,
    pub lang_check: bool,
    pub request_timeout: Duration,
    pub base_url: Option<String>,
}

impl Default for GoogleTranslateConfig {
    fn default() -> Self {
        Self::from(&GoogleSettings::default())
    }
}

impl From<&GoogleSettings> for GoogleTranslateConfig {
    fn from(settings: &GoogleSettings) -> Self {
        Self {
            tld: settings.tld.clone(),
            lang_check: settings.lang_check,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            base_url: settings.base_url.clone(),
        }
    }
}

pub struct GoogleTranslate {
    config: GoogleTranslateConfig,
    client: Client,
}

impl GoogleTranslate {
    pub fn new(config: GoogleTranslateConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TtsError::Dependency(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        match &self.config.base_url {
            Some(base) => format!("{}{RPC_PATH}", base.trim_end_matches('/')),
            None => format!("https://translate.google.{}{RPC_PATH}", self.config.tld),
        }
    }

    async fn request_part(&self, part: &str, lang: &str, slow: bool) -> Result<Vec<u8>, TtsError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Referer", REFERER)
            .form(&[("f.req", rpc_payload(part, lang, slow))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %truncate(&body, 200), "TTS API returned an error");
            return Err(status_error(status, &self.config.tld));
        }

        let body = response.text().await?;
        extract_audio(&body).ok_or_else(|| {
            let message = if self.config.lang_check {
                "No audio stream in response".to_string()
            } else {
                format!("No audio stream in response. Unsupported language '{lang}'")
            };
            TtsError::PermanentService(message)
        })?
    }
}

#[async_trait]
impl TextToSpeech for GoogleTranslate {
    fn name(&self) -> &'static str {
        "google_translate"
    }

    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<AudioData, TtsError> {
        let lang = if self.config.lang_check {
            lang::resolve(&options.lang)?
        } else {
            options.lang.clone()
        };

        let parts = tokenizer::tokenize(text);
        if parts.is_empty() {
            return Err(TtsError::Validation("No text to speak".to_string()));
        }

        tracing::info!(
            lang = %lang,
            slow = options.slow,
            parts = parts.len(),
            "Synthesizing via Google Translate"
        );

        let mut audio = Vec::new();
        for (idx, part) in parts.iter().enumerate() {
            tracing::debug!(part = idx, chars = part.chars().count(), "Requesting part");
            let bytes = self.request_part(part, &lang, options.slow).await?;
            audio.extend_from_slice(&bytes);
        }

        Ok(AudioData::mp3(audio))
    }

    fn supported_languages(&self) -> Vec<Language> {
        lang::supported_languages()
    }
}

/// The `f.req` form value for one part. Normal speed is sent as `null`.
pub fn rpc_payload(text: &str, lang: &str, slow: bool) -> String {
    let speed = if slow { Value::Bool(true) } else { Value::Null };
    let parameter = json!([text, lang, speed, "null"]).to_string();
    json!([[[RPC_ID, parameter, Value::Null, "generic"]]]).to_string()
}

fn audio_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"jQ1olc","\[\\"(.*)\\"]"#).expect("static regex is valid"))
}

/// Pull every audio payload out of a batchexecute response.
/// `None` when the response carries no audio at all.
pub fn extract_audio(body: &str) -> Option<Result<Vec<u8>, TtsError>> {
    let mut audio = Vec::new();
    let mut found = false;

    for line in body.lines().filter(|l| l.contains(RPC_ID)) {
        if let Some(caps) = audio_re().captures(line) {
            found = true;
            match BASE64.decode(&caps[1]) {
                Ok(bytes) => audio.extend(bytes),
                Err(e) => {
                    return Some(Err(TtsError::PermanentService(format!(
                        "Malformed audio stream in response: {e}"
                    ))))
                }
            }
        }
    }

    found.then_some(Ok(audio))
}

fn status_error(status: StatusCode, tld: &str) -> TtsError {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let (cause, transient) = match code {
        403 => ("Bad token or upstream API changes".to_string(), false),
        404 if tld != "com" => (format!("Unsupported tld '{tld}'"), false),
        429 => ("Too many requests. Try again later".to_string(), true),
        500..=599 => ("Upstream API error. Try again later.".to_string(), true),
        _ => ("Unknown".to_string(), false),
    };

    let message = format!("{code} ({reason}) from TTS API. Probable cause: {cause}");
    if transient {
        TtsError::TransientNetwork(message)
    } else {
        TtsError::PermanentService(message)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
