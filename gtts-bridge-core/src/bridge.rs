use std::io::Write;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::TtsError;
use crate::input::read_text;
use crate::options::SynthesisOptions;
use crate::provision::DependencyEnsurer;
use crate::settings::{Backend, Settings};
use crate::tts::create_provider;
use crate::tts::provider::TextToSpeech;

/// One input-to-output run: read text, make sure the client exists,
/// synthesize, then write the whole MP3 buffer. Nothing reaches `output`
/// unless every step succeeded.
pub struct Bridge {
    provider: Box<dyn TextToSpeech>,
    ensurer: Option<DependencyEnsurer>,
}

impl Bridge {
    pub fn new(settings: &Settings) -> Result<Self, TtsError> {
        let provider = create_provider(settings)?;
        let ensurer = match settings.backend {
            Backend::GoogleTranslate => None,
            Backend::GttsCli => Some(DependencyEnsurer::from_settings(settings)),
        };
        Ok(Self { provider, ensurer })
    }

    pub fn with_provider(
        provider: Box<dyn TextToSpeech>,
        ensurer: Option<DependencyEnsurer>,
    ) -> Self {
        Self { provider, ensurer }
    }

    pub fn provider(&self) -> &dyn TextToSpeech {
        self.provider.as_ref()
    }

    /// Returns the number of audio bytes written.
    pub async fn run<R, W, S>(
        &self,
        options: &SynthesisOptions,
        input: &mut R,
        output: &mut W,
        status: &mut S,
    ) -> Result<usize, TtsError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Write,
    {
        let text = read_text(input).await?;

        if let Some(ensurer) = &self.ensurer {
            if !ensurer.ensure(status).await {
                return Err(ensurer.unavailable_error());
            }
        }

        let audio = self.provider.synthesize(&text, options).await?;
        tracing::info!(
            provider = self.provider.name(),
            bytes = audio.bytes.len(),
            "Synthesis complete"
        );

        output.write_all(&audio.bytes).await?;
        output.flush().await?;
        Ok(audio.bytes.len())
    }
}
