//! Text-to-speech through an installed `gtts-cli` executable

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::lang;
use super::provider::TextToSpeech;
use super::types::{AudioData, Language};
use crate::cmd::{run_cmd, CommandError};
use crate::error::TtsError;
use crate::options::SynthesisOptions;

#[derive(Debug, Clone)]
pub struct GttsCliConfig {
    pub program: PathBuf,
    pub tld: String,
    pub timeout: Duration,
}

pub struct GttsCli {
    config: GttsCliConfig,
}

impl GttsCli {
    pub fn new(config: GttsCliConfig) -> Self {
        Self { config }
    }

    fn args(&self, options: &SynthesisOptions) -> Vec<String> {
        let mut args = vec!["--lang".to_string(), options.lang.clone()];
        if options.slow {
            args.push("--slow".to_string());
        }
        if self.config.tld != "com" {
            args.push("--tld".to_string());
            args.push(self.config.tld.clone());
        }
        // Read the text from stdin.
        args.push("-".to_string());
        args
    }
}

#[async_trait]
impl TextToSpeech for GttsCli {
    fn name(&self) -> &'static str {
        "gtts_cli"
    }

    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<AudioData, TtsError> {
        let args = self.args(options);
        tracing::info!(program = ?self.config.program, ?args, "Synthesizing via gtts-cli");

        let result = run_cmd(
            &self.config.program,
            &args,
            Some(text.as_bytes()),
            self.config.timeout,
        )
        .await
        .map_err(|e| {
            let message = e.to_string();
            match e {
                CommandError::Spawn { .. } => TtsError::Dependency(message),
                CommandError::Timeout { .. } => TtsError::TransientNetwork(message),
                CommandError::Other(_) => TtsError::PermanentService(message),
            }
        })?;

        if !result.success() {
            let stderr = result.err.trim();
            let message = if stderr.is_empty() {
                format!("gtts-cli exited with status {}", result.code)
            } else {
                stderr.to_string()
            };
            return Err(TtsError::PermanentService(message));
        }

        if result.out.is_empty() {
            return Err(TtsError::PermanentService(
                "No audio stream in response".to_string(),
            ));
        }

        Ok(AudioData::mp3(result.out))
    }

    fn supported_languages(&self) -> Vec<Language> {
        lang::supported_languages()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn provider(program: PathBuf) -> GttsCli {
        GttsCli::new(GttsCliConfig {
            program,
            tld: "com".to_string(),
            timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn test_passes_arguments_and_text() {
        let dir = TempDir::new().unwrap();
        // Echo the arguments and stdin back so the test can inspect them.
        let script = write_script(&dir, "fake-gtts", r#"printf 'ID3%s|' "$*"; cat"#);

        let audio = provider(script)
            .synthesize("bonjour", &SynthesisOptions::new("fr", true))
            .await
            .unwrap();

        assert_eq!(audio.bytes, b"ID3--lang fr --slow -|bonjour");
        assert!(audio.has_mp3_header());
    }

    #[tokio::test]
    async fn test_failure_surfaces_stderr() {
        let dir = TempDir::new().unwrap();
        let script = write_script(
            &dir,
            "fake-gtts",
            "echo 'Error: Unsupported language \"xx\"' >&2; exit 2",
        );

        let err = provider(script)
            .synthesize("hi", &SynthesisOptions::new("xx", false))
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::PermanentService(_)));
        assert_eq!(err.to_string(), "Error: Unsupported language \"xx\"");
    }

    #[tokio::test]
    async fn test_early_exit_on_long_text_surfaces_stderr() {
        let dir = TempDir::new().unwrap();
        // Rejects its arguments without ever reading stdin.
        let script = write_script(
            &dir,
            "fake-gtts",
            "echo 'Unsupported language \"xx\"' >&2; exit 2",
        );
        let text = "word ".repeat(80 * 1024);

        let err = provider(script)
            .synthesize(&text, &SynthesisOptions::new("xx", false))
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::PermanentService(_)));
        assert_eq!(err.to_string(), "Unsupported language \"xx\"");
    }

    #[tokio::test]
    async fn test_missing_program_is_dependency_error() {
        let err = provider(PathBuf::from("/nonexistent/gtts-cli"))
            .synthesize("hi", &SynthesisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::Dependency(_)));
    }

    #[tokio::test]
    async fn test_empty_output_is_an_error() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "fake-gtts", "cat > /dev/null");

        let err = provider(script)
            .synthesize("hi", &SynthesisOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No audio stream in response");
    }

    #[test]
    fn test_non_default_tld_is_forwarded() {
        let cli = GttsCli::new(GttsCliConfig {
            program: PathBuf::from("gtts-cli"),
            tld: "co.uk".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(
            cli.args(&SynthesisOptions::new("en", false)),
            vec!["--lang", "en", "--tld", "co.uk", "-"]
        );
    }
}
