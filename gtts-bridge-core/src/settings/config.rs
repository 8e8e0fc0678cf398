use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::options::DEFAULT_LANG;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Talks to the Google Translate speech endpoint directly.
    #[default]
    GoogleTranslate,
    /// Shells out to an installed `gtts-cli`.
    GttsCli,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleSettings {
    /// Top-level domain of the Google host, e.g. `com` or `com.au`
    #[serde(default = "default_tld")]
    pub tld: String,

    /// Reject language codes missing from the supported table before
    /// making any request
    #[serde(default = "default_true")]
    pub lang_check: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Replaces `https://translate.google.<tld>` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            tld: default_tld(),
            lang_check: true,
            request_timeout_secs: default_request_timeout_secs(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GttsCliSettings {
    #[serde(default = "default_gtts_program")]
    pub program: PathBuf,
}

impl Default for GttsCliSettings {
    fn default() -> Self {
        Self {
            program: default_gtts_program(),
        }
    }
}

/// How the external client is located and, when allowed, installed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionSettings {
    /// Bound on each probe and installer invocation
    #[serde(default = "default_provision_timeout_secs")]
    pub timeout_secs: u64,

    /// Command that exits 0 when the client is usable. Defaults to
    /// `<gtts_cli.program> --version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<Vec<String>>,

    /// Installer invocations, tried in order until one works
    #[serde(default = "default_installers")]
    pub installers: Vec<Vec<String>>,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_provision_timeout_secs(),
            probe: None,
            installers: default_installers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Language used when none is passed on the command line
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Speak slowly when no speed argument is passed
    #[serde(default)]
    pub slow: bool,

    #[serde(default)]
    pub backend: Backend,

    /// Allow installing a missing client through the configured installers.
    /// Off by default: installing mutates the host environment.
    #[serde(default)]
    pub auto_install: bool,

    #[serde(default)]
    pub google: GoogleSettings,

    #[serde(default)]
    pub gtts_cli: GttsCliSettings,

    #[serde(default)]
    pub provision: ProvisionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_lang: default_lang(),
            slow: false,
            backend: Backend::default(),
            auto_install: false,
            google: GoogleSettings::default(),
            gtts_cli: GttsCliSettings::default(),
            provision: ProvisionSettings::default(),
        }
    }
}

impl Settings {
    /// The configured probe, or a `--version` call of the gtts-cli program.
    pub fn probe_command(&self) -> Vec<String> {
        match &self.provision.probe {
            Some(probe) => probe.clone(),
            None => vec![
                self.gtts_cli.program.to_string_lossy().to_string(),
                "--version".to_string(),
            ],
        }
    }
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn default_tld() -> String {
    "com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_gtts_program() -> PathBuf {
    PathBuf::from("gtts-cli")
}

fn default_provision_timeout_secs() -> u64 {
    60
}

fn default_installers() -> Vec<Vec<String>> {
    [
        &["python3", "-m", "pip", "install", "gtts", "-q"][..],
        &["pip3", "install", "gtts", "-q"],
        &["pip", "install", "gtts", "-q"],
    ]
    .iter()
    .map(|cmd| cmd.iter().map(|s| s.to_string()).collect())
    .collect()
}
