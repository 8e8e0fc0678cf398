use serde::{Deserialize, Serialize};

pub const DEFAULT_LANG: &str = "ar";

/// Per-run synthesis parameters. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    pub lang: String,
    pub slow: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            slow: false,
        }
    }
}

impl SynthesisOptions {
    pub fn new(lang: impl Into<String>, slow: bool) -> Self {
        Self {
            lang: lang.into(),
            slow,
        }
    }
}

/// The slow flag is set only by the literal `true`, compared
/// case-insensitively. No trimming: `"True "` is false.
pub fn parse_slow(raw: &str) -> bool {
    raw.to_lowercase() == "true"
}
