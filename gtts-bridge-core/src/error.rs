use thiserror::Error;

/// Every way a bridge run can fail. All of them are terminal for the
/// process; `is_retryable` only tells a caller whether trying again later
/// could plausibly succeed.
#[derive(Error, Debug)]
pub enum TtsError {
    /// Bad input detected before any external call.
    #[error("{0}")]
    Validation(String),

    /// The synthesis client is missing and could not be provided.
    #[error("{0}")]
    Dependency(String),

    /// Connection failures, timeouts, throttling and upstream 5xx.
    #[error("{0}")]
    TransientNetwork(String),

    /// The service answered but will not produce audio for this request.
    #[error("{0}")]
    PermanentService(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TtsError {
    pub fn no_text() -> Self {
        Self::Validation("No text provided".to_string())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }

    /// Short machine-readable label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Dependency(_) => "dependency",
            Self::TransientNetwork(_) => "transient_network",
            Self::PermanentService(_) => "permanent_service",
            Self::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_connect() || source.is_timeout() || source.is_request() {
            Self::TransientNetwork(format!(
                "Failed to connect. Probable cause: {}",
                connect_cause(&source)
            ))
        } else {
            Self::PermanentService(format!("TTS API request failed: {source}"))
        }
    }
}

fn connect_cause(source: &reqwest::Error) -> String {
    if source.is_timeout() {
        "request timed out".to_string()
    } else {
        // The innermost error names the actual failure (refused, DNS...).
        let mut cause = source.to_string();
        let mut inner = std::error::Error::source(source);
        while let Some(err) = inner {
            cause = err.to_string();
            inner = std::error::Error::source(err);
        }
        cause
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(TtsError::TransientNetwork("x".into()).is_retryable());
        assert!(!TtsError::PermanentService("x".into()).is_retryable());
        assert!(!TtsError::Validation("x".into()).is_retryable());
        assert!(!TtsError::Dependency("x".into()).is_retryable());
    }

    #[test]
    fn test_no_text_message() {
        let err = TtsError::no_text();
        assert_eq!(err.to_string(), "No text provided");
        assert_eq!(err.kind(), "validation");
    }
}
