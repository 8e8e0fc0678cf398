use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::TtsError;

/// Read the whole stream, decode it as UTF-8 and trim surrounding
/// whitespace. Fails with "No text provided" when nothing is left.
pub async fn read_text<R>(reader: &mut R) -> Result<String, TtsError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).await?;
    tracing::debug!(bytes = raw.len(), "Read input");
    decode_text(raw)
}

pub fn decode_text(raw: Vec<u8>) -> Result<String, TtsError> {
    let text = String::from_utf8(raw)
        .map_err(|e| TtsError::Validation(format!("input is not valid UTF-8: {e}")))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TtsError::no_text());
    }
    Ok(trimmed.to_string())
}
