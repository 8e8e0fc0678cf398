use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// Audio data returned from TTS synthesis
#[derive(Debug, Clone)]
pub struct AudioData {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioData {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            format: AudioFormat::Mp3,
        }
    }

    /// True when the buffer opens with an ID3 tag or an MPEG frame sync.
    pub fn has_mp3_header(&self) -> bool {
        match self.bytes.as_slice() {
            [b'I', b'D', b'3', ..] => true,
            [0xFF, second, ..] => second & 0xE0 == 0xE0,
            _ => false,
        }
    }
}

/// A language the synthesis service can speak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_header_detection() {
        assert!(AudioData::mp3(b"ID3\x04\x00".to_vec()).has_mp3_header());
        assert!(AudioData::mp3(vec![0xFF, 0xF3, 0x44]).has_mp3_header());
        assert!(AudioData::mp3(vec![0xFF, 0xFB, 0x90]).has_mp3_header());
        assert!(!AudioData::mp3(vec![0xFF, 0x00]).has_mp3_header());
        assert!(!AudioData::mp3(b"RIFF".to_vec()).has_mp3_header());
        assert!(!AudioData::mp3(Vec::new()).has_mp3_header());
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(AudioData::mp3(vec![]).format.mime_type(), "audio/mpeg");
    }
}
