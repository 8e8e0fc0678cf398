pub mod bridge;
pub mod cmd;
pub mod error;
pub mod input;
pub mod options;
pub mod provision;
pub mod settings;
pub mod tts;

pub use bridge::Bridge;
pub use error::TtsError;
pub use options::{parse_slow, SynthesisOptions};
pub use settings::{Backend, Settings, SettingsManager};
pub use tts::provider::TextToSpeech;
pub use tts::types::{AudioData, AudioFormat, Language};
