pub mod config;
pub mod manager;


pub use config::{Backend, GoogleSettings, GttsCliSettings, ProvisionSettings, Settings};
pub use manager::SettingsManager;
