// src/config/mod.rs
pub mod settings;

pub use settings::{load_settings, ConfigFile, EnvConfig, Overrides, Settings};
