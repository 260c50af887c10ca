//! Configuration system for the Strike simulation core.
//!
//! Tuning for the camera, player movement, and combat defaults persists to
//! disk as a RON file. Supports CLI overrides via clap, hot-reload detection,
//! and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, CombatConfig, Config, ControlPreset, DebugConfig, InputConfig, PlayerConfig,
    default_config_dir,
};
pub use error::ConfigError;
