//! Command-line argument parsing for the simulation binary.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strike headless simulation arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strike", about = "Strike FPS simulation core")]
pub struct CliArgs {
    /// Look sensitivity multiplier (0.2 - 3.0).
    #[arg(long)]
    pub sensitivity: Option<f32>,

    /// Log level (error, warn, info, debug, trace) or a full filter string.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of fixed simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    pub ticks: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(s) = args.sensitivity {
            self.input.sensitivity = s;
            self.input.sanitize();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
