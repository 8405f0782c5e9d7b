//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::MIN_SIZE;
use crate::session::{self, SessionConfig};

/// Widest board the text layout draws (7 columns per cell, 113 in total).
pub const MAX_SIZE: usize = 16;

#[derive(Debug, Parser)]
#[command(name = "term-2048", about = "Play 2048 in the terminal")]
pub struct Args {
    /// Board edge length (2 to 16)
    #[arg(long, default_value_t = 4)]
    pub size: usize,

    /// Tile value that wins the game (power of two >= 4)
    #[arg(long, default_value_t = 2048)]
    pub win_target: u32,

    /// Seed the tile RNG for a reproducible game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write log output to this file (RUST_LOG sets the filter, default info)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--size must be between {min} and {max}, got {got}")]
    Size { min: usize, max: usize, got: usize },
    #[error("--win-target must be a power of two >= 4, got {0}")]
    WinTarget(u32),
}

impl Args {
    /// Validate the game parameters.
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(ConfigError::Size { min: MIN_SIZE, max: MAX_SIZE, got: self.size });
        }
        if !session::is_valid_win_target(self.win_target) {
            return Err(ConfigError::WinTarget(self.win_target));
        }
        Ok(SessionConfig { size: self.size, win_target: self.win_target, seed: self.seed })
    }
}
