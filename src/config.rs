//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::state::{validate_duration, DEFAULT_DURATION};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "cue-timer")]
#[command(about = "A countdown timer service with audible cues")]
#[command(version)]
pub struct Config {
    /// Port to bind the control panel to
    #[arg(short, long, default_value = "20560")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial countdown duration in seconds (10-600, step 5)
    #[arg(short, long, default_value_t = DEFAULT_DURATION, value_parser = parse_duration)]
    pub duration: u32,

    /// Directory holding sound1..sound5 (mp3, wav or ogg)
    #[arg(long, default_value = "sounds")]
    pub sounds_dir: PathBuf,

    /// Log cues instead of playing them
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

fn parse_duration(value: &str) -> Result<u32, String> {
    let seconds: u32 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    validate_duration(seconds).map_err(|e| e.to_string())
}
