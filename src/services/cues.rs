//! Sound cue identifiers and the player seam used by the controller

use std::{fmt, path::PathBuf};

use thiserror::Error;
use tracing::info;

/// Named triggers that play a bundled sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Countdown started or resumed (`sound1`)
    Start,
    /// Remaining time crossed a threshold (`sound2`)
    Threshold,
    /// Countdown stopped or ran out (`sound3`)
    Stop,
    /// Countdown paused while running (`sound4`)
    Pause,
    /// Countdown skipped to zero (`sound5`)
    Skip,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::Start, Cue::Threshold, Cue::Stop, Cue::Pause, Cue::Skip];

    /// Asset base name, without extension
    pub fn asset_name(&self) -> &'static str {
        match self {
            Cue::Start => "sound1",
            Cue::Threshold => "sound2",
            Cue::Stop => "sound3",
            Cue::Pause => "sound4",
            Cue::Skip => "sound5",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_name())
    }
}

/// Failures while turning a cue into sound. Never fatal.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("sound file not found for {cue} in {dir}")]
    AssetNotFound { cue: Cue, dir: PathBuf },

    #[error("could not open {path}: {source}")]
    AssetOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {path}: {reason}")]
    AssetDecode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Fire-and-forget cue playback
///
/// Implementations must return promptly and must not fail the caller; any
/// problem is logged and swallowed.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Logs cues instead of playing them
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedCuePlayer;

impl CuePlayer for MutedCuePlayer {
    fn play(&self, cue: Cue) {
        info!("Cue {} (muted)", cue);
    }
}
