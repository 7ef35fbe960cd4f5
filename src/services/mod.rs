//! Sound cue services module
//!
//! Cue identifiers, the player seam the controller depends on, and the
//! rodio-backed implementation.

pub mod audio;
pub mod cues;

// Re-export main types
pub use audio::{AudioCuePlayer, PlaybackPool};
pub use cues::{Cue, CueError, CuePlayer, MutedCuePlayer};
