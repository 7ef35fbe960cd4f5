//! Cue playback through the default audio output
//!
//! rodio's output stream cannot leave the thread that opened it, so playback
//! lives on a dedicated thread fed by a channel. Every cue gets its own sink,
//! and sinks stay in a [`PlaybackPool`] until they drain. Overlapping cues,
//! including repeats of the same cue, never cut each other off.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info, warn};

use super::cues::{Cue, CueError, CuePlayer};

/// Extensions tried, in order, when resolving a cue asset
pub const SOUND_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

/// How often finished sinks are swept while no cues arrive
const PRUNE_INTERVAL: Duration = Duration::from_millis(500);

/// Locate the asset for a cue inside the sounds directory
pub fn resolve_asset(dir: &Path, cue: Cue) -> Result<PathBuf, CueError> {
    SOUND_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", cue.asset_name(), ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| CueError::AssetNotFound {
            cue,
            dir: dir.to_path_buf(),
        })
}

/// Open and decode an asset file
pub fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, CueError> {
    let file = File::open(path).map_err(|source| CueError::AssetOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| CueError::AssetDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// A live playback that can report when it has drained
pub trait PlaybackHandle {
    fn is_finished(&self) -> bool;
}

impl PlaybackHandle for Sink {
    fn is_finished(&self) -> bool {
        self.empty()
    }
}

/// Live playback handles, each retained until it finishes
#[derive(Debug)]
pub struct PlaybackPool<H> {
    handles: Vec<(Cue, H)>,
}

impl<H: PlaybackHandle> PlaybackPool<H> {
    pub fn new() -> Self {
        Self { handles: Vec::new() }
    }

    /// Keep a handle alive alongside any others already playing
    pub fn retain(&mut self, cue: Cue, handle: H) {
        self.handles.push((cue, handle));
    }

    /// Release finished handles and return how many were dropped
    pub fn prune(&mut self) -> usize {
        let before = self.handles.len();
        self.handles.retain(|(_, handle)| !handle.is_finished());
        before - self.handles.len()
    }

    /// Number of retained handles for one cue
    #[cfg(test)]
    pub fn playing(&self, cue: Cue) -> usize {
        self.handles.iter().filter(|(c, _)| *c == cue).count()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<H: PlaybackHandle> Default for PlaybackPool<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cue player backed by rodio on a dedicated audio thread
pub struct AudioCuePlayer {
    tx: mpsc::Sender<Cue>,
    worker: thread::JoinHandle<()>,
}

impl AudioCuePlayer {
    /// Spawn the audio thread
    ///
    /// A missing output device is not an error here: it is logged once and
    /// every later cue is skipped.
    pub fn spawn(sounds_dir: PathBuf) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("cue-audio".to_string())
            .spawn(move || audio_loop(sounds_dir, rx))?;
        Ok(Self { tx, worker })
    }

    /// Whether the audio thread is still accepting cues
    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }
}

impl CuePlayer for AudioCuePlayer {
    fn play(&self, cue: Cue) {
        if !self.is_running() || self.tx.send(cue).is_err() {
            warn!("Audio thread has exited, dropping cue {}", cue);
        }
    }
}

fn audio_loop(sounds_dir: PathBuf, rx: mpsc::Receiver<Cue>) {
    // The stream must outlive every sink created from its handle.
    let output = match OutputStream::try_default() {
        Ok((stream, handle)) => {
            info!("Audio output ready, sounds from {}", sounds_dir.display());
            Some((stream, handle))
        }
        Err(e) => {
            warn!("{}", CueError::Output(e.to_string()));
            None
        }
    };

    let mut pool = PlaybackPool::new();

    loop {
        match rx.recv_timeout(PRUNE_INTERVAL) {
            Ok(cue) => {
                pool.prune();
                let Some((_, handle)) = output.as_ref() else {
                    debug!("No audio output, skipping cue {}", cue);
                    continue;
                };
                match start_playback(handle, &sounds_dir, cue) {
                    Ok(sink) => {
                        pool.retain(cue, sink);
                        debug!("Playing {} ({} active)", cue, pool.len());
                    }
                    Err(e) => warn!("{}", e),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                let released = pool.prune();
                if released > 0 {
                    debug!("Released {} finished playback(s)", released);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if !pool.is_empty() {
        debug!("Audio thread exiting with {} playback(s) in flight", pool.len());
    }
}

fn start_playback(handle: &OutputStreamHandle, dir: &Path, cue: Cue) -> Result<Sink, CueError> {
    let path = resolve_asset(dir, cue)?;
    let source = open_source(&path)?;
    let sink = Sink::try_new(handle).map_err(|e| CueError::Output(e.to_string()))?;
    sink.append(source);
    Ok(sink)
}
