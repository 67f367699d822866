use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};

use crate::catalog::SourceRef;
use crate::playback::{BackendEvent, LoadRequest, MediaBackend};

use super::error::BackendError;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Local-file media backend.
///
/// Relative sources are resolved against `base_dir`, normally the
/// directory holding the catalog.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    events: Sender<BackendEvent>,
    base_dir: PathBuf,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(base_dir: PathBuf, events: Sender<BackendEvent>) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone(), events.clone());

        Self {
            tx,
            playback: playback_info,
            events,
            base_dir,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        // Fails only when the audio thread is gone; it already logged why.
        if let Err(e) = self.tx.send(cmd) {
            debug!("audio thread unavailable, dropped {:?}", e.0);
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&PlaybackInfo) -> Option<T>) -> Option<T> {
        self.playback.lock().ok().and_then(|info| f(&*info))
    }
}

impl MediaBackend for AudioPlayer {
    fn load(&mut self, source: &SourceRef, request: LoadRequest) {
        let path = match resolve_source(&self.base_dir, source) {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}");
                let _ = self.events.send(BackendEvent::Ended);
                return;
            }
        };
        if let Some(end) = request.end_sec {
            debug!("ignoring end bound {end}s, enforced by the watcher");
        }
        self.send(AudioCmd::Load {
            path,
            start: secs_to_duration(request.start_sec),
        });
    }

    fn seek(&mut self, sec: f64) {
        self.send(AudioCmd::Seek(secs_to_duration(sec)));
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn current_time(&self) -> Option<f64> {
        self.read(|info| info.position().map(|d| d.as_secs_f64()))
    }

    fn duration(&self) -> Option<f64> {
        self.read(|info| info.duration.map(|d| d.as_secs_f64()))
    }
}

/// Map a catalog source to a local path.
pub(super) fn resolve_source(base_dir: &Path, source: &SourceRef) -> Result<PathBuf, BackendError> {
    let raw = source.as_str();
    let raw = raw.strip_prefix("file://").unwrap_or(raw);
    if raw.is_empty() || raw.contains("://") {
        return Err(BackendError::Unsupported(source.to_string()));
    }
    let path = Path::new(raw);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(base_dir.join(path))
    }
}

/// Negative and non-finite positions clamp to zero.
pub(super) fn secs_to_duration(sec: f64) -> Duration {
    if sec.is_finite() && sec > 0.0 {
        Duration::from_secs_f64(sec)
    } else {
        Duration::ZERO
    }
}
