use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::playback::BackendEvent;

use super::error::BackendError;
use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// How often the thread wakes up to notice the end of the media.
const END_CHECK_INTERVAL: Duration = Duration::from_millis(100);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback: PlaybackHandle,
    events: Sender<BackendEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!("{}", BackendError::from(e));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut state = AudioState {
            stream,
            playback,
            events,
            sink: None,
            path: None,
            paused: true,
            ended: false,
        };

        loop {
            match rx.recv_timeout(END_CHECK_INTERVAL) {
                Ok(AudioCmd::Load { path, start }) => state.load(path, start),
                Ok(AudioCmd::Seek(to)) => state.seek(to),
                Ok(AudioCmd::Play) => state.play(),
                Ok(AudioCmd::Pause) => state.pause(),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    state.quit(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => state.check_ended(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

struct AudioState {
    stream: OutputStream,
    playback: PlaybackHandle,
    events: Sender<BackendEvent>,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    paused: bool,
    ended: bool,
}

impl AudioState {
    fn emit(&self, event: BackendEvent) {
        // The receiver is gone only while the runtime is shutting down.
        let _ = self.events.send(event);
    }

    fn update(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback.lock() {
            f(&mut *info);
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn load(&mut self, path: PathBuf, start: Duration) {
        self.stop_sink();
        match create_sink_at(&self.stream, &path, start) {
            Ok(sink) => {
                sink.play();
                debug!("loaded {} at {:.2}s", path.display(), start.as_secs_f64());
                let duration = probe_duration(&path);
                self.sink = Some(sink);
                self.path = Some(path.clone());
                self.paused = false;
                self.ended = false;
                self.update(|info| {
                    info.source = Some(path);
                    info.duration = duration;
                    info.restart_at(start, true, Instant::now());
                });
                self.emit(BackendEvent::Playing);
            }
            Err(e) => {
                warn!("cannot play {}: {e}", path.display());
                self.path = None;
                self.paused = true;
                self.ended = true;
                self.update(PlaybackInfo::clear);
                self.emit(BackendEvent::Ended);
            }
        }
    }

    fn seek(&mut self, to: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        self.stop_sink();
        match create_sink_at(&self.stream, &path, to) {
            Ok(sink) => {
                if !self.paused {
                    sink.play();
                }
                self.sink = Some(sink);
                self.ended = false;
                let playing = !self.paused;
                self.update(|info| info.restart_at(to, playing, Instant::now()));
            }
            Err(e) => {
                warn!("cannot seek in {}: {e}", path.display());
                // The source is unusable from here on; later seeks are no-ops.
                self.path = None;
                self.paused = true;
                self.ended = true;
                self.update(|info| info.freeze(Instant::now()));
                self.emit(BackendEvent::Ended);
            }
        }
    }

    fn play(&mut self) {
        if self.sink.is_none() {
            return;
        }
        if self.ended {
            // Playing after the end starts over.
            self.paused = false;
            self.seek(Duration::ZERO);
            if !self.ended {
                self.emit(BackendEvent::Playing);
            }
            return;
        }
        if let Some(ref s) = self.sink {
            if self.paused {
                s.play();
                self.paused = false;
                self.update(|info| info.resume(Instant::now()));
                self.emit(BackendEvent::Playing);
            }
        }
    }

    fn pause(&mut self) {
        if let Some(ref s) = self.sink {
            if !self.paused {
                s.pause();
                self.paused = true;
                self.update(|info| info.freeze(Instant::now()));
                self.emit(BackendEvent::Paused);
            }
        }
    }

    fn check_ended(&mut self) {
        if let Some(ref s) = self.sink {
            if !self.paused && !self.ended && s.empty() {
                self.paused = true;
                self.ended = true;
                self.update(|info| info.freeze(Instant::now()));
                self.emit(BackendEvent::Ended);
            }
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(ref s) = self.sink {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(s, fade_out_ms);
            }
            s.stop();
        }
        self.update(|info| info.freeze(Instant::now()));
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
