use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::{debug, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Row, neighbour_recording};
use crate::audio::AudioPlayer;
use crate::config;
use crate::playback::{BackendEvent, MediaBackend, PlaybackSession, SessionError};
use crate::ui;

/// Main terminal event loop: feeds backend events and watcher ticks into
/// the session, redraws, and handles input. Returns `Ok(())` when shutdown
/// is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut PlaybackSession<AudioPlayer>,
    backend_events: &Receiver<BackendEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let window_step = settings.controls.window_step_secs as f64;

    loop {
        sync_session(app, session, backend_events, Instant::now());

        terminal.draw(|f| ui::draw(f, app, session, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, window_step, app, session) {
                    break;
                }
            }
        }
    }

    if let Some(player) = session.detach_backend() {
        player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    }
    Ok(())
}

/// One cooperative step: backend state changes first, then the watcher,
/// then session notifications into the app model.
pub(super) fn sync_session<B: MediaBackend>(
    app: &mut App,
    session: &mut PlaybackSession<B>,
    backend_events: &Receiver<BackendEvent>,
    now: Instant,
) {
    while let Ok(ev) = backend_events.try_recv() {
        session.on_backend_event(ev);
    }
    session.poll_watcher(now);
    for ev in session.drain_events() {
        app.apply(&ev);
    }
}

/// Show a command's outcome in the status line.
fn report(app: &mut App, result: Result<(), SessionError>) {
    match result {
        Ok(()) => app.clear_status(),
        Err(e) => {
            match e {
                SessionError::ModeMismatch { .. }
                | SessionError::InvalidWindow { .. }
                | SessionError::NoWindow => {
                    debug!("{e}")
                }
                _ => warn!("{e}"),
            }
            app.set_status(e.to_string());
        }
    }
}

/// Handle one key press. Returns true when the user asked to quit.
pub(super) fn handle_key_event<B: MediaBackend>(
    key: KeyEvent,
    window_step: f64,
    app: &mut App,
    session: &mut PlaybackSession<B>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('h') | KeyCode::Left => {
            let target = neighbour_recording(
                session.catalog().recordings(),
                &session.current_recording().id,
                -1,
            )
            .map(|r| r.id.clone());
            if let Some(id) = target {
                let result = session.select_recording(&id);
                report(app, result);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            let target = neighbour_recording(
                session.catalog().recordings(),
                &session.current_recording().id,
                1,
            )
            .map(|r| r.id.clone());
            if let Some(id) = target {
                let result = session.select_recording(&id);
                report(app, result);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let rows = app.rows(session.anchors()).len();
            app.next(rows);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let rows = app.rows(session.anchors()).len();
            app.prev(rows);
        }
        KeyCode::Enter => {
            let target = app.selected_row(session.anchors()).map(|row| match row {
                Row::FullPiece => None,
                Row::Anchor(a) => Some(a.id.clone()),
            });
            let result = match target {
                Some(Some(id)) => session.jump_to_anchor(&id),
                Some(None) => session.play_full_piece_from_start(),
                None => Ok(()),
            };
            report(app, result);
        }
        KeyCode::Char('f') => {
            let result = session.play_full_piece_from_start();
            report(app, result);
        }
        KeyCode::Char('m') => {
            session.set_mode(session.mode().next());
            app.clear_status();
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let result = session.toggle_pause();
            report(app, result);
        }
        KeyCode::Char('[') => {
            let result = session.nudge_window(0.0, -window_step);
            report(app, result);
        }
        KeyCode::Char(']') => {
            let result = session.nudge_window(0.0, window_step);
            report(app, result);
        }
        KeyCode::Char('{') => {
            let result = session.nudge_window(-window_step, 0.0);
            report(app, result);
        }
        KeyCode::Char('}') => {
            let result = session.nudge_window(window_step, 0.0);
            report(app, result);
        }
        _ => {}
    }
    false
}
