//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, Row};
use crate::catalog::{Anchor, format_mss};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::{Discipline, MediaBackend, Mode, PlaybackSession, TransportState};

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating the window step.
fn controls_text(mode: Mode, window_step_secs: u64) -> String {
    let mut parts: Vec<String> = vec![
        "[h/l] recording".to_string(),
        "[j/k] up/down".to_string(),
        "[enter] play selected".to_string(),
        "[f] full piece".to_string(),
        "[m] mode".to_string(),
        "[space/p] play/pause".to_string(),
    ];
    if mode == Mode::Window {
        parts.push(format!("[ [/] ] end -/+{window_step_secs}s"));
        parts.push(format!("[ {{/}} ] start -/+{window_step_secs}s"));
    }
    parts.push("[q] quit".to_string());
    parts.join(" | ")
}

fn transport_text(state: TransportState) -> &'static str {
    match state {
        TransportState::Idle => "Idle",
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
        TransportState::Ended => "Ended",
    }
}

/// `0:42 / 5:10`, or just the position when the duration is unknown.
fn time_text(position: Option<f64>, duration: Option<f64>) -> String {
    let pos = position.map_or_else(|| "-:--".to_string(), format_mss);
    match duration {
        Some(d) => format!("{pos} / {}", format_mss(d)),
        None => pos,
    }
}

fn range_text(anchor: &Anchor) -> String {
    match anchor.end_sec {
        Some(end) => format!("{}-{}", format_mss(anchor.start_sec), format_mss(end)),
        None => format_mss(anchor.start_sec),
    }
}

fn row_text(row: Row<'_>, show_notes: bool) -> String {
    match row {
        Row::FullPiece => "Full piece".to_string(),
        Row::Anchor(a) => {
            let mut text = format!("{}  ({})", a.display_label(), range_text(a));
            if show_notes {
                if let Some(note) = a.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                    text.push_str(" - ");
                    text.push_str(note);
                }
            }
            text
        }
    }
}

/// Build the status line from the session's live state.
fn status_text<B: MediaBackend>(app: &App, session: &PlaybackSession<B>) -> String {
    let mut parts: Vec<String> = vec![
        format!(" MODE: {}", session.mode()),
        transport_text(session.transport()).to_string(),
        time_text(session.position(), session.duration()),
    ];

    if let Some(w) = session.window() {
        parts.push(format!("WINDOW: {}..{}", format_mss(w.start()), format_mss(w.end())));
    }

    if session.watcher_active() {
        match (session.watcher_discipline(), session.watcher_boundary()) {
            (Some(Discipline::StopAtEnd { .. }), Some(end)) => {
                parts.push(format!("STOP AT {}", format_mss(end)));
            }
            (Some(Discipline::LoopWithin { window }), _) => {
                parts.push(format!("LOOP TO {}", format_mss(window.start())));
            }
            _ => {}
        }
    }

    if !session.is_ready() {
        parts.push("No audio backend".to_string());
    }
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame` using `app` and session state.
pub fn draw<B: MediaBackend>(
    frame: &mut Frame,
    app: &App,
    session: &PlaybackSession<B>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let title = session.catalog().title().unwrap_or("cadenza");
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} "))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Recordings bar
    let current = app
        .active_recording
        .as_deref()
        .unwrap_or(session.current_recording().id.as_str());
    let spans: Vec<Span> = session
        .catalog()
        .recordings()
        .iter()
        .flat_map(|r| {
            let active = r.id == current;
            let label = format!(" {} ", r.title);
            let span = if active {
                Span::styled(label, Style::default().add_modifier(Modifier::REVERSED))
            } else {
                Span::raw(label)
            };
            [span, Span::raw(" ")]
        })
        .collect();
    let recordings = Paragraph::new(Line::from(spans))
        .block(Block::bordered().padding(LEFT_PAD).title(" recordings "));
    frame.render_widget(recordings, chunks[1]);

    // Status box
    let status_par = Paragraph::new(status_text(app, session))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[2]);

    // Anchor list
    {
        let rows = app.rows(session.anchors());
        let items: Vec<ListItem> = rows
            .iter()
            .map(|&row| {
                let text = row_text(row, ui_settings.show_notes);
                if app.is_active(row) {
                    ListItem::new(text).bold()
                } else {
                    ListItem::new(text)
                }
            })
            .collect();

        let list_title = match session.mode() {
            Mode::FullPiece => " full piece ",
            Mode::Segment => " segments ",
            Mode::Window => " windows ",
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(list_title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !rows.is_empty() {
            state.select(Some(app.selected.min(rows.len() - 1)));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer_text = controls_text(session.mode(), controls_settings.window_step_secs);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(label: Option<&str>, start: f64, end: Option<f64>, note: Option<&str>) -> Anchor {
        Anchor {
            id: "x".into(),
            label: label.map(Into::into),
            start_sec: start,
            end_sec: end,
            note: note.map(Into::into),
        }
    }

    #[test]
    fn row_text_shows_range_and_optional_note() {
        let a = anchor(Some("Cadenza"), 40.0, Some(70.0), Some("rubato"));
        assert_eq!(row_text(Row::Anchor(&a), true), "Cadenza  (0:40-1:10) - rubato");
        assert_eq!(row_text(Row::Anchor(&a), false), "Cadenza  (0:40-1:10)");
        assert_eq!(row_text(Row::FullPiece, true), "Full piece");
    }

    #[test]
    fn unlabelled_open_anchor_uses_start_time() {
        let a = anchor(None, 125.0, None, Some("  "));
        assert_eq!(row_text(Row::Anchor(&a), true), "2:05  (2:05)");
    }

    #[test]
    fn time_text_handles_unknown_values() {
        assert_eq!(time_text(None, None), "-:--");
        assert_eq!(time_text(Some(42.9), Some(310.0)), "0:42 / 5:10");
    }

    #[test]
    fn window_keys_only_listed_in_window_mode() {
        assert!(!controls_text(Mode::Segment, 5).contains("start -/+"));
        assert!(controls_text(Mode::Window, 5).contains("[ {/} ] start -/+5s"));
    }
}
