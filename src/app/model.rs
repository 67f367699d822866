//! Application model types: `App` and `Row`.
//!
//! The session owns playback state; `App` only keeps what the UI needs on
//! top of it: where the cursor is, which recording and anchor the session
//! last announced as active, and a one-line status message.

use crate::catalog::{Anchor, Recording};
use crate::playback::{Mode, SessionEvent};

/// One selectable line of the anchor list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Row<'a> {
    /// Unconstrained playback from 0.
    FullPiece,
    Anchor(&'a Anchor),
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    /// Cursor over `rows()`.
    pub selected: usize,
    pub mode: Mode,
    pub active_recording: Option<String>,
    pub active_anchor: Option<String>,
    /// Last non-fatal error or notice.
    pub status: Option<String>,
}

impl App {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Update highlight state from a session notification.
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::RecordingActivated(id) => {
                self.active_recording = Some(id.clone());
            }
            SessionEvent::AnchorActivated(id) => {
                self.active_anchor = id.clone();
            }
            SessionEvent::ModeChanged(mode) => {
                self.mode = *mode;
                self.selected = 0;
                self.active_anchor = None;
            }
        }
    }

    /// Window mode has no unconstrained row: full-piece playback is not
    /// available there.
    fn has_full_piece_row(&self) -> bool {
        self.mode != Mode::Window
    }

    /// Rows for the current mode, given the active collection.
    pub fn rows<'a>(&self, anchors: &'a [Anchor]) -> Vec<Row<'a>> {
        let mut rows = Vec::with_capacity(anchors.len() + 1);
        if self.has_full_piece_row() {
            rows.push(Row::FullPiece);
        }
        rows.extend(anchors.iter().map(Row::Anchor));
        rows
    }

    pub fn selected_row<'a>(&self, anchors: &'a [Anchor]) -> Option<Row<'a>> {
        self.rows(anchors).get(self.selected).copied()
    }

    /// Whether `row` is what is playing right now.
    pub fn is_active(&self, row: Row<'_>) -> bool {
        match row {
            Row::FullPiece => self.active_anchor.is_none(),
            Row::Anchor(a) => self.active_anchor.as_deref() == Some(a.id.as_str()),
        }
    }

    /// Move the cursor down, wrapping at the end.
    pub fn next(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % row_count;
    }

    /// Move the cursor up, wrapping at the top.
    pub fn prev(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 || self.selected >= row_count {
            row_count - 1
        } else {
            self.selected - 1
        };
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

/// The recording `step` places away from `current_id`, wrapping around.
pub fn neighbour_recording<'a>(
    recordings: &'a [Recording],
    current_id: &str,
    step: isize,
) -> Option<&'a Recording> {
    if recordings.is_empty() {
        return None;
    }
    let len = recordings.len() as isize;
    let here = recordings
        .iter()
        .position(|r| r.id == current_id)
        .unwrap_or(0) as isize;
    let idx = (here + step).rem_euclid(len) as usize;
    recordings.get(idx)
}
