use super::*;
use crate::catalog::{Anchor, Recording, SourceRef};
use crate::playback::{Mode, SessionEvent};

fn a(id: &str, start: f64) -> Anchor {
    Anchor {
        id: id.into(),
        label: None,
        start_sec: start,
        end_sec: None,
        note: None,
    }
}

fn r(id: &str) -> Recording {
    Recording {
        id: id.into(),
        title: id.into(),
        source: SourceRef::new(format!("{id}.flac")),
    }
}

#[test]
fn segment_mode_lists_full_piece_first() {
    let anchors = vec![a("s1", 0.0), a("s2", 30.0)];
    let app = App::new(Mode::Segment);
    let rows = app.rows(&anchors);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], Row::FullPiece);
    assert_eq!(rows[2], Row::Anchor(&anchors[1]));
}

#[test]
fn window_mode_has_no_full_piece_row() {
    let anchors = vec![a("w1", 15.0)];
    let app = App::new(Mode::Window);
    assert_eq!(app.rows(&anchors), vec![Row::Anchor(&anchors[0])]);
    assert_eq!(app.selected_row(&anchors), Some(Row::Anchor(&anchors[0])));
}

#[test]
fn full_piece_mode_has_a_single_row() {
    let app = App::new(Mode::FullPiece);
    assert_eq!(app.rows(&[]), vec![Row::FullPiece]);
}

#[test]
fn cursor_wraps_both_ways() {
    let mut app = App::new(Mode::Segment);
    app.prev(3);
    assert_eq!(app.selected, 2);
    app.next(3);
    assert_eq!(app.selected, 0);
    app.next(3);
    assert_eq!(app.selected, 1);

    app.next(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn out_of_range_cursor_recovers_on_prev() {
    let mut app = App::new(Mode::Segment);
    app.selected = 9;
    app.prev(4);
    assert_eq!(app.selected, 3);
    assert_eq!(app.selected_row(&[]), None);
}

#[test]
fn session_events_drive_highlights() {
    let anchors = vec![a("s1", 0.0), a("s2", 30.0)];
    let mut app = App::new(Mode::Segment);
    assert!(app.is_active(Row::FullPiece));

    app.apply(&SessionEvent::RecordingActivated("r2".into()));
    assert_eq!(app.active_recording.as_deref(), Some("r2"));

    app.apply(&SessionEvent::AnchorActivated(Some("s2".into())));
    assert!(app.is_active(Row::Anchor(&anchors[1])));
    assert!(!app.is_active(Row::Anchor(&anchors[0])));
    assert!(!app.is_active(Row::FullPiece));

    app.apply(&SessionEvent::AnchorActivated(None));
    assert!(app.is_active(Row::FullPiece));
}

#[test]
fn mode_change_resets_cursor_and_anchor() {
    let mut app = App::new(Mode::Segment);
    app.selected = 2;
    app.active_anchor = Some("s1".into());
    app.apply(&SessionEvent::ModeChanged(Mode::Window));
    assert_eq!(app.mode, Mode::Window);
    assert_eq!(app.selected, 0);
    assert_eq!(app.active_anchor, None);
}

#[test]
fn status_can_be_set_and_cleared() {
    let mut app = App::new(Mode::Segment);
    app.set_status("anchor not found: x");
    assert_eq!(app.status.as_deref(), Some("anchor not found: x"));
    app.clear_status();
    assert_eq!(app.status, None);
}

#[test]
fn neighbour_recording_wraps() {
    let recs = vec![r("a"), r("b"), r("c")];
    assert_eq!(neighbour_recording(&recs, "a", 1).map(|x| x.id.as_str()), Some("b"));
    assert_eq!(neighbour_recording(&recs, "a", -1).map(|x| x.id.as_str()), Some("c"));
    assert_eq!(neighbour_recording(&recs, "c", 1).map(|x| x.id.as_str()), Some("a"));
    assert!(neighbour_recording(&[], "a", 1).is_none());
}
