use std::path::Path;
use std::time::{Duration, Instant};

use crate::catalog::SourceRef;

use super::error::BackendError;
use super::player::{resolve_source, secs_to_duration};
use super::types::PlaybackInfo;

#[test]
fn relative_sources_resolve_against_base_dir() {
    let base = Path::new("/music/catalogs");
    let p = resolve_source(base, &SourceRef::new("audio/one.flac")).unwrap();
    assert_eq!(p, Path::new("/music/catalogs/audio/one.flac"));
}

#[test]
fn absolute_and_file_url_sources_are_kept() {
    let base = Path::new("/ignored");
    let p = resolve_source(base, &SourceRef::new("/srv/a.ogg")).unwrap();
    assert_eq!(p, Path::new("/srv/a.ogg"));

    let p = resolve_source(base, &SourceRef::new("file:///srv/b.ogg")).unwrap();
    assert_eq!(p, Path::new("/srv/b.ogg"));
}

#[test]
fn remote_sources_are_unsupported() {
    let err = resolve_source(Path::new("."), &SourceRef::new("https://example.org/x.mp3"))
        .unwrap_err();
    assert!(matches!(err, BackendError::Unsupported(ref s) if s == "https://example.org/x.mp3"));

    // bare video ids are just relative file names to this backend
    let p = resolve_source(Path::new("."), &SourceRef::new("dQw4w9WgXcQ")).unwrap();
    assert_eq!(p, Path::new("./dQw4w9WgXcQ"));
}

#[test]
fn seconds_clamp_to_non_negative() {
    assert_eq!(secs_to_duration(-3.0), Duration::ZERO);
    assert_eq!(secs_to_duration(f64::NAN), Duration::ZERO);
    assert_eq!(secs_to_duration(1.5), Duration::from_millis(1_500));
}

#[test]
fn position_runs_only_while_playing() {
    let t0 = Instant::now();
    let mut info = PlaybackInfo::default();
    assert_eq!(info.position(), None);

    info.source = Some("/a.flac".into());
    info.restart_at(Duration::from_secs(40), true, t0);
    assert_eq!(info.position_at(t0 + Duration::from_secs(2)), Duration::from_secs(42));

    info.freeze(t0 + Duration::from_secs(3));
    assert_eq!(info.position_at(t0 + Duration::from_secs(60)), Duration::from_secs(43));

    info.resume(t0 + Duration::from_secs(10));
    assert_eq!(info.position_at(t0 + Duration::from_secs(11)), Duration::from_secs(44));
}

#[test]
fn paused_restart_does_not_run_the_clock() {
    let t0 = Instant::now();
    let mut info = PlaybackInfo::default();
    info.restart_at(Duration::from_secs(15), false, t0);
    assert_eq!(info.position_at(t0 + Duration::from_secs(5)), Duration::from_secs(15));
}

#[test]
fn position_never_passes_known_duration() {
    let t0 = Instant::now();
    let mut info = PlaybackInfo::default();
    info.duration = Some(Duration::from_secs(100));
    info.restart_at(Duration::from_secs(99), true, t0);
    assert_eq!(info.position_at(t0 + Duration::from_secs(5)), Duration::from_secs(100));

    info.clear();
    assert_eq!(info.duration, None);
}
