use std::fmt;

/// Opaque handle the media backend resolves to a playable source
/// (a file path, a URL or a video identifier).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One performance of the work.
#[derive(Clone, Debug)]
pub struct Recording {
    pub id: String,
    pub title: String,
    pub source: SourceRef,
}

/// A named point or range on the logical timeline: a segment, a
/// representative excerpt or a comparison window.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub id: String,
    pub label: Option<String>,
    pub start_sec: f64,
    pub end_sec: Option<f64>,
    pub note: Option<String>,
}

impl Anchor {
    /// Whole-second start, never negative.
    pub fn start_floor(&self) -> f64 {
        self.start_sec.floor().max(0.0)
    }

    /// The label to show for this anchor; falls back to `m:ss` of the start.
    pub fn display_label(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format_mss(self.start_sec),
        }
    }
}

/// Format seconds as `m:ss` (minutes unpadded).
pub fn format_mss(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Immutable catalog of recordings and the two anchor collections.
///
/// When the source document carries a unified `anchors` list, both
/// collections are that list.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub(super) title: Option<String>,
    pub(super) recordings: Vec<Recording>,
    pub(super) segments: Vec<Anchor>,
    pub(super) windows: Vec<Anchor>,
}

impl Catalog {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn recording(&self, id: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.id == id)
    }

    /// The recording selected at startup. A loaded catalog always has one.
    pub fn first_recording(&self) -> &Recording {
        &self.recordings[0]
    }

    /// Anchors used by segment mode (jump-and-stop).
    pub fn segments(&self) -> &[Anchor] {
        &self.segments
    }

    /// Anchors used by window mode (looping ranges).
    pub fn windows(&self) -> &[Anchor] {
        &self.windows
    }
}
