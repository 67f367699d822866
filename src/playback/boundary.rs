//! Boundary resolution for segments and comparison windows.
//!
//! Anchors are authored loosely: with an explicit end, "until the next
//! anchor", or "the rest of the piece". Everything here compares whole
//! seconds and never yields an end at or before the start.

use crate::catalog::Anchor;
use crate::config::BoundarySettings;

/// Length limits applied by the resolver, in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundaryRules {
    pub min_len: f64,
    pub default_len: f64,
}

impl Default for BoundaryRules {
    fn default() -> Self {
        Self::from(&BoundarySettings::default())
    }
}

impl From<&BoundarySettings> for BoundaryRules {
    fn from(s: &BoundarySettings) -> Self {
        Self {
            min_len: s.min_segment_secs.max(1) as f64,
            default_len: s.default_window_secs.max(1) as f64,
        }
    }
}

/// Resolve where playback of `anchor` should stop.
///
/// Tiers, first match wins:
/// 1. the anchor's own `end_sec`
/// 2. the nearest following anchor start in `collection`
/// 3. the backend `duration`, when known and past the start
/// 4. `start + default_len`
pub fn resolve_end(
    anchor: &Anchor,
    collection: &[Anchor],
    duration: Option<f64>,
    rules: &BoundaryRules,
) -> f64 {
    let start = anchor.start_sec.floor();
    let min_end = start + rules.min_len;

    if let Some(end) = anchor.end_sec.filter(|e| e.is_finite()) {
        return end.floor().max(min_end);
    }

    let next = collection
        .iter()
        .map(|a| a.start_sec.floor())
        .filter(|s| *s > start)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |m| m.min(s))));
    if let Some(next) = next {
        return next.max(min_end);
    }

    if let Some(d) = duration.filter(|d| d.is_finite() && *d > 0.0 && *d > start) {
        return d;
    }

    start + rules.default_len
}

/// Compute the loop range for `anchor` in window mode.
///
/// Windows are explicit ranges: there is no next-anchor fallback. An end
/// of exactly 0 counts as unset.
pub fn resolve_window(anchor: &Anchor, rules: &BoundaryRules) -> Window {
    let start = anchor.start_sec.floor().max(0.0);
    let end = match anchor.end_sec.filter(|e| e.is_finite() && *e != 0.0) {
        Some(end) if end.floor() > start => end.floor(),
        Some(_) => start + rules.min_len,
        None => start + rules.default_len,
    };
    Window { start, end }
}

/// Fraction of the way through `old` at time `t`, carried into `new`.
///
/// `rel = (t - old.start) / max(1, old.len())`, clamped to `[0, 1]`; the
/// result is clamped into `[new.start, new.end - epsilon]`.
pub fn carry_position(old: &Window, new: &Window, t: f64, epsilon: f64) -> f64 {
    let rel = ((t - old.start) / old.len().max(1.0)).clamp(0.0, 1.0);
    new.clamp(new.start + rel * new.len(), epsilon)
}

/// The active loop range in window mode. Always `end > start >= 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    start: f64,
    end: f64,
}

impl Window {
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && start >= 0.0 && end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// Clamp `t` into `[start, end - epsilon]` (never below `start`).
    pub fn clamp(&self, t: f64, epsilon: f64) -> f64 {
        let hi = (self.end - epsilon).max(self.start);
        t.clamp(self.start, hi)
    }
}
