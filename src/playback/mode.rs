use std::fmt;

use crate::catalog::{Anchor, Catalog};
use crate::config::ModeSetting;

/// Mutually exclusive playback disciplines.
///
/// `FullPiece` and `Segment` without a selected anchor behave the same:
/// playback is unconstrained and the watcher stays inactive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    FullPiece,
    Segment,
    Window,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Segment
    }
}

impl Mode {
    /// Anchors selectable in this mode.
    pub fn collection(self, catalog: &Catalog) -> &[Anchor] {
        match self {
            Mode::FullPiece => &[],
            Mode::Segment => catalog.segments(),
            Mode::Window => catalog.windows(),
        }
    }

    /// Cycle `Segment -> Window -> FullPiece -> Segment`.
    pub fn next(self) -> Self {
        match self {
            Mode::Segment => Mode::Window,
            Mode::Window => Mode::FullPiece,
            Mode::FullPiece => Mode::Segment,
        }
    }
}

impl From<ModeSetting> for Mode {
    fn from(setting: ModeSetting) -> Self {
        match setting {
            ModeSetting::FullPiece => Mode::FullPiece,
            ModeSetting::Segment => Mode::Segment,
            ModeSetting::Window => Mode::Window,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::FullPiece => "full-piece",
            Mode::Segment => "segment",
            Mode::Window => "window",
        };
        f.write_str(s)
    }
}
