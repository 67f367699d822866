use std::path::PathBuf;

use clap::Parser;

use crate::playback::Mode;

/// Compare recordings of the same piece, segment by segment.
#[derive(Parser, Clone, Debug)]
#[command(name = "cadenza", version, about)]
pub struct Cli {
    /// Catalog JSON file describing the work and its recordings
    #[arg(default_value = "data/catalog.json")]
    pub catalog: PathBuf,

    /// Initial playback mode, overriding `[playback] initial_mode`
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Recording id to select at startup
    #[arg(short, long)]
    pub recording: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, default_value_t = false)]
    pub print_config: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    FullPiece,
    Segment,
    #[value(alias = "loop")]
    Window,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::FullPiece => Mode::FullPiece,
            ModeArg::Segment => Mode::Segment,
            ModeArg::Window => Mode::Window,
        }
    }
}
