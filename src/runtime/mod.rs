use std::path::Path;
use std::sync::mpsc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::Catalog;
use crate::logging;
use crate::playback::{BackendEvent, PlaybackSession, SessionOptions};

mod cli;
mod event_loop;
mod settings;
mod startup;


use cli::Cli;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (settings, fallback) = settings::load_settings();

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    logging::init(&settings.logging)?;
    if let Some(reason) = fallback {
        warn!("{reason}");
    }

    let catalog = match Catalog::from_path(&cli.catalog) {
        Ok(c) => c,
        Err(e) => {
            error!("catalog unavailable: {e}");
            return Err(e.into());
        }
    };
    info!(
        "loaded {} with {} recordings, {} segments, {} windows",
        cli.catalog.display(),
        catalog.recordings().len(),
        catalog.segments().len(),
        catalog.windows().len()
    );

    let mode = startup::initial_mode(&cli, &settings);
    let mut session = PlaybackSession::new(catalog, SessionOptions::from(&settings), mode);
    let mut app = App::new(mode);

    let base_dir = cli
        .catalog
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let (events_tx, events_rx) = mpsc::channel::<BackendEvent>();
    session.attach_backend(AudioPlayer::new(base_dir, events_tx));
    startup::apply_initial_recording(&cli, &mut session, &mut app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut session, &events_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
