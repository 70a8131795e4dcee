use std::env;
use std::path::Path;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use crossterm::cursor;
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioBackend;
use crate::library::list_tracks;

const LOG_TARGET: &str = "segue::runtime";

mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    // The terminal is still in cooked mode here, so this can go to stderr.
    let log_file = logging::init(&settings.logging).unwrap_or_else(|e| {
        eprintln!("segue: logging disabled: {e}");
        None
    });
    if let Some(path) = &log_file {
        info!(target: LOG_TARGET, "logging to {}", path.display());
    }
    if let Some(msg) = config_warning {
        warn!(target: LOG_TARGET, "{msg}");
    }

    let dir = env::args().nth(1).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    });

    let tracks = list_tracks(Path::new(&dir), &settings.library);
    info!(target: LOG_TARGET, "{} tracks in {dir}", tracks.len());

    // The output device opens on the first load, so a missing device shows
    // up as a recoverable error in the player.
    let backend = RodioBackend::new();
    let (mut controller, events) = startup::build_controller(backend, &settings);

    let mut app = App::new(tracks);
    app.volume = controller.volume();
    app.set_current_dir(dir);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let run_result = event_loop::run(&mut stdout, &settings, &mut app, &mut controller, &events);

    disable_raw_mode()?;
    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;

    run_result
}
