use std::io::Write;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::{cursor, queue, style, terminal};

use crate::app::App;
use crate::audio::{
    AudioBackend, Command, ErrorKind, EventQueue, PlaybackController, PlaybackError, PlaybackState,
    PlayerEvent,
};
use crate::config;

/// What a key press asks for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    LoadSelected,
    TogglePlay,
    Stop,
    /// Relative seek as a fraction of the track.
    SeekBy(f64),
    VolumeBy(f32),
    NextTrack,
    PrevTrack,
    SelectNext,
    SelectPrev,
    Quit,
}

pub fn action_for_key(key: KeyEvent, settings: &config::Settings) -> Option<Action> {
    let seek = settings.controls.seek_step;
    let vol = settings.controls.volume_step;
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::LoadSelected,
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePlay,
        KeyCode::Char('s') => Action::Stop,
        KeyCode::Char('l') | KeyCode::Right => Action::SeekBy(seek),
        KeyCode::Char('h') | KeyCode::Left => Action::SeekBy(-seek),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::VolumeBy(vol),
        KeyCode::Char('-') => Action::VolumeBy(-vol),
        KeyCode::Char('n') => Action::NextTrack,
        KeyCode::Char('N') => Action::PrevTrack,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrev,
        _ => return None,
    };
    Some(action)
}

/// Load track `idx` and start it. Failures were already published by the
/// controller, so callers only need the result to decide what to try next.
pub fn load_and_play<B: AudioBackend>(
    idx: usize,
    app: &mut App,
    controller: &mut PlaybackController<B>,
) -> Result<(), PlaybackError> {
    let Some(track) = app.tracks.get(idx).cloned() else {
        return Ok(());
    };
    app.loaded = None;
    controller.load(track)?;
    app.loaded = Some(idx);
    app.set_selected(idx);
    controller.play()
}

/// Play the first loadable track after `from`. Unreadable files are skipped;
/// any other failure (a missing device, say) ends the search.
pub fn advance_from<B: AudioBackend>(
    from: usize,
    app: &mut App,
    controller: &mut PlaybackController<B>,
) {
    let mut next = app.index_after(from);
    while let Some(idx) = next {
        match load_and_play(idx, app, controller) {
            Err(e) if e.kind() == ErrorKind::TrackUnavailable => next = app.index_after(idx),
            _ => break,
        }
    }
}

/// Carry out `action`. Returns `true` when the user asked to quit.
pub fn perform<B: AudioBackend>(
    action: Action,
    app: &mut App,
    controller: &mut PlaybackController<B>,
) -> bool {
    app.clear_error();
    match action {
        Action::Quit => return true,
        Action::LoadSelected => {
            if app.has_tracks() {
                let _ = load_and_play(app.selected, app, controller);
            }
        }
        Action::TogglePlay => match controller.state() {
            PlaybackState::Playing => {
                let _ = controller.pause();
            }
            PlaybackState::Paused | PlaybackState::Stopped => {
                if controller.has_session() {
                    let _ = controller.play();
                } else if app.has_tracks() {
                    let _ = load_and_play(app.selected, app, controller);
                }
            }
        },
        Action::Stop => {
            if app.commands.is_enabled(Command::Stop) {
                let _ = controller.stop();
            }
        }
        Action::SeekBy(delta) => {
            if app.commands.is_enabled(Command::Seek) {
                let _ = controller.seek_by(delta);
            }
        }
        Action::VolumeBy(delta) => {
            let next = controller.volume().step(delta);
            controller.set_volume(next.get());
        }
        Action::NextTrack => {
            let next = match app.loaded {
                Some(i) => app.index_after(i),
                None => app.has_tracks().then_some(app.selected),
            };
            if let Some(i) = next {
                let _ = load_and_play(i, app, controller);
            }
        }
        Action::PrevTrack => {
            let prev = match app.loaded {
                Some(i) => app.index_before(i),
                None => app.has_tracks().then_some(app.selected),
            };
            if let Some(i) = prev {
                let _ = load_and_play(i, app, controller);
            }
        }
        Action::SelectNext => app.next(),
        Action::SelectPrev => app.prev(),
    }
    false
}

/// Feed buffered controller events into `app`, advancing to the next track
/// on end of media when configured to.
pub fn apply_events<B: AudioBackend>(
    events: &EventQueue,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<B>,
) {
    // Advancing publishes more events; keep going until the queue is quiet.
    loop {
        let batch = events.drain();
        if batch.is_empty() {
            break;
        }
        for event in batch {
            app.apply(&event);
            if event == PlayerEvent::TrackEnded && settings.playback.auto_advance {
                if let Some(current) = app.loaded {
                    advance_from(current, app, controller);
                }
            }
        }
    }
}

fn draw(out: &mut impl Write, app: &App) -> std::io::Result<()> {
    let dir = app.current_dir.as_deref().unwrap_or("");
    let selected = app
        .selected_track()
        .map(|t| t.display())
        .unwrap_or_else(|| "no tracks found".to_string());

    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::FromCursorDown),
        style::Print(format!("segue  {dir}  ({} tracks)\r\n", app.tracks.len())),
        style::Print(format!(
            "> {} [{}/{}]\r\n",
            selected,
            app.selected + 1,
            app.tracks.len()
        )),
        style::Print(format!("{}\r\n", app.status_line())),
        style::Print(format!("{}\r\n", app.controls_text())),
    )?;
    if let Some(err) = &app.last_error {
        queue!(out, style::Print(format!("! {err}\r\n")))?;
    }
    out.flush()
}

/// Main terminal loop. Input handling, ticks and redraws all happen on this
/// thread; ticks fire whenever the poll deadline passes.
pub fn run<B: AudioBackend>(
    out: &mut impl Write,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<B>,
    events: &EventQueue,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = controller.tick_interval();
    let mut next_tick = Instant::now() + interval;

    loop {
        apply_events(events, settings, app, controller);
        draw(out, app)?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = action_for_key(key, settings) {
                        if perform(action, app, controller) {
                            break;
                        }
                    }
                }
            }
        }

        if Instant::now() >= next_tick {
            controller.tick();
            next_tick = Instant::now() + interval;
        }
    }

    Ok(())
}
