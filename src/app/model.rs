//! Application model types: `App`.
//!
//! `App` is the observer side of the controller. It never mutates playback
//! itself; it mirrors whatever the controller publishes so the terminal view
//! can be drawn from one place.

use std::time::Duration;

use crate::audio::{Command, CommandGate, PlaybackState, PlayerEvent, PositionSample, Volume};
use crate::library::Track;

pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    /// Index of the track currently loaded in the controller.
    pub loaded: Option<usize>,
    pub playback: PlaybackState,
    pub position: PositionSample,
    pub commands: CommandGate,
    pub volume: Volume,
    pub last_error: Option<String>,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            loaded: None,
            playback: PlaybackState::Stopped,
            position: PositionSample::default(),
            commands: CommandGate::default(),
            volume: Volume::default(),
            last_error: None,
            current_dir: None,
        }
    }

    /// Mirror one controller event.
    pub fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::StateChanged(state) => self.playback = *state,
            // Samples only move the display; the view never answers one with a seek.
            PlayerEvent::Position(sample, _) => self.position = *sample,
            PlayerEvent::CommandsChanged(gate) => self.commands = *gate,
            PlayerEvent::VolumeChanged(volume) => self.volume = *volume,
            PlayerEvent::TrackEnded => {}
            PlayerEvent::Error(err) => self.last_error = Some(err.to_string()),
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn loaded_track(&self) -> Option<&Track> {
        self.loaded.and_then(|i| self.tracks.get(i))
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Set the selected track index; out-of-range indices are ignored.
    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.tracks.len() {
            self.selected = idx;
        }
    }

    /// Index after `current`, or `None` at the end of the list.
    pub fn index_after(&self, current: usize) -> Option<usize> {
        let next = current + 1;
        (next < self.tracks.len()).then_some(next)
    }

    /// Index before `current`, or `None` at the start of the list.
    pub fn index_before(&self, current: usize) -> Option<usize> {
        current.checked_sub(1).filter(|&i| i < self.tracks.len())
    }

    /// Move selection to the next track, wrapping around.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move selection to the previous track, wrapping around.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = match self.selected {
                0 => self.tracks.len() - 1,
                i => i - 1,
            };
        }
    }

    /// One-line summary: state, track, time and volume.
    pub fn status_line(&self) -> String {
        let track = self
            .loaded_track()
            .map(Track::display)
            .unwrap_or_else(|| "nothing loaded".to_string());
        format!(
            "[{}] {}  {} / {}  vol {}",
            self.playback,
            track,
            format_mmss(self.position.elapsed),
            format_mmss(self.position.total),
            self.volume
        )
    }

    /// Key hints for the commands the gate currently enables.
    pub fn controls_text(&self) -> String {
        Command::ALL
            .into_iter()
            .filter(|&c| self.commands.is_enabled(c))
            .map(|c| match c {
                Command::Load => "[enter/n/N] load",
                Command::Play => "[space] play",
                Command::Pause => "[space] pause",
                Command::Stop => "[s] stop",
                Command::Seek => "[h/l] seek",
                Command::Volume => "[+/-] volume",
            })
            .chain(["[j/k] select", "[q] quit"])
            .collect::<Vec<&str>>()
            .join(" | ")
    }
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
