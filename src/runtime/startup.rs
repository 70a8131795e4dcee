use std::time::Duration;

use tracing::info;

use crate::audio::{AudioBackend, EventQueue, PlaybackController, Volume};
use crate::config;

use super::LOG_TARGET;

/// Build the controller from settings and subscribe an event queue to it.
pub fn build_controller<B: AudioBackend>(
    backend: B,
    settings: &config::Settings,
) -> (PlaybackController<B>, EventQueue) {
    let volume = Volume::new(settings.audio.initial_volume);
    let interval = Duration::from_millis(settings.playback.tick_interval_ms);
    info!(
        target: LOG_TARGET,
        "tick every {}ms, volume {volume}",
        interval.as_millis()
    );

    let mut controller = PlaybackController::new(backend, volume, interval);
    let events = EventQueue::new();
    controller.subscribe(events.clone());
    (controller, events)
}
