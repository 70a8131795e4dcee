use super::types::{Command, PlaybackState};

/// Which transport commands are currently legal.
///
/// A pure function of the transport state and whether a track is loaded;
/// recomputed on every transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommandGate {
    pub load: bool,
    pub play: bool,
    pub pause: bool,
    pub stop: bool,
    pub seek: bool,
    pub volume: bool,
}

impl CommandGate {
    pub fn evaluate(state: PlaybackState, track_loaded: bool) -> Self {
        if !track_loaded {
            return Self {
                load: true,
                play: false,
                pause: false,
                stop: false,
                seek: false,
                volume: true,
            };
        }

        let playing = state == PlaybackState::Playing;
        Self {
            load: true,
            play: !playing,
            pause: playing,
            stop: state != PlaybackState::Stopped,
            seek: true,
            volume: true,
        }
    }

    pub fn is_enabled(&self, command: Command) -> bool {
        match command {
            Command::Load => self.load,
            Command::Play => self.play,
            Command::Pause => self.pause,
            Command::Stop => self.stop,
            Command::Seek => self.seek,
            Command::Volume => self.volume,
        }
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::evaluate(PlaybackState::Stopped, false)
    }
}
