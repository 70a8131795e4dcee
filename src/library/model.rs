use std::path::PathBuf;
use std::time::Duration;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One playable file. Built by the scanner, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub path: PathBuf,
    /// Tag-reported length; zero when the container did not say.
    pub duration: Duration,
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is unknown.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() || artist == UNKNOWN_ARTIST {
            self.title.clone()
        } else {
            format!("{artist} - {}", self.title)
        }
    }
}
