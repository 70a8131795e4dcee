use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Track, UNKNOWN_ARTIST};

const LOG_TARGET: &str = "segue::library";

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Read title/artist/duration from tags, falling back to the file stem and
/// `Unknown Artist` for anything missing.
fn read_track(path: &Path) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = UNKNOWN_ARTIST.to_string();
    let mut duration = Duration::ZERO;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration = tagged.properties().duration();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    title = v.trim().to_string();
                }
                if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                    artist = v.trim().to_string();
                }
            }
        }
        Err(e) => debug!(target: LOG_TARGET, "no readable tags in {}: {e}", path.display()),
    }

    Track {
        title,
        artist,
        path: path.to_path_buf(),
        duration,
    }
}

/// List playable tracks under `dir`, sorted case-insensitively by display name.
///
/// Directory entries that cannot be read are skipped; a missing directory
/// yields an empty list.
pub fn list_tracks(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(target: LOG_TARGET, "skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.path().is_file() && is_audio_file(entry.path(), settings))
        .map(|entry| read_track(entry.path()))
        .collect();

    tracks.sort_by_key(|t| t.display().to_lowercase());
    debug!(target: LOG_TARGET, "found {} tracks under {}", tracks.len(), dir.display());
    tracks
}
