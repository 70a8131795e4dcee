//! Track catalog: directory scanning and the immutable `Track` record the
//! playback controller consumes.

mod model;
mod scan;

pub use model::Track;
pub use scan::list_tracks;
