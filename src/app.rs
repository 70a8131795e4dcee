//! Application module: the view model the terminal front end draws from.
//!
//! `App` lives in `app::model` and mirrors controller events: track list,
//! selection, transport state, position, enabled commands and errors.

mod model;

pub use model::*;
