//! Layered settings: struct defaults, an optional TOML file and `SEGUE__*`
//! environment overrides.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
