//! Settings for the player host and the sink adapter.
//!
//! Schema types live in `schema`; `load` layers the config file and
//! `CADENZA__*` environment overrides on top of the defaults.

mod load;
mod schema;

pub use load::default_log_dir;
pub use schema::*;
