//! Local-file audio player: an append-only playlist, a transport state
//! machine and a `rodio` sink with a fixed leveling compressor.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod runtime;
pub mod transport;
