//! Playlist store: loaded tracks and the file-like inputs they come from.
//!
//! Tracks are created from [`SelectedFile`] batches, live in an append-only
//! [`Playlist`] and are referenced by stable [`TrackId`]s.

mod media;
mod model;
mod playlist;
mod scan;

pub use media::{SelectedFile, title_from_file_name};
pub use model::*;
pub use playlist::Playlist;
pub use scan::collect;
