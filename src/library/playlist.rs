use std::time::Duration;

use tracing::debug;

use super::media::SelectedFile;
use super::model::{Track, TrackId};

/// Ordered, append-only list of loaded tracks.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every audio-typed file in `files`, in order.
    ///
    /// Anything else is dropped without an error. Returns how many tracks
    /// were added.
    pub fn append<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let before = self.tracks.len();
        for file in files {
            if !file.is_audio() {
                debug!(path = ?file.path(), mime = file.mime(), "skipping non-audio file");
                continue;
            }
            self.tracks.push(Track::from_file(file));
        }
        self.tracks.len() - before
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Position of the track with `id`, if it is loaded.
    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub(crate) fn fill_duration(&mut self, index: usize, duration: Duration) -> bool {
        self.tracks
            .get_mut(index)
            .is_some_and(|t| t.fill_duration(duration))
    }
}
