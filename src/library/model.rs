use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use uuid::Uuid;

use super::media::{SelectedFile, title_from_file_name};

/// Artist shown for every track; tags are never read.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Identifier generated when a track is loaded. Never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference the audio sink loads; the only part of a track it ever sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableUrl(String);

impl PlayableUrl {
    const FILE_SCHEME: &'static str = "file://";

    /// Build a `file://` url for `path`, anchoring relative paths at the
    /// current directory.
    pub fn from_path(path: &Path) -> Self {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        Self(format!("{}{}", Self::FILE_SCHEME, absolute.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The local path behind a `file://` url, if this is one.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.0
            .strip_prefix(Self::FILE_SCHEME)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

impl From<String> for PlayableUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PlayableUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded audio item.
///
/// Everything but `duration` is fixed at creation; `duration` is filled in
/// once, when the sink first reports it.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    title: String,
    artist: String,
    source: SelectedFile,
    url: PlayableUrl,
    duration: Option<Duration>,
}

impl Track {
    pub fn from_file(source: SelectedFile) -> Self {
        let title = title_from_file_name(&source.name()).to_string();
        let url = PlayableUrl::from_path(source.path());
        Self {
            id: TrackId::new(),
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            source,
            url,
            duration: None,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn source(&self) -> &SelectedFile {
        &self.source
    }

    pub fn url(&self) -> &PlayableUrl {
        &self.url
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Record the duration unless one is already known. Returns whether it was set.
    pub(crate) fn fill_duration(&mut self, duration: Duration) -> bool {
        if self.duration.is_some() {
            return false;
        }
        self.duration = Some(duration);
        true
    }
}
