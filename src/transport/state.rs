//! Transport state types.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    None,
    /// Wrap around to the first track.
    All,
    /// Replay the current track when it ends.
    One,
}

impl RepeatMode {
    /// The mode after this one in the `None -> All -> One -> None` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::All => "all",
            Self::One => "one",
        })
    }
}

/// The playback status derived from selection and the play flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing selected.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Everything the presentation layer renders besides the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub is_playing: bool,
    /// Mirrors the sink's reported position.
    pub current_time: Duration,
    /// Mirrors the sink's reported length of the current source.
    pub duration: Duration,
    /// In `[0, 1]`.
    pub volume: f32,
    pub is_muted: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
            is_muted: false,
            shuffle: false,
            repeat: RepeatMode::None,
        }
    }
}

/// What a transport operation ended up doing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The track at this index was asked to play.
    Playing(usize),
    Paused,
    /// The current track was sent back to its start.
    Restarted,
    /// Reached the end of the playlist without wrapping.
    Stopped,
    /// Nothing to do.
    Noop,
}
