//! Error types shared by the sink adapter and the transport.

use std::path::PathBuf;

use thiserror::Error;

use crate::library::TrackId;

/// Failures reported by an [`AudioSink`](crate::audio::AudioSink).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no audio output device: {0}")]
    OutputUnavailable(#[from] rodio::StreamError),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("not a local file url: {0}")]
    NotFileUrl(String),
}

/// Failures surfaced by transport operations.
///
/// The terminal host only logs these; playback carries on.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("track {0} is not in the playlist")]
    TrackNotFound(TrackId),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
