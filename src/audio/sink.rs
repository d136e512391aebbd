use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::error::SinkError;
use crate::library::PlayableUrl;

use super::types::SinkEvent;

/// Platform playback capability driven by the transport.
///
/// Commands are fire-and-forget: returning from `play` does not mean sound is
/// coming out. The true state arrives later as [`SinkEvent`]s, which are only
/// produced from `load` and `tick` and are never delivered concurrently.
pub trait AudioSink {
    /// Build the output and the enhancement chain. A second call is a no-op.
    fn initialize(&mut self) -> Result<(), SinkError>;

    fn is_initialized(&self) -> bool;

    /// Whether the output is gated until a play intent resumes it.
    fn is_suspended(&self) -> bool;

    fn resume(&mut self);

    /// First phase of "swap source, then play": replace the current source
    /// and leave it paused at the start.
    fn load(&mut self, url: &PlayableUrl) -> Result<(), SinkError>;

    /// The source most recently loaded, if any.
    fn loaded(&self) -> Option<&PlayableUrl>;

    fn play(&mut self);

    fn pause(&mut self);

    fn set_position(&mut self, position: Duration);

    /// Position within the current source as the sink sees it.
    fn position(&self) -> Duration;

    /// `volume` is in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    fn set_muted(&mut self, muted: bool);

    /// Register for notifications. Each receiver sees every event emitted after it subscribed.
    fn subscribe(&mut self) -> Receiver<SinkEvent>;

    /// Give the sink a turn to notice progress or a finished source and emit
    /// the matching events.
    fn tick(&mut self);
}
