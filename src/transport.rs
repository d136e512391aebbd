//! Transport: playlist position, play/pause and the shuffle/repeat policies.
//!
//! [`Player`] is the state machine the host drives. It owns the playlist and
//! the sink, and it is the only thing that mutates [`TransportState`].

mod player;
mod shuffle;
mod state;

pub use player::{DEFAULT_RESTART_THRESHOLD, Player};
pub use shuffle::{ShuffleRng, ThreadShuffle};
pub use state::{PlaybackStatus, RepeatMode, Transition, TransportState};
