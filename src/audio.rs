//! Audio sink: the seam between the transport and the platform output.
//!
//! [`AudioSink`] is what the transport talks to. [`RodioSink`] is the only
//! implementation that touches a real device; it owns a single `rodio`
//! playback primitive and the fixed compressor stage in front of it.

mod enhance;
mod output;
mod sink;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use enhance::{Compressor, CompressorParams, EnhancementChain};
pub use output::RodioSink;
pub use sink::AudioSink;
pub use types::{SinkEvent, Subscribers};

#[cfg(test)]
mod tests;
