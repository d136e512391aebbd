//! Notification types emitted by audio sinks.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Asynchronous input from a sink to the transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// Playback position advanced.
    TimeUpdate(Duration),
    /// Length of the newly loaded source is known.
    MetadataReady(Duration),
    /// The loaded source played to its natural end.
    Ended,
}

/// Fan-out list of notification channels.
///
/// Events reach every live subscriber in emission order. Subscribers whose
/// receiver was dropped are forgotten on the next emit.
#[derive(Debug, Default)]
pub struct Subscribers {
    senders: Vec<Sender<SinkEvent>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<SinkEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    pub fn emit(&mut self, event: SinkEvent) {
        self.senders.retain(|tx| tx.send(event).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }
}
