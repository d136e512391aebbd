//! In-memory sink that records every command, for transport and host tests.

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::error::SinkError;
use crate::library::PlayableUrl;

use super::sink::AudioSink;
use super::types::{SinkEvent, Subscribers};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Initialize,
    Resume,
    Load(PlayableUrl),
    Play,
    Pause,
    SetPosition(Duration),
    SetVolume(f32),
    SetMuted(bool),
}

#[derive(Debug, Default)]
pub(crate) struct FakeSink {
    pub calls: Vec<Call>,
    pub initialized: bool,
    pub suspended_on_init: bool,
    pub suspended: bool,
    pub fail_init: bool,
    /// Loading this url fails and keeps the previous source.
    pub fail_load: Option<PlayableUrl>,
    /// Reported as `MetadataReady` on every load, when set.
    pub reported_duration: Option<Duration>,
    pub position: Duration,
    pub loaded: Option<PlayableUrl>,
    subscribers: Subscribers,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a notification as if the platform had produced it.
    pub fn emit(&mut self, event: SinkEvent) {
        self.subscribers.emit(event);
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }

    pub fn loads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count()
    }
}

impl AudioSink for FakeSink {
    fn initialize(&mut self) -> Result<(), SinkError> {
        if self.initialized {
            return Ok(());
        }
        if self.fail_init {
            return Err(SinkError::NotFileUrl("no output device".to_string()));
        }
        self.initialized = true;
        self.suspended = self.suspended_on_init;
        self.calls.push(Call::Initialize);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) {
        self.suspended = false;
        self.calls.push(Call::Resume);
    }

    fn load(&mut self, url: &PlayableUrl) -> Result<(), SinkError> {
        self.calls.push(Call::Load(url.clone()));
        if self.fail_load.as_ref() == Some(url) {
            return Err(SinkError::Open {
                path: url.to_file_path().unwrap_or_default(),
                source: io::ErrorKind::NotFound.into(),
            });
        }
        self.loaded = Some(url.clone());
        self.position = Duration::ZERO;
        if let Some(d) = self.reported_duration {
            self.subscribers.emit(SinkEvent::MetadataReady(d));
        }
        Ok(())
    }

    fn loaded(&self) -> Option<&PlayableUrl> {
        self.loaded.as_ref()
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn set_position(&mut self, position: Duration) {
        self.position = position;
        self.calls.push(Call::SetPosition(position));
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(Call::SetMuted(muted));
    }

    fn subscribe(&mut self) -> Receiver<SinkEvent> {
        self.subscribers.subscribe()
    }

    fn tick(&mut self) {}
}
