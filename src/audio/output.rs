//! `rodio`-backed implementation of [`AudioSink`].

use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::error::SinkError;
use crate::library::PlayableUrl;

use super::enhance::EnhancementChain;
use super::sink::AudioSink;
use super::types::{SinkEvent, Subscribers};

/// Everything built by `initialize`, exactly once.
struct Output {
    sink: Sink,
    chain: EnhancementChain,
    suspended: bool,
    // Dropped last; the sink goes quiet once the stream is gone.
    _stream: OutputStream,
}

/// Plays local files through the default output device.
///
/// One `rodio::Sink` is reused for every track; loading a new track clears
/// it and appends the freshly decoded source behind the compressor.
pub struct RodioSink {
    settings: AudioSettings,
    output: Option<Output>,
    loaded: Option<PlayableUrl>,
    wants_play: bool,
    drained: bool,
    volume: f32,
    muted: bool,
    // Start offset of the attached source; `Sink::get_pos` counts from zero
    // after a skip-based seek.
    base: Duration,
    last_reported: Duration,
    subscribers: Subscribers,
}

impl RodioSink {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            settings,
            output: None,
            loaded: None,
            wants_play: false,
            drained: false,
            volume: 1.0,
            muted: false,
            base: Duration::ZERO,
            last_reported: Duration::ZERO,
            subscribers: Subscribers::default(),
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.settings.progress_interval_ms)
    }

    /// Decode the loaded url and put it on the sink, paused at `start_at`.
    fn attach(&mut self, start_at: Duration) -> Result<(), SinkError> {
        let (Some(output), Some(url)) = (self.output.as_ref(), self.loaded.as_ref()) else {
            return Ok(());
        };

        let path = url
            .to_file_path()
            .ok_or_else(|| SinkError::NotFileUrl(url.to_string()))?;
        let file = File::open(&path).map_err(|source| SinkError::Open {
            path: path.clone(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|source| SinkError::Decode { path, source })?;

        let duration = decoder.total_duration();
        // `skip_duration` is our fallback seeking primitive; Duration::ZERO is fine.
        let source = decoder.skip_duration(start_at);

        output.sink.clear();
        output.sink.append(output.chain.apply(source));

        self.drained = false;
        self.base = start_at;
        self.last_reported = start_at;

        if let Some(d) = duration {
            self.subscribers.emit(SinkEvent::MetadataReady(d));
        }
        Ok(())
    }

    /// `attach`, logging failures instead of returning them.
    fn reattach(&mut self, start_at: Duration) {
        if let Err(e) = self.attach(start_at) {
            warn!(error = %e, "failed to re-attach source");
            self.loaded = None;
        }
    }
}

impl AudioSink for RodioSink {
    fn initialize(&mut self) -> Result<(), SinkError> {
        if self.output.is_some() {
            return Ok(());
        }

        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when the stream is dropped; the terminal belongs to the status line.
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        sink.set_volume(self.effective_volume());

        let chain = EnhancementChain::new(self.settings.enhancement);
        info!(enhancement = chain.is_enabled(), "audio output initialized");

        self.output = Some(Output {
            sink,
            chain,
            suspended: true,
            _stream: stream,
        });

        if self.loaded.is_some() {
            self.reattach(Duration::ZERO);
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.output.is_some()
    }

    fn is_suspended(&self) -> bool {
        self.output.as_ref().is_some_and(|o| o.suspended)
    }

    fn resume(&mut self) {
        if let Some(output) = self.output.as_mut() {
            if output.suspended {
                output.suspended = false;
                debug!("audio output resumed");
            }
        }
    }

    fn load(&mut self, url: &PlayableUrl) -> Result<(), SinkError> {
        // Opening and decoding happen before the sink is cleared, so a
        // failure leaves the previous source attached.
        let previous = self.loaded.replace(url.clone());
        if let Err(e) = self.attach(Duration::ZERO) {
            self.loaded = previous;
            return Err(e);
        }
        self.wants_play = false;
        self.drained = false;
        debug!(url = %url, "source loaded");
        Ok(())
    }

    fn loaded(&self) -> Option<&PlayableUrl> {
        self.loaded.as_ref()
    }

    fn play(&mut self) {
        self.wants_play = true;
        if self.output.is_none() || self.loaded.is_none() {
            return;
        }
        if self.is_suspended() {
            self.resume();
        }
        // Media-element semantics: playing a finished source starts it over.
        if self.drained {
            self.reattach(Duration::ZERO);
        }
        if let Some(output) = self.output.as_ref() {
            output.sink.play();
        }
    }

    fn pause(&mut self) {
        self.wants_play = false;
        if let Some(output) = self.output.as_ref() {
            output.sink.pause();
        }
    }

    fn set_position(&mut self, position: Duration) {
        if self.loaded.is_none() || self.output.is_none() {
            return;
        }
        if self.drained {
            self.reattach(position);
            return;
        }
        let Some(output) = self.output.as_ref() else {
            return;
        };

        match output.sink.try_seek(position) {
            Ok(()) => {
                self.base = Duration::ZERO;
                self.last_reported = position;
            }
            Err(e) => {
                debug!(error = %e, "seek unsupported, re-decoding from offset");
                let was_playing = !output.sink.is_paused();
                self.reattach(position);
                if was_playing {
                    if let Some(output) = self.output.as_ref() {
                        output.sink.play();
                    }
                }
            }
        }
    }

    fn position(&self) -> Duration {
        match self.output.as_ref() {
            Some(output) if self.loaded.is_some() => self.base + output.sink.get_pos(),
            _ => Duration::ZERO,
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let effective = self.effective_volume();
        if let Some(output) = self.output.as_ref() {
            output.sink.set_volume(effective);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let effective = self.effective_volume();
        if let Some(output) = self.output.as_ref() {
            output.sink.set_volume(effective);
        }
    }

    fn subscribe(&mut self) -> Receiver<SinkEvent> {
        self.subscribers.subscribe()
    }

    fn tick(&mut self) {
        let Some(output) = self.output.as_ref() else {
            return;
        };
        if !self.wants_play || self.drained || self.loaded.is_none() {
            return;
        }

        if output.sink.empty() {
            self.drained = true;
            self.wants_play = false;
            debug!("source drained");
            self.subscribers.emit(SinkEvent::Ended);
            return;
        }

        let position = self.position();
        if position.abs_diff(self.last_reported) >= self.progress_interval() {
            self.last_reported = position;
            self.subscribers.emit(SinkEvent::TimeUpdate(position));
        }
    }
}
