use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::debug;

use crate::audio::{AudioSink, SinkEvent};
use crate::error::{PlayerError, SinkError};
use crate::library::{Playlist, SelectedFile, Track, TrackId};

use super::shuffle::{ShuffleRng, ThreadShuffle};
use super::state::{PlaybackStatus, RepeatMode, Transition, TransportState};

/// "Previous" restarts the current track past this point by default.
pub const DEFAULT_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// The transport state machine.
///
/// Operations run synchronously to completion. Sink notifications are only
/// applied from [`Player::pump`], so they never interleave with a command.
pub struct Player<S: AudioSink> {
    playlist: Playlist,
    current: Option<usize>,
    /// Track whose source the sink currently holds.
    loaded: Option<TrackId>,
    state: TransportState,
    sink: S,
    events: Receiver<SinkEvent>,
    /// Notifications taken off the channel by a load that then failed.
    deferred: Vec<SinkEvent>,
    shuffle_rng: Box<dyn ShuffleRng>,
    restart_threshold: Duration,
}

impl<S: AudioSink> Player<S> {
    pub fn new(mut sink: S) -> Self {
        let events = sink.subscribe();
        Self {
            playlist: Playlist::new(),
            current: None,
            loaded: None,
            state: TransportState::default(),
            sink,
            events,
            deferred: Vec::new(),
            shuffle_rng: Box::new(ThreadShuffle),
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
        }
    }

    pub fn with_restart_threshold(mut self, threshold: Duration) -> Self {
        self.restart_threshold = threshold;
        self
    }

    pub fn with_shuffle_rng(mut self, rng: impl ShuffleRng + 'static) -> Self {
        self.shuffle_rng = Box::new(rng);
        self
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        match self.current {
            None => PlaybackStatus::Stopped,
            Some(_) if self.state.is_playing => PlaybackStatus::Playing,
            Some(_) => PlaybackStatus::Paused,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.playlist.get(i))
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Append a batch of files. Selects (without playing) the first new track
    /// when nothing was selected yet. Returns how many tracks were added.
    pub fn load_files<I>(&mut self, files: I) -> Result<usize, PlayerError>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let added = self.playlist.append(files);
        debug!(added, total = self.playlist.len(), "files appended");

        if self.current.is_none() && added > 0 {
            self.current = Some(0);
            self.ensure_loaded(0)?;
        }
        Ok(added)
    }

    /// Play the track with `id`. Unknown ids change nothing.
    pub fn select_track(&mut self, id: TrackId) -> Result<Transition, PlayerError> {
        let index = self
            .playlist
            .position(id)
            .ok_or(PlayerError::TrackNotFound(id))?;
        self.wake_sink()?;
        self.start(index)
    }

    pub fn toggle_play(&mut self) -> Result<Transition, PlayerError> {
        let Some(index) = self.current else {
            return Ok(Transition::Noop);
        };
        self.wake_sink()?;

        if self.state.is_playing {
            self.sink.pause();
            self.state.is_playing = false;
            Ok(Transition::Paused)
        } else {
            self.ensure_loaded(index)?;
            self.sink.play();
            self.state.is_playing = true;
            Ok(Transition::Playing(index))
        }
    }

    pub fn play_next(&mut self) -> Result<Transition, PlayerError> {
        let len = self.playlist.len();
        if len == 0 {
            return Ok(Transition::Noop);
        }
        self.ensure_initialized()?;

        let candidate = if self.state.shuffle {
            // Any track, the current one included; repeat is not consulted.
            self.shuffle_rng.pick(len)
        } else {
            let next = self.current.map_or(0, |i| i + 1);
            if next < len {
                next
            } else if self.state.repeat == RepeatMode::All {
                0
            } else {
                debug!("end of playlist");
                self.state.is_playing = false;
                return Ok(Transition::Stopped);
            }
        };

        self.start(candidate)
    }

    pub fn play_previous(&mut self) -> Result<Transition, PlayerError> {
        let len = self.playlist.len();
        if len == 0 {
            return Ok(Transition::Noop);
        }
        self.ensure_initialized()?;

        if self.sink.position() > self.restart_threshold {
            self.seek(Duration::ZERO);
            return Ok(Transition::Restarted);
        }

        // Always wraps, whatever the repeat mode.
        let candidate = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        };
        self.start(candidate)
    }

    /// Move the playback position. The mirrored time updates immediately.
    pub fn seek(&mut self, to: Duration) {
        self.sink.set_position(to);
        self.state.current_time = to;
    }

    /// Scrub relative to the mirrored position, staying inside the track.
    pub fn seek_by(&mut self, delta_secs: i64) {
        if self.current.is_none() {
            return;
        }
        let mut target = self.state.current_time.as_secs_f64() + delta_secs as f64;
        if self.state.duration > Duration::ZERO {
            target = target.min(self.state.duration.as_secs_f64());
        }
        self.seek(Duration::from_secs_f64(target.max(0.0)));
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(volume);
        self.state.volume = volume;
    }

    pub fn toggle_mute(&mut self) {
        self.state.is_muted = !self.state.is_muted;
        self.sink.set_muted(self.state.is_muted);
    }

    /// Only affects how the next track is chosen from now on.
    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.next();
    }

    /// Let the sink report, then apply its notifications in delivery order.
    pub fn pump(&mut self) -> Result<(), PlayerError> {
        self.sink.tick();
        for event in std::mem::take(&mut self.deferred) {
            self.handle_event(event)?;
        }
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: SinkEvent) -> Result<(), PlayerError> {
        match event {
            SinkEvent::TimeUpdate(t) => self.state.current_time = t,
            SinkEvent::MetadataReady(d) => {
                self.state.duration = d;
                if let Some(i) = self.current {
                    self.playlist.fill_duration(i, d);
                }
            }
            SinkEvent::Ended => {
                let transition = self.handle_ended()?;
                debug!(?transition, "track ended");
            }
        }
        Ok(())
    }

    fn handle_ended(&mut self) -> Result<Transition, PlayerError> {
        if self.state.repeat == RepeatMode::One && self.current.is_some() {
            self.seek(Duration::ZERO);
            self.sink.play();
            self.state.is_playing = true;
            return Ok(Transition::Restarted);
        }
        let next = self.play_next();
        if next.is_err() {
            // The finished source is silent and nothing replaced it.
            self.state.is_playing = false;
        }
        next
    }

    fn ensure_initialized(&mut self) -> Result<(), SinkError> {
        if !self.sink.is_initialized() {
            self.sink.initialize()?;
        }
        Ok(())
    }

    /// Initialize the sink if needed and lift a suspended output.
    fn wake_sink(&mut self) -> Result<(), SinkError> {
        self.ensure_initialized()?;
        if self.sink.is_suspended() {
            self.sink.resume();
        }
        Ok(())
    }

    /// Make `index` current and ask the sink to play it. A failed load
    /// leaves the selection and play flag as they were.
    fn start(&mut self, index: usize) -> Result<Transition, PlayerError> {
        self.ensure_loaded(index)?;
        self.current = Some(index);
        self.state.is_playing = true;
        self.sink.play();
        debug!(index, "playing");
        Ok(Transition::Playing(index))
    }

    /// Swap the sink's source to track `index` unless it already holds it.
    ///
    /// Two tracks loaded from the same path are still distinct sources.
    fn ensure_loaded(&mut self, index: usize) -> Result<(), SinkError> {
        let Some(track) = self.playlist.get(index) else {
            return Ok(());
        };
        if self.loaded == Some(track.id()) && self.sink.loaded() == Some(track.url()) {
            return Ok(());
        }

        let (id, url, known) = (track.id(), track.url().clone(), track.duration());
        debug!(index, path = ?track.source().path(), "loading source");
        // Anything still queued belongs to the outgoing source.
        let mut stale: Vec<SinkEvent> = self.deferred.drain(..).collect();
        stale.extend(self.events.try_iter());

        if let Err(e) = self.sink.load(&url) {
            self.deferred = stale;
            return Err(e);
        }
        if !stale.is_empty() {
            debug!(stale = stale.len(), "dropped notifications for previous source");
        }
        self.loaded = Some(id);
        self.state.current_time = Duration::ZERO;
        self.state.duration = known.unwrap_or(Duration::ZERO);
        Ok(())
    }
}
