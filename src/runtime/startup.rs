use crate::audio::AudioSink;
use crate::config;
use crate::transport::{Player, RepeatMode};

/// Bring a fresh player in line with the configured playback defaults.
pub fn apply_playback_defaults<S: AudioSink>(player: &mut Player<S>, settings: &config::Settings) {
    if settings.playback.shuffle != player.state().shuffle {
        player.toggle_shuffle();
    }

    let wanted: RepeatMode = settings.playback.repeat.into();
    while player.state().repeat != wanted {
        player.toggle_repeat();
    }

    player.set_volume(settings.playback.volume);
}
