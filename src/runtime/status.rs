//! One-line status rendering for the terminal host.

use std::time::Duration;

use crate::audio::AudioSink;
use crate::transport::{PlaybackStatus, Player};

/// `m:ss`, with minutes growing past 59.
pub fn format_time(t: Duration) -> String {
    let secs = t.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn render<S: AudioSink>(player: &Player<S>) -> String {
    let state = player.state();
    let marker = match player.status() {
        PlaybackStatus::Playing => ">",
        PlaybackStatus::Paused => "||",
        PlaybackStatus::Stopped => "[]",
    };
    let now = match player.current_track() {
        Some(track) => format!("{} - {}", track.title(), track.artist()),
        None => "nothing loaded".to_string(),
    };
    let volume = if state.is_muted {
        "muted".to_string()
    } else {
        format!("{:>3.0}%", state.volume * 100.0)
    };

    format!(
        "{marker} {now}  {}/{}  vol {volume}  shuffle {}  repeat {}",
        format_time(state.current_time),
        format_time(state.duration),
        if state.shuffle { "on" } else { "off" },
        state.repeat,
    )
}

/// The numbered track list printed once before the key loop takes over.
pub fn track_list<S: AudioSink>(player: &Player<S>) -> Vec<String> {
    player
        .playlist()
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{:>3}. {}", i + 1, t.title()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::FakeSink;
    use crate::library::SelectedFile;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_millis(65_900)), "1:05");
        assert_eq!(format_time(Duration::from_secs(3600)), "60:00");
    }

    #[test]
    fn renders_selection_and_modes() {
        let mut player = Player::new(FakeSink::new());
        assert!(render(&player).starts_with("[] nothing loaded"));

        player
            .load_files(vec![SelectedFile::new("/m/Intro.flac", "audio/flac")])
            .unwrap();
        player.toggle_play().unwrap();
        player.toggle_repeat();
        player.set_volume(0.5);

        let line = render(&player);
        assert!(line.starts_with("> Intro - Unknown Artist"), "{line}");
        assert!(line.contains(" 50%"), "{line}");
        assert!(line.contains("repeat all"), "{line}");

        player.toggle_mute();
        assert!(render(&player).contains("vol muted"));
    }

    #[test]
    fn track_list_is_numbered_from_one() {
        let mut player = Player::new(FakeSink::new());
        player
            .load_files(vec![
                SelectedFile::new("/m/a.mp3", "audio/mpeg"),
                SelectedFile::new("/m/b.ogg", "audio/ogg"),
            ])
            .unwrap();
        assert_eq!(track_list(&player), ["  1. a", "  2. b"]);
    }
}
