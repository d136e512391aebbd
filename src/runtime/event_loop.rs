use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tracing::{debug, warn};

use crate::audio::AudioSink;
use crate::config::ControlsSettings;
use crate::error::PlayerError;
use crate::runtime::status;
use crate::transport::{Player, Transition};

/// How long to wait for a key before letting the sink report progress.
const TICK: Duration = Duration::from_millis(50);

/// A user intent decoded from a key press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlCmd {
    PlayPause,
    Next,
    Prev,
    ScrubForward,
    ScrubBack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleShuffle,
    CycleRepeat,
    /// Zero-based playlist position.
    Select(usize),
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<ControlCmd> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(ControlCmd::Quit),
            _ => None,
        };
    }

    let cmd = match key.code {
        KeyCode::Char(' ') => ControlCmd::PlayPause,
        KeyCode::Char('n') => ControlCmd::Next,
        KeyCode::Char('p') => ControlCmd::Prev,
        KeyCode::Char('l') | KeyCode::Right => ControlCmd::ScrubForward,
        KeyCode::Char('h') | KeyCode::Left => ControlCmd::ScrubBack,
        KeyCode::Char('+') | KeyCode::Char('=') => ControlCmd::VolumeUp,
        KeyCode::Char('-') => ControlCmd::VolumeDown,
        KeyCode::Char('m') => ControlCmd::ToggleMute,
        KeyCode::Char('s') => ControlCmd::ToggleShuffle,
        KeyCode::Char('r') => ControlCmd::CycleRepeat,
        KeyCode::Char(c @ '1'..='9') => ControlCmd::Select(c as usize - '1' as usize),
        KeyCode::Char('q') | KeyCode::Esc => ControlCmd::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Apply one command. Returns `true` when shutdown is requested.
///
/// Transport failures never reach the user; they are logged and playback
/// carries on.
pub fn apply<S: AudioSink>(
    player: &mut Player<S>,
    cmd: ControlCmd,
    controls: &ControlsSettings,
) -> bool {
    let scrub = controls.scrub_seconds.min(i64::MAX as u64) as i64;
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::PlayPause => report(cmd, player.toggle_play()),
        ControlCmd::Next => report(cmd, player.play_next()),
        ControlCmd::Prev => report(cmd, player.play_previous()),
        ControlCmd::ScrubForward => player.seek_by(scrub),
        ControlCmd::ScrubBack => player.seek_by(-scrub),
        ControlCmd::VolumeUp => {
            let v = player.state().volume + controls.volume_step;
            player.set_volume(v);
        }
        ControlCmd::VolumeDown => {
            let v = player.state().volume - controls.volume_step;
            player.set_volume(v);
        }
        ControlCmd::ToggleMute => player.toggle_mute(),
        ControlCmd::ToggleShuffle => player.toggle_shuffle(),
        ControlCmd::CycleRepeat => player.toggle_repeat(),
        ControlCmd::Select(index) => match player.playlist().get(index).map(|t| t.id()) {
            Some(id) => report(cmd, player.select_track(id)),
            None => debug!(index, "no track at position"),
        },
    }
    false
}

fn report(cmd: ControlCmd, result: Result<Transition, PlayerError>) {
    match result {
        Ok(transition) => debug!(?cmd, ?transition, "applied"),
        Err(e @ PlayerError::TrackNotFound(_)) => debug!(?cmd, error = %e, "ignored"),
        Err(e) => warn!(?cmd, error = %e, "command failed"),
    }
}

fn draw_status(out: &mut impl Write, line: &str) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(line))?;
    out.flush()
}

/// Main terminal loop: reads keys, drives the player and redraws the status
/// line. Returns `Ok(())` when shutdown is requested.
pub fn run<S: AudioSink>(
    player: &mut Player<S>,
    controls: &ControlsSettings,
    out: &mut impl Write,
) -> io::Result<()> {
    loop {
        if let Err(e) = player.pump() {
            warn!(error = %e, "advancing after track end failed");
        }
        draw_status(out, &status::render(player))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = map_key(key) {
                    if apply(player, cmd, controls) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::{Call, FakeSink};
    use crate::library::SelectedFile;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_player(n: usize) -> Player<FakeSink> {
        let mut player = Player::new(FakeSink::new());
        player
            .load_files((0..n).map(|i| SelectedFile::new(format!("/m/{i}.mp3"), "audio/mpeg")))
            .unwrap();
        player
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(ControlCmd::PlayPause));
        assert_eq!(map_key(key(KeyCode::Char('n'))), Some(ControlCmd::Next));
        assert_eq!(map_key(key(KeyCode::Char('p'))), Some(ControlCmd::Prev));
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(ControlCmd::CycleRepeat));
        assert_eq!(map_key(key(KeyCode::Char('1'))), Some(ControlCmd::Select(0)));
        assert_eq!(map_key(key(KeyCode::Char('9'))), Some(ControlCmd::Select(8)));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(ControlCmd::Quit));
        assert_eq!(map_key(key(KeyCode::Char('0'))), None);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(ControlCmd::Quit)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn quit_is_the_only_command_that_stops_the_loop() {
        let mut player = loaded_player(2);
        let controls = ControlsSettings::default();
        assert!(!apply(&mut player, ControlCmd::Next, &controls));
        assert!(apply(&mut player, ControlCmd::Quit, &controls));
    }

    #[test]
    fn select_past_the_end_is_ignored() {
        let mut player = loaded_player(2);
        let controls = ControlsSettings::default();
        let calls = player.sink().calls.len();

        apply(&mut player, ControlCmd::Select(5), &controls);
        assert_eq!(player.current_index(), Some(0));
        assert_eq!(player.sink().calls.len(), calls);

        apply(&mut player, ControlCmd::Select(1), &controls);
        assert_eq!(player.current_index(), Some(1));
        assert!(player.state().is_playing);
    }

    #[test]
    fn volume_steps_use_the_configured_increment() {
        let mut player = loaded_player(1);
        let controls = ControlsSettings {
            volume_step: 0.25,
            ..ControlsSettings::default()
        };
        apply(&mut player, ControlCmd::VolumeDown, &controls);
        apply(&mut player, ControlCmd::VolumeDown, &controls);
        assert_eq!(player.state().volume, 0.5);
        apply(&mut player, ControlCmd::VolumeUp, &controls);
        apply(&mut player, ControlCmd::VolumeUp, &controls);
        apply(&mut player, ControlCmd::VolumeUp, &controls);
        assert_eq!(player.state().volume, 1.0);
    }

    #[test]
    fn scrubbing_moves_by_the_configured_seconds() {
        let mut player = loaded_player(1);
        let controls = ControlsSettings {
            scrub_seconds: 10,
            ..ControlsSettings::default()
        };
        apply(&mut player, ControlCmd::ScrubForward, &controls);
        apply(&mut player, ControlCmd::ScrubForward, &controls);
        apply(&mut player, ControlCmd::ScrubBack, &controls);
        assert_eq!(player.state().current_time, Duration::from_secs(10));
        assert_eq!(
            player.sink().calls.last(),
            Some(&Call::SetPosition(Duration::from_secs(10)))
        );
    }

    #[test]
    fn sink_failures_are_swallowed() {
        let mut sink = FakeSink::new();
        sink.fail_init = true;
        let mut player = Player::new(sink);
        player
            .load_files(vec![SelectedFile::new("/m/a.mp3", "audio/mpeg")])
            .unwrap();

        assert!(!apply(&mut player, ControlCmd::PlayPause, &ControlsSettings::default()));
        assert!(!player.state().is_playing);
    }

    #[test]
    fn status_is_redrawn_in_place() {
        let mut out = Vec::new();
        draw_status(&mut out, "> a - Unknown Artist").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\r') || text.contains("\u{1b}["));
        assert!(text.ends_with("> a - Unknown Artist"));
    }
}
