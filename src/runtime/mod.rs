use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{info, warn};

use crate::audio::RodioSink;
use crate::library;
use crate::logging;
use crate::transport::{DEFAULT_RESTART_THRESHOLD, Player};

mod event_loop;
mod settings;
mod startup;
mod status;

pub fn run() -> anyhow::Result<()> {
    let (settings, config_problem) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings.logging)?;
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let mut paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        paths.push(env::current_dir()?);
    }

    let files = library::collect(&paths, &settings.library);
    let sink = RodioSink::new(settings.audio.clone());
    let threshold = restart_threshold(settings.playback.restart_threshold_secs);
    let mut player = Player::new(sink).with_restart_threshold(threshold);
    startup::apply_playback_defaults(&mut player, &settings);

    let added = player.load_files(files)?;
    info!(added, "playlist ready");

    let mut stdout = io::stdout();
    for line in status::track_list(&player) {
        writeln!(stdout, "{line}")?;
    }
    if player.playlist().is_empty() {
        writeln!(stdout, "no audio files found")?;
        return Ok(());
    }

    enable_raw_mode()?;
    execute!(stdout, Hide)?;

    let run_result = event_loop::run(&mut player, &settings.controls, &mut stdout);

    disable_raw_mode()?;
    execute!(stdout, Show)?;
    writeln!(stdout)?;
    info!("shutting down");

    Ok(run_result?)
}

fn restart_threshold(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_else(|e| {
        warn!(secs, error = %e, "unusable restart threshold, using default");
        DEFAULT_RESTART_THRESHOLD
    })
}
