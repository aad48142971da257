//! Two-player terminal Tetris (default binary).
//!
//! Both players share one keyboard; remote controllers may take over a slot
//! over TCP. The loop measures `dt`, merges held keys from both sources and
//! hands them to the match once per frame.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use console_tetris::core::{Match, Replay};
use console_tetris::input::{should_quit, should_restart, KeyboardState};
use console_tetris::remote::Remote;
use console_tetris::term::{Screen, TerminalRenderer, VersusScreen};

const FRAME: Duration = Duration::from_millis(16);
// Long pauses (suspended terminal, debugger) should not fast-forward the match.
const MAX_DT: f32 = 0.25;

fn main() -> Result<()> {
    init_logging()?;

    let seed = seed_from_env();
    let remote = Remote::start_from_env()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let mut replay = Replay::new(seed);
    let result = run(&mut term, seed, remote.as_ref(), &mut replay);

    // Always try to restore terminal state.
    let _ = term.exit();
    result?;
    save_replay(&replay)
}

fn init_logging() -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    match std::env::var("CONSOLE_TETRIS_LOG_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            let file = File::create(path.trim())
                .with_context(|| format!("creating log file {}", path.trim()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Logging to stderr would tear the alternate screen.
        _ => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn seed_from_env() -> u64 {
    std::env::var("CONSOLE_TETRIS_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(1)
        })
}

fn save_replay(replay: &Replay) -> Result<()> {
    let Ok(path) = std::env::var("CONSOLE_TETRIS_REPLAY_PATH") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating replay file {path}"))?;
    serde_json::to_writer(file, replay)?;
    info!("replay written to {} ({} frames)", path, replay.frames.len());
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    seed: u64,
    remote: Option<&Remote>,
    replay: &mut Replay,
) -> Result<()> {
    let mut screen = VersusScreen::new(Match::new(seed));
    let mut keyboard = KeyboardState::new();
    let mut last_frame = Instant::now();
    info!("match started (seed {})", seed);

    loop {
        screen.draw();
        term.draw(screen.framebuffer())?;

        let deadline = last_frame + FRAME;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if should_restart(key) && screen.game().is_over() {
                            let next = screen.game().seed().wrapping_add(1);
                            screen.restart(next);
                            keyboard.reset();
                            *replay = Replay::new(next);
                            info!("match restarted (seed {})", next);
                            continue;
                        }
                        keyboard.press(key.code);
                    }
                    KeyEventKind::Release => keyboard.release(key.code),
                },
                Event::Resize(cols, rows) => term.resize(cols, rows),
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().min(MAX_DT);
        last_frame = now;

        keyboard.update(dt);
        let mut controls = keyboard.held();
        if let Some(remote) = remote {
            controls = controls.merge(&remote.held());
        }

        screen.update(dt, &controls);
        replay.record(dt, &controls);
    }
}
