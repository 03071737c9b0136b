#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! Stepscope binary entry point.
//!
//! Wires the CLI options into a playback session with a thread-backed
//! scheduler and detected speech backend, then runs the crossterm event
//! loop: keyboard input drives the app model, scheduler ticks drive the
//! autoplay cursor, and every pass repaints the frame.

mod app;
mod cli;
mod view;

use std::io;
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{execute, terminal};
use stepscope_playback::{
    CommandSpeech, NarrationAdapter, Session, SessionConfig, ThreadScheduler, TickToken,
};
use tracing::info;

use crate::app::App;

/// How long each event-loop pass waits for input before repainting.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() {
    let opts = cli::Opts::parse();
    init_logging();

    let narration = if opts.narration {
        match CommandSpeech::detect() {
            Some(speech) => {
                info!(backend = ?speech.backend(), "speech backend detected");
                NarrationAdapter::new(Box::new(speech))
            }
            None => {
                info!("no speech backend found; narration disabled");
                NarrationAdapter::unavailable()
            }
        }
    } else {
        NarrationAdapter::unavailable()
    };

    let (scheduler, ticks) = ThreadScheduler::new();
    let session = Session::new(
        scheduler,
        narration,
        SessionConfig {
            autoplay: opts.autoplay,
            speed: opts.speed,
        },
    );
    let mut app = App::new(&opts, session);

    if let Err(e) = run(&mut app, &ticks) {
        restore_terminal();
        eprintln!("stepscope: {e}");
        std::process::exit(1);
    }
    restore_terminal();
}

/// Route log events to `stepscope.log` when `STEPSCOPE_LOG` is set.
///
/// The terminal itself belongs to the UI, so nothing is ever logged to
/// stdout or stderr while the loop runs.
fn init_logging() {
    if std::env::var("STEPSCOPE_LOG").is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create("stepscope.log") else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("STEPSCOPE_LOG"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run(app: &mut App<ThreadScheduler>, ticks: &Receiver<TickToken>) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        io::stdout(),
        terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;

    let mut stdout = io::stdout();
    while !app.should_quit {
        view::draw(&mut stdout, app)?;

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        loop {
            match ticks.try_recv() {
                Ok(token) => app.session.handle_fire(token),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
    Ok(())
}

/// Best-effort teardown, safe to call whether or not setup finished.
fn restore_terminal() {
    let _ = execute!(
        io::stdout(),
        crossterm::cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}
