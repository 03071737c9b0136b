#![forbid(unsafe_code)]

//! Application model: input fields, key dispatch, and the playback session.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stepscope_playback::{AdvanceScheduler, Session};
use stepscope_trace::{Algorithm, validate};
use tracing::debug;

use crate::cli::Opts;

/// Smallest allowed delay between automatic advances.
const MIN_SPEED: Duration = Duration::from_millis(100);
/// Largest allowed delay between automatic advances.
const MAX_SPEED: Duration = Duration::from_millis(5000);
/// How much one +/- press changes the delay.
const SPEED_STEP: Duration = Duration::from_millis(250);

/// Which input field has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    /// The comma-separated array field.
    Array,
    /// The target value field.
    Target,
}

/// The whole frontend state.
pub struct App<S: AdvanceScheduler> {
    /// The playback session this frontend drives.
    pub session: Session<S>,
    /// Editable array field text.
    pub array_input: String,
    /// Editable target field text.
    pub target_input: String,
    /// Selected algorithm.
    pub algorithm: Algorithm,
    /// Focused input field.
    pub focus: InputFocus,
    /// The array behind the active trace, kept for rendering.
    pub values: Vec<i64>,
    /// Status or error line shown at the bottom.
    pub status: String,
    /// Set when the user asks to quit.
    pub should_quit: bool,
}

impl<S: AdvanceScheduler> App<S> {
    /// Build the app from parsed options and a wired session.
    pub fn new(opts: &Opts, session: Session<S>) -> Self {
        Self {
            session,
            array_input: opts.array.clone(),
            target_input: opts.target.clone(),
            algorithm: opts.algorithm,
            focus: InputFocus::Array,
            values: Vec::new(),
            status: "Edit the inputs, then press Enter to start.".to_string(),
            should_quit: false,
        }
    }

    /// Dispatch one key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    InputFocus::Array => InputFocus::Target,
                    InputFocus::Target => InputFocus::Array,
                };
            }
            KeyCode::Char('a') => {
                self.algorithm = match self.algorithm {
                    Algorithm::Linear => Algorithm::Binary,
                    Algorithm::Binary => Algorithm::Linear,
                };
                self.status = format!("Algorithm: {}.", self.algorithm);
            }
            KeyCode::Enter => self.start(),
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Right => self.step(true),
            KeyCode::Left => self.step(false),
            KeyCode::Char('r') => {
                self.session.reset();
                self.status = "Reset. Press Enter to start again.".to_string();
            }
            KeyCode::Char('+' | '=') => self.adjust_speed(false),
            // '-' belongs to the input fields (negative numbers), so only
            // its shifted form slows playback.
            KeyCode::Char('_') => self.adjust_speed(true),
            KeyCode::Char('n') => {
                if self.session.narration_available() {
                    let on = self.session.toggle_narration();
                    self.status = format!("Narration {}.", if on { "on" } else { "off" });
                } else {
                    self.status = "Narration unavailable: no speech tool found.".to_string();
                }
            }
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ',' || c == '-' => {
                self.focused_field_mut().push(c);
            }
            _ => {}
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            InputFocus::Array => &mut self.array_input,
            InputFocus::Target => &mut self.target_input,
        }
    }

    fn start(&mut self) {
        match validate(&self.array_input, &self.target_input, self.algorithm) {
            Ok(request) => {
                self.values = request.values.clone();
                self.session.start(&request);
                let state = self.session.playback_state();
                debug!(steps = state.trace_len, algorithm = %self.algorithm, "trace started");
                self.status = format!(
                    "Tracing {} over {} element(s).",
                    self.algorithm,
                    request.values.len()
                );
            }
            Err(e) => {
                self.status = format!("Invalid input: {e}");
            }
        }
    }

    fn toggle_playback(&mut self) {
        use stepscope_playback::PlaybackStatus;

        let result = match self.session.playback_state().status {
            PlaybackStatus::Running => self.session.pause(),
            _ => self.session.play(),
        };
        if let Err(e) = result {
            self.status = format!("{e}");
        }
    }

    fn step(&mut self, forward: bool) {
        let result = if forward {
            self.session.step_forward()
        } else {
            self.session.step_back()
        };
        if let Err(e) = result {
            self.status = format!("{e}");
        }
    }

    fn adjust_speed(&mut self, slower: bool) {
        let current = self.session.playback_state().speed;
        let next = if slower {
            (current + SPEED_STEP).min(MAX_SPEED)
        } else {
            current.saturating_sub(SPEED_STEP).max(MIN_SPEED)
        };
        if self.session.set_speed(next).is_ok() {
            self.status = format!("Speed: {}ms per step.", next.as_millis());
        }
    }
}
