#![forbid(unsafe_code)]

//! One visualization session: controller + scheduler + narration.
//!
//! [`Session`] is the boundary the presentation layer talks to. Commands go
//! in; the session runs them through the pure [`PlaybackController`],
//! interprets the returned [`Effect`] against its scheduler, and keeps the
//! narration adapter in step with the cursor. Reads come back as cheap
//! snapshots.
//!
//! The session is generic over its scheduler so tests drive it with a
//! [`ManualScheduler`](crate::scheduler::ManualScheduler) while the frontend
//! uses a [`ThreadScheduler`](crate::scheduler::ThreadScheduler).

use std::time::Duration;

use stepscope_trace::{SearchRequest, Step, Trace, generate};
use tracing::debug;

use crate::controller::{
    DEFAULT_SPEED, Effect, PlaybackController, PlaybackError, PlaybackStatus, TickToken,
};
use crate::narration::NarrationAdapter;
use crate::scheduler::AdvanceScheduler;

/// Session construction options.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Whether `start` begins running immediately.
    pub autoplay: bool,
    /// Initial delay between automatic advances.
    pub speed: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            speed: DEFAULT_SPEED,
        }
    }
}

/// Read-only snapshot of playback state for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    /// Lifecycle status.
    pub status: PlaybackStatus,
    /// Cursor position, `None` while idle.
    pub cursor: Option<usize>,
    /// Steps in the active trace, `None` while idle.
    pub trace_len: Option<usize>,
    /// Delay between automatic advances.
    pub speed: Duration,
}

/// Owns one trace's playback from `start` to `reset`.
pub struct Session<S: AdvanceScheduler> {
    controller: PlaybackController,
    scheduler: S,
    narration: NarrationAdapter,
}

impl<S: AdvanceScheduler> Session<S> {
    /// Wire a session together.
    #[must_use]
    pub fn new(scheduler: S, narration: NarrationAdapter, config: SessionConfig) -> Self {
        let speed = if config.speed.is_zero() {
            DEFAULT_SPEED
        } else {
            config.speed
        };
        Self {
            controller: PlaybackController::new()
                .with_autoplay(config.autoplay)
                .with_speed(speed),
            scheduler,
            narration,
        }
    }

    // --- commands ---

    /// Generate a trace for `request` and begin playback.
    ///
    /// Replaces any run already in progress; its pending advance and
    /// narration are cancelled.
    pub fn start(&mut self, request: &SearchRequest) {
        let trace = generate(request);
        debug!(algorithm = %request.algorithm, steps = trace.len(), "starting trace");
        self.narration.silence();
        let effect = self.controller.start(trace);
        self.apply(effect);
        self.announce_current();
    }

    /// Resume automatic advancement.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        let effect = self.controller.play()?;
        self.apply(effect);
        Ok(())
    }

    /// Hold at the current step; cancels the pending advance and silences
    /// narration.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        let effect = self.controller.pause()?;
        self.narration.silence();
        self.apply(effect);
        Ok(())
    }

    /// Step one forward (clamped); announces the newly current step.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn step_forward(&mut self) -> Result<(), PlaybackError> {
        let before = self.controller.cursor();
        let effect = self.controller.step_forward()?;
        self.apply(effect);
        if self.controller.cursor() != before {
            self.announce_current();
        } else {
            self.narration.silence();
        }
        Ok(())
    }

    /// Step one back (clamped); announces the newly current step.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn step_back(&mut self) -> Result<(), PlaybackError> {
        let before = self.controller.cursor();
        let effect = self.controller.step_back()?;
        self.apply(effect);
        if self.controller.cursor() != before {
            self.announce_current();
        } else {
            self.narration.silence();
        }
        Ok(())
    }

    /// Discard the trace and return to idle. Idempotent.
    pub fn reset(&mut self) {
        self.narration.silence();
        let effect = self.controller.reset();
        self.apply(effect);
    }

    /// Change playback speed; applies from the next scheduled advance.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidSpeed`] when `speed` is zero.
    pub fn set_speed(&mut self, speed: Duration) -> Result<(), PlaybackError> {
        self.controller.set_speed(speed)
    }

    /// Apply a fired advance from the scheduler's channel.
    ///
    /// Stale tokens (issued before a pause, reset, or newer start) are
    /// discarded inside the controller; a live one advances the cursor and
    /// narrates the new step.
    pub fn handle_fire(&mut self, token: TickToken) {
        let before = self.controller.cursor();
        let effect = self.controller.handle_fire(token);
        self.apply(effect);
        if self.controller.cursor() != before {
            self.announce_current();
        }
    }

    /// Toggle narration on or off; returns the new state.
    pub fn toggle_narration(&mut self) -> bool {
        self.narration.toggle()
    }

    // --- reads ---

    /// The step at the cursor, `None` while idle.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.controller.current_step()
    }

    /// The active trace, `None` while idle.
    #[must_use]
    pub fn trace(&self) -> Option<&Trace> {
        self.controller.trace()
    }

    /// Snapshot of the playback state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            status: self.controller.status(),
            cursor: self.controller.cursor(),
            trace_len: self.controller.trace().map(Trace::len),
            speed: self.controller.speed(),
        }
    }

    /// Whether a speech backend was detected at all.
    #[must_use]
    pub fn narration_available(&self) -> bool {
        self.narration.is_available()
    }

    /// Whether narration is currently on.
    #[must_use]
    pub fn narration_enabled(&self) -> bool {
        self.narration.is_enabled()
    }

    /// The scheduler, for drivers that pump it directly (manual test
    /// schedulers in particular).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // --- internals ---

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Schedule { token, delay } => self.scheduler.schedule(token, delay),
            Effect::Cancel => self.scheduler.cancel(),
        }
    }

    fn announce_current(&mut self) {
        if let Some(step) = self.controller.current_step() {
            let step = step.clone();
            self.narration.announce(&step);
        }
    }
}

impl<S: AdvanceScheduler + std::fmt::Debug> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.playback_state())
            .field("scheduler", &self.scheduler)
            .field("narration", &self.narration)
            .finish()
    }
}
