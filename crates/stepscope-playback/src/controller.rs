#![forbid(unsafe_code)]

//! The playback state machine.
//!
//! [`PlaybackController`] owns the current trace and a cursor over it, and
//! advances the cursor on timer fires while `Running`. It is deliberately
//! pure: it never touches a clock or a thread. Operations return an [`Effect`]
//! telling the caller what to do with its scheduler, and every effect that
//! schedules a delay carries a [`TickToken`] stamped with the controller's
//! current epoch. Any state-resetting operation bumps the epoch, so a token
//! from before the change no longer matches and [`handle_fire`] discards it.
//!
//! [`handle_fire`]: PlaybackController::handle_fire

use std::fmt;
use std::time::Duration;

use stepscope_trace::{Step, Trace};
use tracing::{debug, trace};

/// Playback lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No trace loaded; the cursor is meaningless.
    Idle,
    /// Automatically advancing on a timer.
    Running,
    /// Holding at the current step.
    Paused,
    /// The cursor reached the terminal step while running.
    Finished,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Epoch tag carried by every scheduled advance.
///
/// A fired token is applied only if its epoch still matches the controller's;
/// otherwise the fire belongs to a superseded run, pause, or reset and is
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    epoch: u64,
}

impl TickToken {
    /// The epoch this token was issued under.
    #[must_use]
    pub const fn epoch(self) -> u64 {
        self.epoch
    }
}

/// What the caller should do with its scheduler after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Schedule a one-shot advance after `delay`, delivering `token`.
    Schedule {
        /// Token to deliver back through [`PlaybackController::handle_fire`].
        token: TickToken,
        /// Delay before firing; the speed at scheduling time.
        delay: Duration,
    },
    /// Cancel any pending scheduled advance.
    Cancel,
}

/// Playback command errors. All recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    /// A playback command was issued with no active trace; call `start` first.
    NoTrace,
    /// The requested speed was zero.
    InvalidSpeed,
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTrace => write!(f, "no trace loaded; start a search first"),
            Self::InvalidSpeed => write!(f, "speed must be greater than zero"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Default delay between automatic advances.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(1000);

/// State machine driving a cursor through one trace.
#[derive(Debug)]
pub struct PlaybackController {
    trace: Option<Trace>,
    cursor: usize,
    status: PlaybackStatus,
    speed: Duration,
    autoplay: bool,
    epoch: u64,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackController {
    /// Create an idle controller with the default speed, autoplaying on start.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trace: None,
            cursor: 0,
            status: PlaybackStatus::Idle,
            speed: DEFAULT_SPEED,
            autoplay: true,
            epoch: 0,
        }
    }

    /// Set whether `start` begins running or paused.
    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Set the initial speed.
    #[must_use]
    pub fn with_speed(mut self, speed: Duration) -> Self {
        debug_assert!(!speed.is_zero());
        self.speed = speed;
        self
    }

    // --- reads ---

    /// Current status.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Cursor position, `None` while idle.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        match self.status {
            PlaybackStatus::Idle => None,
            _ => Some(self.cursor),
        }
    }

    /// The step at the cursor, `None` while idle.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        match self.status {
            PlaybackStatus::Idle => None,
            _ => self.trace.as_ref().and_then(|t| t.get(self.cursor)),
        }
    }

    /// The active trace, `None` while idle.
    #[must_use]
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Delay between automatic advances.
    #[must_use]
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Current epoch. Fires tagged with an older epoch are discarded.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // --- commands ---

    /// Load a trace and begin playback at step 0.
    ///
    /// Replaces any trace already playing; the epoch bump makes the old run's
    /// pending advance inert. Begins `Running` (with a scheduled advance) by
    /// default, or `Paused` when autoplay is off.
    pub fn start(&mut self, trace: Trace) -> Effect {
        self.epoch += 1;
        self.trace = Some(trace);
        self.cursor = 0;
        debug!(epoch = self.epoch, autoplay = self.autoplay, "playback start");
        if self.autoplay {
            self.status = PlaybackStatus::Running;
            self.schedule()
        } else {
            self.status = PlaybackStatus::Paused;
            Effect::Cancel
        }
    }

    /// Resume automatic advancement.
    ///
    /// No-op when already `Running` or `Finished`.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn play(&mut self) -> Result<Effect, PlaybackError> {
        match self.status {
            PlaybackStatus::Idle => Err(PlaybackError::NoTrace),
            PlaybackStatus::Running | PlaybackStatus::Finished => Ok(Effect::None),
            PlaybackStatus::Paused => {
                self.epoch += 1;
                self.status = PlaybackStatus::Running;
                debug!(epoch = self.epoch, cursor = self.cursor, "playback resume");
                Ok(self.schedule())
            }
        }
    }

    /// Hold at the current step, cancelling the pending advance.
    ///
    /// Idempotent: pausing while `Paused` or `Finished` is a no-op.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn pause(&mut self) -> Result<Effect, PlaybackError> {
        match self.status {
            PlaybackStatus::Idle => Err(PlaybackError::NoTrace),
            PlaybackStatus::Paused | PlaybackStatus::Finished => Ok(Effect::None),
            PlaybackStatus::Running => {
                self.epoch += 1;
                self.status = PlaybackStatus::Paused;
                debug!(epoch = self.epoch, cursor = self.cursor, "playback pause");
                Ok(Effect::Cancel)
            }
        }
    }

    /// Move the cursor one step forward, clamped at the terminal step.
    ///
    /// Honored immediately in any non-idle status; a step while `Running`
    /// pauses playback. Stepping forward from the last index does not wrap.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn step_forward(&mut self) -> Result<Effect, PlaybackError> {
        let last = self.last_index()?;
        self.cursor = (self.cursor + 1).min(last);
        Ok(self.manual_step())
    }

    /// Move the cursor one step back, clamped at step 0.
    ///
    /// Stepping back from `Finished` returns to `Paused`, so playback can
    /// resume.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoTrace`] while idle.
    pub fn step_back(&mut self) -> Result<Effect, PlaybackError> {
        self.last_index()?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(self.manual_step())
    }

    /// Drop the trace and return to `Idle`. Idempotent.
    pub fn reset(&mut self) -> Effect {
        self.epoch += 1;
        self.trace = None;
        self.cursor = 0;
        self.status = PlaybackStatus::Idle;
        debug!(epoch = self.epoch, "playback reset");
        Effect::Cancel
    }

    /// Change the delay between automatic advances.
    ///
    /// Takes effect on the next scheduled advance; a pending delay is not
    /// rescheduled.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidSpeed`] when `speed` is zero.
    pub fn set_speed(&mut self, speed: Duration) -> Result<(), PlaybackError> {
        if speed.is_zero() {
            return Err(PlaybackError::InvalidSpeed);
        }
        self.speed = speed;
        Ok(())
    }

    /// Apply a fired advance.
    ///
    /// Discards the fire when the token's epoch is stale or the controller is
    /// no longer `Running`; otherwise advances the cursor and schedules the
    /// next delay, or transitions to `Finished` at the terminal step.
    pub fn handle_fire(&mut self, token: TickToken) -> Effect {
        if token.epoch != self.epoch {
            trace!(
                fired = token.epoch,
                current = self.epoch,
                "discarding stale advance"
            );
            return Effect::None;
        }
        if self.status != PlaybackStatus::Running {
            trace!(status = %self.status, "advance fired while not running");
            return Effect::None;
        }
        let last = match &self.trace {
            Some(trace) => trace.last_index(),
            None => return Effect::None,
        };
        if self.cursor < last {
            self.cursor += 1;
            if self.cursor == last {
                self.status = PlaybackStatus::Finished;
                debug!(cursor = self.cursor, "playback finished");
                Effect::None
            } else {
                self.schedule()
            }
        } else {
            // Single-step trace started running: finish without advancing.
            self.status = PlaybackStatus::Finished;
            debug!(cursor = self.cursor, "playback finished");
            Effect::None
        }
    }

    // --- internals ---

    fn schedule(&self) -> Effect {
        Effect::Schedule {
            token: TickToken { epoch: self.epoch },
            delay: self.speed,
        }
    }

    fn last_index(&self) -> Result<usize, PlaybackError> {
        match (&self.trace, self.status) {
            (Some(trace), status) if status != PlaybackStatus::Idle => Ok(trace.last_index()),
            _ => Err(PlaybackError::NoTrace),
        }
    }

    fn manual_step(&mut self) -> Effect {
        self.epoch += 1;
        // Manual stepping takes over from the timer.
        self.status = PlaybackStatus::Paused;
        trace!(epoch = self.epoch, cursor = self.cursor, "manual step");
        Effect::Cancel
    }
}
