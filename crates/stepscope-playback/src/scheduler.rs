#![forbid(unsafe_code)]

//! One-shot advance scheduling.
//!
//! The controller decides *when* to advance; a scheduler owns the actual
//! delay. [`ThreadScheduler`] runs each delay on a background thread that
//! blocks on a condition variable, so cancellation wakes it immediately
//! instead of waiting out the sleep. Fired tokens are delivered over an
//! `mpsc` channel and applied by the session against the controller's
//! current epoch; a cancelled or superseded delay simply never sends.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::controller::TickToken;

/// Schedules and cancels the one pending automatic advance.
///
/// At most one delay is pending at a time: scheduling replaces (and cancels)
/// any delay already in flight.
pub trait AdvanceScheduler {
    /// Schedule `token` to fire after `delay`, replacing any pending delay.
    fn schedule(&mut self, token: TickToken, delay: Duration);

    /// Cancel the pending delay, if any.
    fn cancel(&mut self);
}

/// Signal a waiting delay thread checks before firing.
#[derive(Clone)]
struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: inner.clone(),
        };
        let trigger = StopTrigger { inner };
        (signal, trigger)
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if the full delay elapsed. Loops to
    /// survive spurious wakeups.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *stopped {
            return true;
        }

        let start = std::time::Instant::now();
        let mut remaining = duration;

        loop {
            let (guard, result) = match cvar.wait_timeout(stopped, remaining) {
                Ok(pair) => pair,
                Err(poisoned) => {
                    let (guard, result) = poisoned.into_inner();
                    (guard, result)
                }
            };
            stopped = guard;
            if *stopped {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

/// Trigger half of a [`StopSignal`].
struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *stopped = true;
        cvar.notify_all();
    }
}

struct PendingDelay {
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl PendingDelay {
    fn cancel(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PendingDelay {
    fn drop(&mut self) {
        self.trigger.stop();
        // No join in drop; the thread exits on its own.
    }
}

/// Thread-backed scheduler delivering fired tokens over a channel.
///
/// The receiving side (typically the frontend event loop) drains the channel
/// and feeds tokens to the session, which applies them against the
/// controller's epoch. A delay cancelled before its deadline never sends.
pub struct ThreadScheduler {
    sender: mpsc::Sender<TickToken>,
    pending: Option<PendingDelay>,
}

impl ThreadScheduler {
    /// Create a scheduler and the receiver its fired tokens arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::Receiver<TickToken>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender,
                pending: None,
            },
            receiver,
        )
    }
}

impl AdvanceScheduler for ThreadScheduler {
    fn schedule(&mut self, token: TickToken, delay: Duration) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }

        trace!(epoch = token.epoch(), ?delay, "scheduling advance");
        let (signal, trigger) = StopSignal::new();
        let sender = self.sender.clone();

        let thread = thread::spawn(move || {
            if !signal.wait_timeout(delay) {
                // Receiver gone means the session is shutting down.
                let _ = sender.send(token);
            }
        });

        self.pending = Some(PendingDelay {
            trigger,
            thread: Some(thread),
        });
    }

    fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            trace!("cancelling pending advance");
            pending.cancel();
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Test scheduler that records calls and fires only by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    /// The currently pending token and its requested delay.
    pub pending: Option<(TickToken, Duration)>,
    /// Number of `schedule` calls seen.
    pub scheduled: usize,
    /// Number of `cancel` calls seen.
    pub cancelled: usize,
}

impl ManualScheduler {
    /// Create an empty manual scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending token, as though the delay had elapsed.
    pub fn fire(&mut self) -> Option<TickToken> {
        self.pending.take().map(|(token, _)| token)
    }
}

impl AdvanceScheduler for ManualScheduler {
    fn schedule(&mut self, token: TickToken, delay: Duration) {
        self.scheduled += 1;
        self.pending = Some((token, delay));
    }

    fn cancel(&mut self) {
        self.cancelled += 1;
        self.pending = None;
    }
}
