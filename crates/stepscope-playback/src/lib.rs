#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! Playback: the state machine that walks a trace over time.
//!
//! The [`controller`] is a pure state machine; every operation returns an
//! [`Effect`](controller::Effect) that the owning [`session`] interprets by
//! talking to an [`scheduler::AdvanceScheduler`]. Timer fires come back as
//! epoch-tagged tokens, so a tick scheduled before a pause or reset is inert
//! by construction rather than by cleanup discipline.
//!
//! Narration is an optional external capability ([`speech`]) consumed through
//! the [`narration`] adapter; when no backend is available the adapter
//! degrades to a no-op.

pub mod controller;
pub mod narration;
pub mod scheduler;
pub mod session;
pub mod speech;

pub use controller::{Effect, PlaybackController, PlaybackError, PlaybackStatus, TickToken};
pub use narration::NarrationAdapter;
pub use scheduler::{AdvanceScheduler, ManualScheduler, ThreadScheduler};
pub use session::{PlaybackState, Session, SessionConfig};
pub use speech::{CommandSpeech, SpeechBackend, SpeechCapability, SpeechError};
