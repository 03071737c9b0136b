#![forbid(unsafe_code)]

//! Narration adapter: reads the current step aloud, best-effort.
//!
//! Sits between the session and a [`SpeechCapability`]. When narration is
//! disabled or no backend was detected, every call is a safe no-op; speech
//! failures are logged, never propagated. The newest step always pre-empts an
//! utterance still in flight, so rapid stepping can never leave a stale step
//! being read out.

use stepscope_trace::Step;
use tracing::warn;

use crate::speech::SpeechCapability;

/// Bridges cursor changes to an optional speech backend.
pub struct NarrationAdapter {
    speech: Option<Box<dyn SpeechCapability + Send>>,
    enabled: bool,
}

impl NarrationAdapter {
    /// Adapter over a detected backend, enabled from the start.
    #[must_use]
    pub fn new(speech: Box<dyn SpeechCapability + Send>) -> Self {
        Self {
            speech: Some(speech),
            enabled: true,
        }
    }

    /// Adapter with no backend; every operation is a no-op.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            speech: None,
            enabled: false,
        }
    }

    /// Whether a backend exists at all (drives the "unavailable" indicator).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.speech.is_some()
    }

    /// Whether narration is currently on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.speech.is_some()
    }

    /// Toggle narration; turning it off silences the in-flight utterance.
    ///
    /// Returns the new enabled state.
    pub fn toggle(&mut self) -> bool {
        if self.speech.is_none() {
            return false;
        }
        self.enabled = !self.enabled;
        if !self.enabled {
            self.silence();
        }
        self.enabled
    }

    /// Speak a step's description, pre-empting whatever is in flight.
    ///
    /// Never errors, never panics: disabled or unavailable narration is a
    /// no-op, and a backend failure is logged and swallowed.
    pub fn announce(&mut self, step: &Step) {
        if !self.enabled {
            return;
        }
        if let Some(speech) = &mut self.speech {
            speech.cancel();
            if let Err(e) = speech.speak(&step.description) {
                warn!(error = %e, "narration failed; continuing silently");
            }
        }
    }

    /// Cancel the in-flight utterance without speaking a new one.
    pub fn silence(&mut self) {
        if let Some(speech) = &mut self.speech {
            speech.cancel();
        }
    }
}

impl std::fmt::Debug for NarrationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationAdapter")
            .field("available", &self.is_available())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SpeechError;
    use std::sync::{Arc, Mutex};
    use stepscope_trace::{Step, StepOutcome};

    /// Recording backend shared with the test through an `Arc`.
    #[derive(Debug, Default)]
    struct MockSpeechLog {
        spoken: Vec<String>,
        cancels: usize,
        fail_next: bool,
    }

    #[derive(Debug, Clone, Default)]
    struct MockSpeech {
        log: Arc<Mutex<MockSpeechLog>>,
    }

    impl SpeechCapability for MockSpeech {
        fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
            let mut log = self.log.lock().unwrap();
            if log.fail_next {
                log.fail_next = false;
                return Err(SpeechError::SpawnFailed("mock failure".into()));
            }
            log.spoken.push(text.to_string());
            Ok(())
        }

        fn cancel(&mut self) {
            self.log.lock().unwrap().cancels += 1;
        }
    }

    fn step(description: &str) -> Step {
        Step {
            index: 0,
            outcome: StepOutcome::Searching { compared: 0 },
            bounds: None,
            description: description.to_string(),
        }
    }

    fn adapter() -> (NarrationAdapter, Arc<Mutex<MockSpeechLog>>) {
        let mock = MockSpeech::default();
        let log = mock.log.clone();
        (NarrationAdapter::new(Box::new(mock)), log)
    }

    #[test]
    fn announce_speaks_description() {
        let (mut adapter, log) = adapter();
        adapter.announce(&step("checking index 0"));
        assert_eq!(log.lock().unwrap().spoken, vec!["checking index 0"]);
    }

    #[test]
    fn newest_announcement_preempts_in_flight_utterance() {
        let (mut adapter, log) = adapter();
        adapter.announce(&step("first"));
        adapter.announce(&step("second"));

        let log = log.lock().unwrap();
        assert_eq!(log.spoken, vec!["first", "second"]);
        // Each announce cancels before speaking.
        assert_eq!(log.cancels, 2);
    }

    #[test]
    fn unavailable_adapter_is_silent_and_safe() {
        let mut adapter = NarrationAdapter::unavailable();
        assert!(!adapter.is_available());
        assert!(!adapter.is_enabled());
        adapter.announce(&step("anything"));
        adapter.silence();
        assert!(!adapter.toggle());
    }

    #[test]
    fn toggle_off_silences_and_mutes() {
        let (mut adapter, log) = adapter();
        adapter.announce(&step("first"));
        assert!(!adapter.toggle());

        let cancels_after_toggle = log.lock().unwrap().cancels;
        adapter.announce(&step("second"));
        let log = log.lock().unwrap();
        assert_eq!(log.spoken, vec!["first"]);
        assert_eq!(log.cancels, cancels_after_toggle);
    }

    #[test]
    fn toggle_back_on_resumes_speaking() {
        let (mut adapter, log) = adapter();
        adapter.toggle();
        assert!(adapter.toggle());
        adapter.announce(&step("back"));
        assert_eq!(log.lock().unwrap().spoken, vec!["back"]);
    }

    #[test]
    fn backend_failure_is_swallowed() {
        let (mut adapter, log) = adapter();
        log.lock().unwrap().fail_next = true;
        adapter.announce(&step("doomed"));
        // Still usable afterwards.
        adapter.announce(&step("fine"));
        assert_eq!(log.lock().unwrap().spoken, vec!["fine"]);
    }

    #[test]
    fn silence_cancels_without_speaking() {
        let (mut adapter, log) = adapter();
        adapter.silence();
        let log = log.lock().unwrap();
        assert_eq!(log.cancels, 1);
        assert!(log.spoken.is_empty());
    }
}
