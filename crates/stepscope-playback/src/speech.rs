#![forbid(unsafe_code)]

//! External text-to-speech capability.
//!
//! Narration rides on whatever TTS command-line tool the host happens to
//! have: `say` on macOS, `espeak-ng`/`espeak`, or speech-dispatcher's
//! `spd-say`. Detection is a capability probe over `PATH`; absence is not an
//! error, it just degrades narration to a no-op upstream. The
//! `STEPSCOPE_SPEECH_BACKEND` environment variable overrides detection
//! (values: `say`, `espeak`, `espeak-ng`, `spd-say`, `none`).

use std::env;
use std::fmt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

const ENV_SPEECH_BACKEND: &str = "STEPSCOPE_SPEECH_BACKEND";

/// Known text-to-speech tools, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBackend {
    /// macOS `say`.
    MacOS,
    /// `espeak-ng`, the maintained fork.
    EspeakNg,
    /// Classic `espeak`.
    Espeak,
    /// speech-dispatcher's `spd-say`.
    SpdSay,
}

impl SpeechBackend {
    /// The executable this backend invokes.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::MacOS => "say",
            Self::EspeakNg => "espeak-ng",
            Self::Espeak => "espeak",
            Self::SpdSay => "spd-say",
        }
    }

    fn available(self) -> bool {
        match self {
            Self::MacOS => cfg!(target_os = "macos") && command_exists("say"),
            Self::EspeakNg => command_exists("espeak-ng"),
            Self::Espeak => command_exists("espeak"),
            Self::SpdSay => command_exists("spd-say"),
        }
    }
}

/// Speech errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// No TTS backend is available.
    NotAvailable,
    /// The backend process could not be spawned.
    SpawnFailed(String),
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "no speech backend available"),
            Self::SpawnFailed(msg) => write!(f, "speech backend failed to start: {msg}"),
        }
    }
}

impl std::error::Error for SpeechError {}

/// Something that can speak text and cancel an utterance in flight.
///
/// The narration adapter holds this behind a trait object so tests can
/// substitute a recording mock for the real child-process backend.
pub trait SpeechCapability {
    /// Speak `text`, cancelling any utterance still in flight first.
    ///
    /// # Errors
    ///
    /// [`SpeechError::SpawnFailed`] when the backend process cannot start.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;

    /// Cancel the in-flight utterance, if any.
    fn cancel(&mut self);
}

/// Child-process speech backend.
///
/// Each utterance is one child process; speaking kills the previous child
/// first, so at most one utterance is ever in flight.
#[derive(Debug)]
pub struct CommandSpeech {
    backend: SpeechBackend,
    child: Option<Child>,
}

impl CommandSpeech {
    /// Use a specific backend without probing.
    #[must_use]
    pub fn with_backend(backend: SpeechBackend) -> Self {
        Self {
            backend,
            child: None,
        }
    }

    /// Probe for an available backend.
    ///
    /// Checks the `STEPSCOPE_SPEECH_BACKEND` override first, then scans
    /// `PATH` in priority order. `None` means narration should degrade to a
    /// no-op; it is not an error.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let backend = detect_backend()?;
        debug!(command = backend.command(), "speech backend detected");
        Some(Self::with_backend(backend))
    }

    /// The backend in use.
    #[must_use]
    pub const fn backend(&self) -> SpeechBackend {
        self.backend
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl SpeechCapability for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.kill_child();

        let child = Command::new(self.backend.command())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::SpawnFailed(e.to_string()))?;
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        self.kill_child();
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.kill_child();
    }
}

fn detect_backend() -> Option<SpeechBackend> {
    if let Ok(value) = env::var(ENV_SPEECH_BACKEND) {
        return match value.to_ascii_lowercase().as_str() {
            "say" => Some(SpeechBackend::MacOS),
            "espeak-ng" => Some(SpeechBackend::EspeakNg),
            "espeak" => Some(SpeechBackend::Espeak),
            "spd-say" => Some(SpeechBackend::SpdSay),
            "none" => None,
            other => {
                warn!(value = other, "unknown speech backend override; narration disabled");
                None
            }
        };
    }

    [
        SpeechBackend::MacOS,
        SpeechBackend::EspeakNg,
        SpeechBackend::Espeak,
        SpeechBackend::SpdSay,
    ]
    .into_iter()
    .find(|backend| backend.available())
}

fn command_exists(command: &str) -> bool {
    if command.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(command).is_file();
    }

    let path_var = match env::var_os("PATH") {
        Some(path) => path,
        None => return false,
    };

    env::split_paths(&path_var).any(|dir| dir.join(command).is_file())
}
