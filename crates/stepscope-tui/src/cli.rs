#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `STEPSCOPE_*` prefix.

use std::env;
use std::process;
use std::time::Duration;

use stepscope_trace::Algorithm;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Stepscope: watch linear and binary search, one step at a time

USAGE:
    stepscope [OPTIONS]

OPTIONS:
    --array=N,N,...      Starting array (default: 1,3,5,7,9,11,13,15)
    --target=N           Starting target value (default: 11)
    --algorithm=ALGO     'linear' or 'binary' (default: binary)
    --speed-ms=N         Milliseconds between automatic steps (default: 1000)
    --no-autoplay        Start paused; press space to play
    --no-narration       Disable spoken narration even if a TTS tool exists
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    0-9 , -         Edit the focused input field
    Tab             Switch focus between array and target fields
    a               Toggle algorithm (linear/binary)
    Enter           Validate inputs and start a new trace
    Space           Play / pause
    Left / Right    Step back / forward (pauses playback)
    + / =           Faster   _   Slower
    n               Toggle narration
    r               Reset    q / Ctrl+C   Quit

ENVIRONMENT VARIABLES:
    STEPSCOPE_ARRAY           Override --array
    STEPSCOPE_TARGET          Override --target
    STEPSCOPE_ALGORITHM       Override --algorithm
    STEPSCOPE_SPEED_MS        Override --speed-ms
    STEPSCOPE_SPEECH_BACKEND  Speech tool: say|espeak|espeak-ng|spd-say|none
    STEPSCOPE_LOG             Log filter written to stepscope.log (e.g. debug)";

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Initial array field text.
    pub array: String,
    /// Initial target field text.
    pub target: String,
    /// Initial algorithm selection.
    pub algorithm: Algorithm,
    /// Delay between automatic advances.
    pub speed: Duration,
    /// Whether a started trace plays immediately.
    pub autoplay: bool,
    /// Whether to probe for a speech backend at all.
    pub narration: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            array: "1,3,5,7,9,11,13,15".into(),
            target: "11".into(),
            algorithm: Algorithm::Binary,
            speed: Duration::from_millis(1000),
            autoplay: true,
            narration: true,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    #[must_use]
    pub fn parse() -> Self {
        let mut opts = Self::default();

        if let Ok(val) = env::var("STEPSCOPE_ARRAY") {
            opts.array = val;
        }
        if let Ok(val) = env::var("STEPSCOPE_TARGET") {
            opts.target = val;
        }
        if let Ok(val) = env::var("STEPSCOPE_ALGORITHM")
            && let Ok(algorithm) = val.parse()
        {
            opts.algorithm = algorithm;
        }
        if let Ok(val) = env::var("STEPSCOPE_SPEED_MS")
            && let Ok(ms) = val.parse::<u64>()
            && ms > 0
        {
            opts.speed = Duration::from_millis(ms);
        }

        let args: Vec<String> = env::args().skip(1).collect();
        for arg in &args {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("stepscope {VERSION}");
                    process::exit(0);
                }
                "--no-autoplay" => opts.autoplay = false,
                "--no-narration" => opts.narration = false,
                other => {
                    if let Some(value) = other.strip_prefix("--array=") {
                        opts.array = value.to_string();
                    } else if let Some(value) = other.strip_prefix("--target=") {
                        opts.target = value.to_string();
                    } else if let Some(value) = other.strip_prefix("--algorithm=") {
                        match value.parse() {
                            Ok(algorithm) => opts.algorithm = algorithm,
                            Err(e) => fail(&e.to_string()),
                        }
                    } else if let Some(value) = other.strip_prefix("--speed-ms=") {
                        match value.parse::<u64>() {
                            Ok(ms) if ms > 0 => opts.speed = Duration::from_millis(ms),
                            _ => fail(&format!("invalid speed '{value}' (positive integer ms)")),
                        }
                    } else {
                        fail(&format!("unknown option '{other}'"));
                    }
                }
            }
        }

        opts
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("stepscope: {msg}");
    eprintln!("Try 'stepscope --help'.");
    process::exit(2);
}
