#![forbid(unsafe_code)]

//! The trace model: steps, outcomes, bounds, and the trace itself.
//!
//! A [`Trace`] is the complete, precomputed sequence of observable moments in
//! one search run. Each [`Step`] records which index was examined (if any),
//! the binary-search window when applicable, and a narration string. The
//! trace is immutable once built; only the generators construct one.

use std::fmt;

/// The binary-search window at one step.
///
/// `mid` is `None` only on the terminal not-found step, where the window has
/// collapsed (`low > high`) and no probe index exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Inclusive lower index of the active window.
    pub low: usize,
    /// Inclusive upper index of the active window.
    pub high: usize,
    /// The probe index, `low <= mid <= high` while searching.
    pub mid: Option<usize>,
}

/// What one step observed.
///
/// Consumers match exhaustively; there are no optional probe fields to sniff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    /// An index was examined and did not match.
    Searching {
        /// The array index examined this step.
        compared: usize,
    },
    /// The target was found at this index. Terminal.
    Found {
        /// The matching array index.
        at: usize,
    },
    /// The array was exhausted without a match. Terminal.
    NotFound,
}

impl StepOutcome {
    /// The array index examined this step, if any.
    #[must_use]
    pub const fn compared_index(self) -> Option<usize> {
        match self {
            Self::Searching { compared } => Some(compared),
            Self::Found { at } => Some(at),
            Self::NotFound => None,
        }
    }

    /// Whether this outcome ends the trace.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Found { .. } | Self::NotFound)
    }
}

/// One observable moment in a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Position of this step within its trace (0-based, dense).
    pub index: usize,
    /// What happened this step.
    pub outcome: StepOutcome,
    /// The binary-search window; `None` for linear-search steps.
    pub bounds: Option<Bounds>,
    /// Narration text for this step.
    pub description: String,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: {}", self.index + 1, self.description)
    }
}

/// The complete, immutable sequence of steps for one search run.
///
/// Always holds at least one step (an empty array still yields the terminal
/// not-found step). Exactly one step is terminal and it is last.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// Build a trace from generator output.
    ///
    /// Only the generators call this; the invariants are theirs to uphold and
    /// are checked in debug builds.
    pub(crate) fn from_steps(steps: Vec<Step>) -> Self {
        debug_assert!(!steps.is_empty(), "a trace holds at least one step");
        debug_assert!(steps.iter().enumerate().all(|(i, s)| s.index == i));
        debug_assert!(
            steps
                .iter()
                .enumerate()
                .all(|(i, s)| s.outcome.is_terminal() == (i == steps.len() - 1)),
            "exactly the last step is terminal"
        );
        Self { steps }
    }

    /// Number of steps. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A trace is never empty; provided for clippy's sake.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the final (terminal) step.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// The step at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// The terminal step.
    #[must_use]
    pub fn terminal(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    /// All steps, in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}
